//! Logging and observability
//!
//! Structured logging built on tracing-subscriber, supporting text and JSON
//! output selected at runtime via CLI flag or environment variable.
//!
//! All logging output is directed to stderr. Stdout is reserved for the
//! generator's `create :` report, which callers parse programmatically, so
//! diagnostic text must never be mixed into it.

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification
///
/// Sets up tracing-subscriber with either JSON or text formatting. Safe to
/// call multiple times; subsequent calls are no-ops.
///
/// ## Arguments
///
/// * `format` - `None` or `"text"` for human-readable output, `"json"` for
///   structured JSON output.
///
/// ## Environment Variables
///
/// * `STENCIL_LOG_FORMAT` - Log output format ("json" for JSON, any other value for text)
/// * `STENCIL_LOG` - Logging filter level
/// * `RUST_LOG` - Standard Rust logging environment variable (used as fallback)
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("STENCIL_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter based on environment variables
fn create_env_filter() -> EnvFilter {
    if let Ok(stencil_log) = std::env::var("STENCIL_LOG") {
        EnvFilter::try_new(&stencil_log).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid STENCIL_LOG specification '{}', using default 'info'",
                stencil_log
            );
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized
///
/// Primarily useful for tests that need to know whether the logging system
/// has already been set up.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
