//! Core library for the stencil scaffolding CLI
//!
//! This crate contains shared logic for application-name derivation,
//! template rendering, tree scaffolding, manifest generation, process
//! execution, application lifecycle control, logging, and error handling.

pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod process;
pub mod retry;
pub mod scaffold;
pub mod templates;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = version();
        assert!(!version.is_empty());
        assert!(version.contains('.'));
    }
}
