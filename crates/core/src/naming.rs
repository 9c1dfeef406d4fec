//! Application name derivation
//!
//! The generated package manifest needs a valid npm package name. The name
//! is derived from the destination directory's basename by sanitizing it
//! against the npm naming rules; when sanitization produces an unusable
//! name (e.g. the directory is `_`), a fixed fallback is used instead.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Fallback name used when the directory basename cannot be sanitized
/// into a valid package name.
pub const FALLBACK_NAME: &str = "hello-world";

/// Maximum length for an npm package name.
const MAX_NAME_LEN: usize = 214;

static ILLEGAL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9.-]+").unwrap());
static TRIM_EDGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-_.]+|-+$").unwrap());

/// Derive the application name from a destination directory path
///
/// Runs of characters outside `[A-Za-z0-9.-]` collapse into a single `-`,
/// leading `.`/`_`/`-` and trailing `-` are trimmed, and the result is
/// lowercased. Falls back to [`FALLBACK_NAME`] if the result is not a valid
/// package name.
///
/// ```
/// use stencil_core::naming::app_name_from_dir;
/// use std::path::Path;
///
/// assert_eq!(app_name_from_dir(Path::new("/tmp/foo bar (BAZ!)")), "foo-bar-baz");
/// assert_eq!(app_name_from_dir(Path::new("/tmp/_")), "hello-world");
/// ```
pub fn app_name_from_dir(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let sanitized = ILLEGAL_RUN.replace_all(&base, "-");
    let trimmed = TRIM_EDGES.replace_all(&sanitized, "");
    let name = trimmed.to_lowercase();

    if is_valid_name(&name) {
        name
    } else {
        debug!(
            "Directory basename {:?} does not yield a valid package name, using {:?}",
            base, FALLBACK_NAME
        );
        FALLBACK_NAME.to_string()
    }
}

/// Check whether a string is a valid npm package name for new packages
///
/// Mirrors the rules the original generator enforced: non-empty, at most
/// 214 characters, no leading `.`/`_`/`-`, lowercase, and restricted to
/// URL-safe characters.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }
    if name.starts_with('.') || name.starts_with('_') || name.starts_with('-') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '~'))
}
