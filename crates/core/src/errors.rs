//! Error types and handling
//!
//! This module provides domain-specific error types for the scaffolding tool.
//! The error taxonomy is structured with specific error enums for each domain
//! (naming, templates, scaffolding, process execution, lifecycle) that are
//! then wrapped in the main StencilError enum for unified error handling.
//!
//! The process/lifecycle split matters to callers: a `ProcessError::Launch`
//! means the command could never be started, while a completed run with a
//! non-zero exit code is reported through the runner's output, not as an
//! error. Readiness timeouts surface as `LifecycleError::ReadinessTimeout`
//! only after the underlying child process has been cleaned up.

use thiserror::Error;

/// Application-name derivation and validation errors
#[derive(Error, Debug)]
pub enum NameError {
    /// Derived name is not a valid npm package name
    #[error("Invalid package name: {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Template rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template registered for the requested view engine
    #[error("No templates available for view engine: {engine}")]
    UnknownEngine { engine: String },

    /// Template file I/O error
    #[error("Failed to write template file")]
    Io(#[from] std::io::Error),
}

/// Scaffolding (destination tree materialization) errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Destination directory exists and is not empty
    #[error("Destination directory is not empty: {path} (use --force to override)")]
    DestinationNotEmpty { path: String },

    /// Destination path exists but is not a directory
    #[error("Destination is not a directory: {path}")]
    NotADirectory { path: String },

    /// File or directory creation error
    #[error("Failed to create {path}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Destination inspection error
    #[error("Failed to inspect destination directory")]
    Io(#[from] std::io::Error),
}

/// Process runner errors
///
/// `Launch` is deliberately distinct from a non-zero exit code: a command
/// that ran and failed is reported through `RunOutput::exit_code`, never
/// as an error from the runner.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The target executable could not be started at all
    #[error("Failed to launch {program}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's output streams failed
    #[error("Failed to capture output of {program}")]
    Capture {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child to exit failed
    #[error("Failed to wait for {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Application lifecycle controller errors
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Operation invoked from a state that does not permit it
    #[error("Invalid lifecycle transition: {operation} while {state}")]
    InvalidState { operation: String, state: String },

    /// The application never accepted a connection within the bound
    #[error("Application did not become ready within {timeout_secs}s on port {port}")]
    ReadinessTimeout { port: u16, timeout_secs: u64 },

    /// The child process exited before readiness was observed
    #[error("Application exited with code {code} before becoming ready")]
    EarlyExit { code: i32 },

    /// Spawning the application process failed
    #[error("Failed to spawn application process")]
    Spawn(#[source] std::io::Error),

    /// Terminating the application process failed
    #[error("Failed to terminate application process: {message}")]
    Termination { message: String },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum StencilError {
    /// Application-name errors
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Template errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Scaffolding errors
    #[error("Scaffold error: {0}")]
    Scaffold(#[from] ScaffoldError),

    /// Process runner errors
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Lifecycle controller errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Convenience type alias for Results with StencilError
pub type Result<T> = std::result::Result<T, StencilError>;
