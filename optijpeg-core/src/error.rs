// ============================================================================
// optijpeg-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the optijpeg Core Library
//
// The option encoder and the output classifier never fail; everything here
// belongs to the edges of the library: launching jpegoptim, waiting for it,
// locating it on PATH, loading options from disk and setting up logging.
//
// Per-file problems reported by jpegoptim itself are NOT errors at this
// level. They are data, collected into `OptimizationResult::errors`.

use std::io;
use thiserror::Error;

/// Errors raised by the optijpeg core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The external command could not be started (missing binary, permission denied).
    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    /// The command started but collecting its output failed.
    #[error("Failed while waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Required dependency not found on PATH: {0}")]
    DependencyNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for optijpeg core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for the named command.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for the named command.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}
