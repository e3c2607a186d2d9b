//! File-based logging for long optimization runs.
//!
//! Console logging is the frontend's business; this module only provides the
//! log4rs setup used when log output should go to a file instead.

pub mod setup;

pub use setup::{DEFAULT_LOG_PATTERN, setup_file_logging};
