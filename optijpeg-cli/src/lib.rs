// optijpeg-cli/src/lib.rs
//
// Library portion of the optijpeg CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{CheckArgs, ClassifyArgs, Cli, Commands, OptimizeArgs};
pub use commands::check::run_check;
pub use commands::classify::run_classify;
pub use commands::optimize::run_optimize;
