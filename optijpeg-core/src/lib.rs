//! Core library for driving the `jpegoptim` JPEG optimizer.
//!
//! This crate builds `jpegoptim` invocations from structured options, runs
//! them through a pluggable process runner and turns the tool's free-form
//! output into an [`OptimizationResult`]: per-file ratios for processed files
//! plus per-file and unassociated errors.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use optijpeg_core::{OptimizationOptions, StripMode, optimize};
//!
//! let options = OptimizationOptions::builder()
//!     .strip_mode(StripMode::Exif)
//!     .preserve_timestamps(true)
//!     .max_quality(85)
//!     .build();
//!
//! let result = optimize(vec!["holiday/beach.jpg", "holiday/sunset.jpg"], &options).unwrap();
//!
//! for (file, ratio) in result.optimized() {
//!     println!("{file}: {:.2}% smaller", -ratio);
//! }
//! for error in &result.errors {
//!     eprintln!("{:?}: {}", error.filename, error.message);
//! }
//! ```

pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod optimizer;

// Re-exports for public API
pub use classify::{
    ClassifiedEntry, ErrorEntry, OptimizationResult, classify, classify_line, classify_output,
};
pub use command::{COMMAND, CommandInvocation, InputPaths, JpegoptimCommandBuilder, encode};
pub use config::{OptimizationOptions, OptimizationOptionsBuilder, Strip, StripMode};
pub use error::{CoreError, CoreResult};
pub use external::{ProcessRunner, SystemProcessRunner, check_dependency};
pub use optimizer::{Optimizer, is_available, optimize, optimize_with_callback};
