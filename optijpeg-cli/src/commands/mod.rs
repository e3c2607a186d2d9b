//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

pub mod check;
pub mod classify;

/// Module containing the implementation of the `optimize` command.
/// This command discovers JPEG files and runs jpegoptim on them in place.
pub mod optimize;
