// optijpeg-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use optijpeg_core::{COMMAND, StripMode};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "optijpeg: JPEG optimization frontend",
    long_about = "Runs jpegoptim on JPEG files and reports per-file results via the optijpeg-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log records to this file instead of the terminal
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimizes JPEG files in place with jpegoptim
    Optimize(OptimizeArgs),
    /// Reports whether jpegoptim can be found
    Check(CheckArgs),
    /// Classifies previously captured jpegoptim output
    Classify(ClassifyArgs),
}

/// Location of the jpegoptim binary.
#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    /// jpegoptim executable to run (name on PATH or explicit path)
    #[arg(long = "jpegoptim", value_name = "PROGRAM", env = "OPTIJPEG_JPEGOPTIM", default_value = COMMAND)]
    pub program: String,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// JPEG files, or directories whose top-level .jpg/.jpeg files are optimized
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Metadata to strip: all, com, exif, iptc, icc or xmp (default: all).
    /// Any other name is passed to jpegoptim unchanged as --strip-<MODE>
    #[arg(long, value_name = "MODE", value_parser = parse_strip_mode, conflicts_with = "no_strip")]
    pub strip: Option<StripMode>,

    /// Keep all metadata
    #[arg(long)]
    pub no_strip: bool,

    /// Preserve file modification times
    #[arg(long)]
    pub preserve: bool,

    /// Maximum quality factor (lossy optimization)
    #[arg(
        long = "max",
        value_name = "QUALITY",
        env = "OPTIJPEG_MAX_QUALITY",
        value_parser = clap::value_parser!(u64).range(0..=100)
    )]
    pub max_quality: Option<u64>,

    /// Print the composed jpegoptim command to stderr before running it
    #[arg(long)]
    pub debug: bool,

    /// JSON file with default options; command-line flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of jpegoptim processes to run in parallel
    #[arg(short, long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    #[command(flatten)]
    pub tool: ToolArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tool: ToolArgs,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File holding jpegoptim output, or "-" for standard input
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_strip_mode(value: &str) -> Result<StripMode, String> {
    value.parse::<StripMode>().map_err(|e| e.to_string())
}
