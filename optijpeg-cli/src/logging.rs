// ============================================================================
// optijpeg-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Terminal and file logging for the optijpeg CLI
//
// The application logs through the standard `log` macros. By default records
// go to stderr through `env_logger` with a timestamped, coloured format:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug (or -v): Composed jpegoptim commands and exit statuses
// - RUST_LOG=trace: Every classified output line
//
// With --log-file, records are written to that file through the core
// library's log4rs setup instead. A directory gets a timestamped file.

use crate::error::{CliErrorContext, CliResult};

use console::{Style, style};
use log::{Level, LevelFilter};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// ```
/// let log_filename = format!("optijpeg_{}.log", optijpeg_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("optijpeg_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => Style::new().red().bold(),
        Level::Warn => Style::new().yellow().bold(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().cyan(),
        Level::Trace => Style::new().dim(),
    }
    .for_stderr()
}

/// Level used when RUST_LOG is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Resolves `--log-file`: directories receive `optijpeg_<timestamp>.log`.
pub fn resolve_log_path(log_file: &Path) -> PathBuf {
    if log_file.is_dir() {
        log_file.join(format!("optijpeg_{}.log", get_timestamp()))
    } else {
        log_file.to_path_buf()
    }
}

/// Installs the global logger, either on stderr or into `log_file`.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = default_level(verbose);

    if let Some(log_file) = log_file {
        let path = resolve_log_path(log_file);
        return optijpeg_core::file_logging::setup_file_logging(&path, level)
            .cli_with_context(|| format!("Failed to set up log file '{}'", path.display()));
    }

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                style(chrono::Local::now().format("%H:%M:%S")).dim().for_stderr(),
                level_style(record.level()).apply_to(format!("{:<5}", record.level())),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| optijpeg_core::CoreError::Logging(e.to_string()))
}
