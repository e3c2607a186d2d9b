use crate::error::{CoreError, CoreResult};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;

/// Line format used for log files.
pub const DEFAULT_LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";

/// Routes every `log` record at or above `log_level` to `log_file`.
///
/// Creates missing parent directories. Fails if a global logger is already
/// installed.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter) -> CoreResult<()> {
    // Create log directory if it doesn't exist
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build(log_file)?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(Root::builder().appender("file").build(log_level))
        .map_err(|e| CoreError::Logging(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| CoreError::Logging(e.to_string()))?;

    log::debug!("File logging initialised at {}", log_file.display());
    Ok(())
}
