//! File logging.
//!
//! The terminal is in raw mode on the alternate screen while playing, so log
//! output always goes to a file.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}";

/// Build the log4rs configuration for a file at `file_path`.
pub fn log_config(level: LevelFilter, file_path: &str) -> Result<Config> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(file_path)
        .with_context(|| format!("opening log file {file_path}"))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .context("building log config")?;

    Ok(config)
}

/// Install the global logger. Can only succeed once per process.
pub fn init_log(level: LevelFilter, file_path: &str) -> Result<()> {
    let config = log_config(level, file_path)?;
    log4rs::init_config(config).context("installing logger")?;
    Ok(())
}
