use log::{info, warn, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Environment variable overriding the configured log level
pub const LOG_ENV_VAR: &str = "CATALOG_IMAGES_LOG";

/// Initialize a rolling file logger in `log_dir`.
///
/// Files rotate at 10MB and five archives are kept. The level comes from
/// `level` unless `CATALOG_IMAGES_LOG` holds a valid level name.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("catalog-images.log");
    let archived_logs_pattern = format!("{}/catalog-images.{{}}.log", log_dir.display());

    let file_trigger = SizeTrigger::new(10 * 1024 * 1024); // 10MB

    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern, 5)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;

    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))?;

    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(level);

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Log a content hash that could not be computed
pub fn log_hash_fallback(file_name: &str, error: &dyn std::error::Error) {
    warn!(
        "Content hash unavailable, using metadata signature - File: {}, Error: {}",
        file_name, error
    );
}

/// Log a change to an image collection
pub fn log_collection_change(operation: &str, entry_id: &str, details: Option<&str>) {
    let details_str = details.unwrap_or("");
    info!(
        "COLLECTION CHANGE - Operation: {}, Entry: {}{}",
        operation,
        entry_id,
        if details_str.is_empty() {
            "".to_string()
        } else {
            format!(", Details: {}", details_str)
        }
    );
}
