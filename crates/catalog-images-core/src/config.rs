use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Media types accepted when no explicit list is configured
pub const DEFAULT_ALLOWED_MEDIA_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/webp", "image/jpg"];

/// How a candidate file is identified for duplicate detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// Name, size, media type and modification time
    Signature,

    /// Blake3 digest of the file content, signature as per-file fallback
    ContentHash,
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for the file validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Largest accepted file, in mebibytes
    pub max_file_size_mib: u64,

    /// Exact media types, or media types whose top-level part is accepted
    pub allowed_media_types: Vec<String>,

    /// Identity used for the duplicate checks
    pub identity: IdentityStrategy,

    /// Number of threads used for content hashing (0 = auto)
    pub threads: usize,
}

impl ValidatorConfig {
    /// Size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mib.saturating_mul(1024 * 1024)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_file_size_mib: 5,
            allowed_media_types: DEFAULT_ALLOWED_MEDIA_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            identity: IdentityStrategy::ContentHash,
            threads: 0, // Auto
        }
    }
}

/// Configuration for a product image collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validator settings
    pub validator: ValidatorConfig,

    /// Maximum number of images a product can hold
    pub capacity: usize,

    /// Storage category passed to the uploader
    pub upload_category: String,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            capacity: 10,
            upload_category: "products".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Configuration(
                "Collection capacity must be at least 1".to_string(),
            ));
        }

        if self.validator.max_file_size_mib == 0 {
            return Err(Error::Configuration(
                "Maximum file size must be at least 1 MiB".to_string(),
            ));
        }

        if self.validator.allowed_media_types.is_empty() {
            return Err(Error::Configuration(
                "At least one allowed media type is required".to_string(),
            ));
        }

        for media_type in &self.validator.allowed_media_types {
            let well_formed = media_type
                .split_once('/')
                .map(|(top, sub)| !top.is_empty() && !sub.is_empty())
                .unwrap_or(false);
            if !well_formed {
                return Err(Error::Configuration(format!(
                    "Malformed media type '{}', expected 'type/subtype'",
                    media_type
                )));
            }
        }

        Ok(())
    }
}
