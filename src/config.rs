//! Configuration for TarangIO
//!
//! Loads configuration from a TOML file: sensor mounting pose, reader
//! buffer policy, input source and logging.

use crate::core::pose::SensorPose;
use crate::devices::mmwave::constants::{
    DEFAULT_KEEP_TAIL_BYTES, DEFAULT_MAX_BUFFER_BYTES, HEADER_SIZE,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sensor mounting pose in the shared frame
    pub sensor: SensorPose,
    pub reader: ReaderConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

/// What to do with the buffer after a corrupt header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResyncPolicy {
    /// Drop bytes through the bad magic word and rescan
    #[default]
    SkipByte,
    /// Drop everything buffered
    DropBuffer,
}

/// Stream buffer policy
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Upper bound on buffered bytes, and so on the longest deliverable frame
    pub max_buffer_bytes: usize,
    /// Trailing bytes kept when trimming
    pub keep_tail_bytes: usize,
    pub resync: ResyncPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            keep_tail_bytes: DEFAULT_KEEP_TAIL_BYTES,
            resync: ResyncPolicy::SkipByte,
        }
    }
}

/// Byte source for the replay daemon
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Capture file path, or `-` for stdin
    pub path: String,
    /// Sleep between reads that return no data
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: "-".to_string(),
            poll_interval_ms: 10,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use tarang_io::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("tarangio.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            log::warn!("Config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the reader cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.reader.max_buffer_bytes < HEADER_SIZE {
            return Err(Error::InvalidParameter(format!(
                "reader.max_buffer_bytes ({}) cannot hold a {} byte frame header",
                self.reader.max_buffer_bytes, HEADER_SIZE
            )));
        }
        if self.reader.keep_tail_bytes > self.reader.max_buffer_bytes {
            return Err(Error::InvalidParameter(format!(
                "reader.keep_tail_bytes ({}) exceeds reader.max_buffer_bytes ({})",
                self.reader.keep_tail_bytes, self.reader.max_buffer_bytes
            )));
        }
        let angles = [self.sensor.yaw, self.sensor.pitch, self.sensor.roll];
        let coords = [self.sensor.x, self.sensor.y, self.sensor.z];
        if angles.iter().chain(&coords).any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter(
                "sensor pose values must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
