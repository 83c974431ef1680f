//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Configuration is fixed at process start; there is no runtime reload.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::label::ScenarioLabel;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub serial: SerialConfig,
    pub dataset: DatasetConfig,
    pub scenario: ScenarioConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Dataset file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

/// Logging scenario configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    #[serde(default = "default_jam_label")]
    pub jam_label: u8,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 115_200 }
fn default_timeout_ms() -> u64 { 1000 }
fn default_reconnect_interval_ms() -> u64 { 2000 }

fn default_dataset_path() -> String { "lora_jamming_dataset.csv".to_string() }

fn default_jam_label() -> u8 { 0 }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(crate::error::LoggerError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if self.serial.baud_rate == 0 {
            return Err(crate::error::LoggerError::Config(
                toml::de::Error::custom("baud_rate must be greater than 0")
            ));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(crate::error::LoggerError::Config(
                toml::de::Error::custom("timeout_ms must be between 1 and 10000")
            ));
        }

        if self.serial.reconnect_interval_ms == 0 || self.serial.reconnect_interval_ms > 60000 {
            return Err(crate::error::LoggerError::Config(
                toml::de::Error::custom("reconnect_interval_ms must be between 1 and 60000")
            ));
        }

        if self.dataset.path.is_empty() {
            return Err(crate::error::LoggerError::Config(
                toml::de::Error::custom("dataset path cannot be empty")
            ));
        }

        // The label must have an entry in the action table before logging starts
        self.scenario_label()?;

        Ok(())
    }

    /// Resolve the configured jam label against the action table
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::UnknownLabel` if the configured value has no
    /// entry in the action table; this is fatal at startup.
    pub fn scenario_label(&self) -> Result<ScenarioLabel> {
        ScenarioLabel::from_config(self.scenario.jam_label)
    }
}
