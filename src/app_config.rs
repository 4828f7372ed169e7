use std::path::Path;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::export::OutputFormat;
use crate::scene::SceneThresholds;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Scene segmentation thresholds
    #[serde(default)]
    pub segmentation: SceneThresholds,

    /// Line wrapping limits
    #[serde(default)]
    pub wrapping: WrapConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Artifact formats produced per job
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<OutputFormat>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Line wrapping configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct WrapConfig {
    /// Target maximum characters per line
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Maximum number of lines per scene
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            max_lines: default_max_lines(),
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct BatchConfig {
    /// Maximum number of jobs processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Retry budget for transient source failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff between retries in ms, scaled linearly per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Status poll interval in ms for the CLI progress loop
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_max_line_length() -> usize {
    35
}

fn default_max_lines() -> usize {
    2
}

fn default_concurrency() -> usize {
    4
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_output_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Jsx]
}

impl Config {
    /// Load configuration from a JSON file, creating a default one when the
    /// file does not exist yet
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.wrapping.max_line_length == 0 {
            return Err(anyhow!("max_line_length must be greater than zero"));
        }
        if self.wrapping.max_lines == 0 {
            return Err(anyhow!("max_lines must be greater than zero"));
        }
        if self.batch.concurrency == 0 {
            return Err(anyhow!("batch concurrency must be greater than zero"));
        }
        if self.segmentation.max_scene_ms < self.segmentation.soft_break_ms {
            return Err(anyhow!(
                "max_scene_ms ({}) must be at least soft_break_ms ({})",
                self.segmentation.max_scene_ms,
                self.segmentation.soft_break_ms
            ));
        }
        if self.output_formats.is_empty() {
            return Err(anyhow!("at least one output format is required"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            segmentation: SceneThresholds::default(),
            wrapping: WrapConfig::default(),
            batch: BatchConfig::default(),
            output_formats: default_output_formats(),
            log_level: LogLevel::default(),
        }
    }
}
