//! Configuration
//!
//! Batch settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults ([`BatchConfig::default`])
//! 2. A TOML config file (`./borderscan.toml`, then
//!    `<config dir>/borderscan/config.toml`, or an explicit path)
//! 3. Command-line overrides ([`CliOverrides`])
//!
//! Scan thresholds are not configurable here; see [`crate::ScanOptions`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::ReportFormat;

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Default output directory for cropped images
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default detection report file name
pub const DEFAULT_REPORT_PATH: &str = "border_detection_report.csv";

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "borderscan.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Resolved settings for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchConfig {
    /// Directory scanned for images
    pub input_dir: PathBuf,
    /// Directory receiving cropped images
    pub output_dir: PathBuf,
    /// Detection report destination
    pub report_path: PathBuf,
    /// Detection report format
    pub report_format: ReportFormat,
    /// Worker threads (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            report_format: ReportFormat::Csv,
            threads: None,
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    #[must_use]
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

/// Settings read from a config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
    pub threads: Option<usize>,
}

impl Config {
    /// Parse config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load from the first config file found in the search path.
    ///
    /// Returns the default config when none exists.
    pub fn load() -> Result<Self> {
        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Self::load_from_path(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Config file locations in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("borderscan").join("config.toml"));
        }
        paths
    }

    /// Apply CLI overrides on top of this file and the defaults
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> BatchConfig {
        let defaults = BatchConfig::default();
        BatchConfig {
            input_dir: cli
                .input_dir
                .clone()
                .or_else(|| self.input_dir.clone())
                .unwrap_or(defaults.input_dir),
            output_dir: cli
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone())
                .unwrap_or(defaults.output_dir),
            report_path: cli
                .report_path
                .clone()
                .or_else(|| self.report_path.clone())
                .unwrap_or(defaults.report_path),
            report_format: cli
                .report_format
                .or(self.report_format)
                .unwrap_or(defaults.report_format),
            threads: cli.threads.or(self.threads),
        }
    }
}

/// Values explicitly set on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}
