//! Configuration system for the cohort balancer.
//!
//! Load run configuration from TOML (or YAML) files to control group
//! sizing, the solve budget, and file naming without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use std::time::Duration;
//! use cohort_config::CohortConfig;
//!
//! let config = CohortConfig::from_toml_str(r#"
//!     min_group_size = 6
//!     time_limit_seconds = 45
//!
//!     [input]
//!     id_column = "Animal"
//!     tumor_size_column = "Volume"
//! "#).unwrap();
//!
//! assert_eq!(config.min_group_size, 6);
//! assert_eq!(config.time_limit(), Duration::from_secs(45));
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use cohort_config::CohortConfig;
//!
//! let config = CohortConfig::load("cohort.toml").unwrap_or_default();
//! assert_eq!(config.min_group_size, 5);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum number of subjects per group.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 5;

/// Default solve budget in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 30.0;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CohortConfig {
    /// Minimum number of subjects per group.
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    /// Wall-clock budget for the optimization, in seconds.
    #[serde(default = "default_time_limit_seconds")]
    pub time_limit_seconds: f64,

    /// Write the constructed model as an `.lp` file.
    #[serde(default)]
    pub save_model: bool,

    /// Input column naming.
    #[serde(default)]
    pub input: InputColumns,

    /// Output file naming.
    #[serde(default)]
    pub output: OutputFiles,
}

/// Header names expected in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InputColumns {
    /// Header of the subject-id column.
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Header of the tumor-size column.
    #[serde(default = "default_tumor_size_column")]
    pub tumor_size_column: String,
}

/// File names used inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputFiles {
    /// Results workbook.
    #[serde(default = "default_workbook_file_name")]
    pub workbook_file_name: String,

    /// Optimization-model dump, written when `save_model` is set.
    #[serde(default = "default_model_file_name")]
    pub model_file_name: String,
}

impl Default for CohortConfig {
    fn default() -> Self {
        CohortConfig {
            min_group_size: default_min_group_size(),
            time_limit_seconds: default_time_limit_seconds(),
            save_model: false,
            input: InputColumns::default(),
            output: OutputFiles::default(),
        }
    }
}

impl Default for InputColumns {
    fn default() -> Self {
        InputColumns {
            id_column: default_id_column(),
            tumor_size_column: default_tumor_size_column(),
        }
    }
}

impl Default for OutputFiles {
    fn default() -> Self {
        OutputFiles {
            workbook_file_name: default_workbook_file_name(),
            model_file_name: default_model_file_name(),
        }
    }
}

impl CohortConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the minimum group size.
    pub fn with_min_group_size(mut self, min_group_size: usize) -> Self {
        self.min_group_size = min_group_size;
        self
    }

    /// Sets the solve budget in seconds.
    pub fn with_time_limit_seconds(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// Enables or disables the model dump.
    pub fn with_save_model(mut self, save_model: bool) -> Self {
        self.save_model = save_model;
        self
    }

    /// The solve budget as a [`Duration`].
    ///
    /// Falls back to the default budget when the configured value cannot
    /// form a duration; [`validate`](Self::validate) rejects such values.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_seconds)
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS as u64))
    }

    /// Checks the configuration for values no run can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_group_size == 0 {
            return Err(ConfigError::Invalid(
                "min_group_size must be positive".into(),
            ));
        }
        if !self.time_limit_seconds.is_finite() || self.time_limit_seconds <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_limit_seconds must be a positive number, got {}",
                self.time_limit_seconds
            )));
        }
        if self.input.id_column.trim().is_empty() || self.input.tumor_size_column.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "input column names must not be empty".into(),
            ));
        }
        if self.input.id_column == self.input.tumor_size_column {
            return Err(ConfigError::Invalid(format!(
                "id and tumor-size columns cannot share the name \"{}\"",
                self.input.id_column
            )));
        }
        if !self.output.model_file_name.ends_with(".lp") {
            return Err(ConfigError::Invalid(format!(
                "model_file_name must end with \".lp\", got \"{}\"",
                self.output.model_file_name
            )));
        }
        Ok(())
    }
}

fn default_min_group_size() -> usize {
    DEFAULT_MIN_GROUP_SIZE
}

fn default_time_limit_seconds() -> f64 {
    DEFAULT_TIME_LIMIT_SECS
}

fn default_id_column() -> String {
    "Mouse ID".to_owned()
}

fn default_tumor_size_column() -> String {
    "Tumor size".to_owned()
}

fn default_workbook_file_name() -> String {
    "mouse_grouping.xlsx".to_owned()
}

fn default_model_file_name() -> String {
    "mouse_grouping.lp".to_owned()
}

#[cfg(test)]
mod tests;
