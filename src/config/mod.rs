//! Evaluation Configuration
//!
//! Alphabet, long-word threshold and report mode, stored in TOML format.

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EvalError;
use crate::labels::{Alphabet, DEFAULT_ALPHABET};

/// Evaluation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Label filtering settings
    pub labels: LabelSettings,
    /// Metric settings
    pub metrics: MetricSettings,
    /// Report settings
    pub report: ReportSettings,
}

/// Label-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Admissible characters; labels with other characters are skipped
    pub alphabet: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

/// Metric-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSettings {
    /// Minimum target length of a long word
    pub long_word_min_len: usize,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self { long_word_min_len: 10 }
    }
}

/// Report-related settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Which report to print
    pub mode: ReportMode,
}

/// Report selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Accuracy and normalized edit distance table
    #[default]
    General,
    /// Character confusion matrices
    Full,
}

impl EvalConfig {
    /// Parsed alphabet
    pub fn alphabet(&self) -> Alphabet {
        Alphabet::new(&self.labels.alphabet)
    }

    /// Reject settings that cannot produce a meaningful report
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.alphabet().is_empty() {
            return Err(EvalError::config("alphabet must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<EvalConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvalConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &EvalConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Default configuration file location, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "ocreval", "ocr-eval")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
