use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::eval::selector::compile_selector;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub metric: MetricConfig,
}

/// Evaluation run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Length of the top-N list requested from the recommender.
    #[serde(default = "default_list_size")]
    pub list_size: usize,
    /// Overrides the name stored in the dataset file.
    #[serde(default)]
    pub dataset_name: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            list_size: default_list_size(),
            dataset_name: None,
        }
    }
}

/// MRR metric configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricConfig {
    /// Good-items selector expression; `user.testItems` when unset.
    #[serde(default)]
    pub good_items: Option<String>,
    /// Suffix appended to output column names.
    #[serde(default)]
    pub suffix: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_list_size() -> usize {
    10
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in TOPN_EVAL_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("TOPN_EVAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.eval.list_size == 0 {
            anyhow::bail!("eval.list_size must be greater than 0");
        }

        if let Some(ref expr) = self.metric.good_items {
            compile_selector(expr)
                .with_context(|| format!("metric.good_items is not a valid selector: {}", expr))?;
        }

        if let Some(ref suffix) = self.metric.suffix {
            if suffix.trim().is_empty() {
                anyhow::bail!("metric.suffix must not be blank (omit it for no suffix)");
            }
        }

        Ok(())
    }
}
