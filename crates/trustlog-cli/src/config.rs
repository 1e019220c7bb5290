use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trustlog_engine::AnalysisOptions;
use trustlog_providers::DiscoveryConfig;

pub const DEFAULT_CONFIG_FILE: &str = "trustlog.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise look next to the logs
    pub fn resolve(explicit: Option<&Path>, log_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => {
                anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
                Self::load_from(path)
            }
            None => Self::load_from(&Self::default_path(log_dir)),
        }
    }

    pub fn default_path(log_dir: &Path) -> PathBuf {
        log_dir.join(DEFAULT_CONFIG_FILE)
    }
}
