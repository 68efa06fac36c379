//! Plugin configuration.
//!
//! Every field has a default, so `{}` is a complete configuration: all
//! categories, `info` logging, synchronous execution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stew_gen::select::{Filters, SelectError};
use stew_sandbox::{ExecutionMode, SandboxConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Identity the plugin registers under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub short_description: String,
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self {
            name: "mystery-stew".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Synthetic actions covering every parameter shape the host exposes. \
                          Each action echoes what it received so interfaces can be checked \
                          for exact round trips."
                .to_string(),
            short_description: "Interface test actions".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StewConfig {
    pub plugin: PluginInfo,
    /// Category name to enabled. Empty selects every category.
    pub filters: BTreeMap<String, bool>,
    /// Fallback when `RUST_LOG` is unset.
    pub log_level: String,
    /// How the reference host runs echo bodies.
    pub execution: ExecutionMode,
}

impl Default for StewConfig {
    fn default() -> Self {
        Self {
            plugin: PluginInfo::default(),
            filters: BTreeMap::new(),
            log_level: "info".to_string(),
            execution: ExecutionMode::Sync,
        }
    }
}

impl StewConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parsed category filters. Unknown names are an error.
    pub fn selection(&self) -> Result<Filters, SelectError> {
        Filters::from_map(&self.filters)
    }

    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig::with_mode(self.execution)
    }
}
