//! Resolver configuration, loadable from JSON.

use std::path::Path;

use anyhow::{Context as _, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::domain::builder::DEFAULT_MAX_NODES;
use crate::domain::mock::DefaultValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Node-count ceiling of a single dependency tree
    pub max_nodes: usize,
    /// Policy for unconfigured sequence-returning mock calls
    pub default_value: DefaultValue,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            default_value: DefaultValue::Empty,
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse resolver config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_default_value(mut self, default_value: DefaultValue) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_nodes > 0, "max_nodes must be at least 1");
        Ok(())
    }
}
