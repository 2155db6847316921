//! Endpoint configuration loading and management
//!
//! Configuration is constructed once at startup and treated as immutable
//! afterwards; handlers only ever read it through an `Arc`.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration for a CRUD endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrudConfig {
    /// Upper bound on the number of items a single list request may return.
    /// Requests without a range are capped here; requests asking for more
    /// are rejected with 400.
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

fn default_max_limit() -> u64 {
    1000
}

impl Default for CrudConfig {
    fn default() -> Self {
        CrudConfig {
            max_limit: default_max_limit(),
        }
    }
}

impl CrudConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
