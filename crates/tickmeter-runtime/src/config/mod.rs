//! Agent config loader (strict parsing).

pub mod schema;

use std::fs;

use tickmeter_core::error::{MetricsError, Result};

use crate::registry::{Registry, RegistryOption};

pub use schema::{AgentConfig, HttpSection, PushSection, RegistrySection};

pub fn load_from_file(path: &str) -> Result<AgentConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AgentConfig> {
    let cfg: AgentConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

impl AgentConfig {
    /// Registry seeded with the configured constant labels.
    pub fn build_registry(&self) -> Registry {
        Registry::new([RegistryOption::Labeled(
            self.registry.const_labels.clone(),
        )])
    }
}
