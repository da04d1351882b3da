use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use tickmeter_core::error::{MetricsError, Result};
use tickmeter_core::labels::{is_valid_label_value, is_valid_name};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub push: PushSection,

    #[serde(default)]
    pub http: HttpSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.registry.validate()?;
        self.push.validate()?;
        self.http.validate()?;

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Applied to every metric the agent registers.
    #[serde(default)]
    pub const_labels: BTreeMap<String, String>,
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        for (k, v) in &self.const_labels {
            if !is_valid_name(k) {
                return Err(MetricsError::Config(format!(
                    "registry.const_labels: invalid label name {k:?}"
                )));
            }
            if !is_valid_label_value(v) {
                return Err(MetricsError::Config(format!(
                    "registry.const_labels.{k}: invalid label value {v:?}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushSection {
    #[serde(default = "default_push_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            enabled: default_push_enabled(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PushSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(MetricsError::Config(
                "push.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl HttpSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| MetricsError::Config(format!("http.listen {:?}: {e}", self.listen)))
    }
}

fn default_push_enabled() -> bool {
    true
}
fn default_interval_ms() -> u64 {
    10_000
}
fn default_listen() -> String {
    "0.0.0.0:9102".into()
}
