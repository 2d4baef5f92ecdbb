use crate::error::FlavorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the flavor to use.
pub const FLAVOR_ENV_VAR: &str = "MYSQL_FLAVOR";

/// Flavor picked when nothing is configured and more than one is registered.
pub const DEFAULT_FLAVOR: &str = "GoogleMysql";

/// What the registry does when a flavor name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorConfig {
    /// Explicitly requested flavor. `None` means implicit resolution.
    pub flavor: Option<String>,
    pub default_flavor: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Delay between status queries in `ActiveFlavor::poll_master_pos`
    pub wait_poll_interval_ms: u64,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            flavor: None,
            default_flavor: DEFAULT_FLAVOR.to_string(),
            duplicate_policy: DuplicatePolicy::Reject,
            wait_poll_interval_ms: 100,
        }
    }
}

impl FlavorConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FlavorError::Config(format!("cannot read {}: {}", path, e)))?;
        let mut config: FlavorConfig = toml::from_str(&content)
            .map_err(|e| FlavorError::Config(e.to_string()))?;
        config.flavor = normalize(config.flavor);
        Ok(config)
    }

    pub fn from_env() -> Self {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_env_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_env_override(lookup)
    }

    /// A non-empty `MYSQL_FLAVOR` wins over whatever the file said.
    pub fn with_env_override<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flavor) = normalize(lookup(FLAVOR_ENV_VAR)) {
            self.flavor = Some(flavor);
        }
        self
    }

    pub fn wait_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wait_poll_interval_ms)
    }

    pub fn requested_flavor(&self) -> Option<&str> {
        self.flavor.as_deref().filter(|f| !f.is_empty())
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.default_flavor.trim().is_empty() {
            return Err(FlavorError::InvalidConfig(
                "default_flavor cannot be empty".to_string(),
            ));
        }

        if self.default_flavor.contains('/') {
            return Err(FlavorError::InvalidConfig(format!(
                "default_flavor {:?} must not contain '/'",
                self.default_flavor
            )));
        }

        if let Some(flavor) = self.requested_flavor() {
            if flavor.contains('/') {
                return Err(FlavorError::InvalidConfig(format!(
                    "flavor {:?} must not contain '/'",
                    flavor
                )));
            }
        }

        if self.wait_poll_interval_ms == 0 {
            return Err(FlavorError::InvalidConfig(
                "wait_poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
