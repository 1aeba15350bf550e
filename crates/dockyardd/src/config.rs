//! Daemon configuration
//!
//! Every field has a default, so the daemon runs without a config file.
//!
//! ```toml
//! [server]
//! port = 8080
//! request_timeout_secs = 30
//!
//! [aws]
//! region = "us-east-1"
//! profile = "ops"
//!
//! [backends]
//! ecs = true
//! eks = true
//!
//! [aggregator]
//! max_concurrency = 4
//! ```

use std::path::Path;
use std::time::Duration;

use dockyard_core::Scheduler;
use dockyard_gateway::AggregatorConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub backends: BackendsConfig,
    pub aggregator: AggregatorSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Deadline for one API request's backend work
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// AWS session settings; unset values fall back to the default chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Which backends are registered, in list-all order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    pub ecs: bool,
    pub eks: bool,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            ecs: true,
            eks: true,
        }
    }
}

impl BackendsConfig {
    /// Enabled schedulers in registration order
    pub fn enabled(&self) -> Vec<Scheduler> {
        Scheduler::ALL
            .into_iter()
            .filter(|s| match s {
                Scheduler::Ecs => self.ecs,
                Scheduler::Eks => self.eks,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AggregatorSection {
    pub max_concurrency: usize,
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl DaemonConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.aggregator.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "aggregator.max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            max_concurrency: self.aggregator.max_concurrency,
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
        }
    }
}
