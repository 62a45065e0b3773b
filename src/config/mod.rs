use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Limits applied by the job registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Number of most recently created jobs kept in memory
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Longest countdown a job may request; unlimited when unset
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_delay: Option<Duration>,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Job defaults
fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            max_delay: None,
        }
    }
}

impl JobsConfig {
    /// Longest accepted delay in whole seconds, if capped
    pub fn max_delay_seconds(&self) -> Option<u64> {
        self.max_delay.map(|max| max.as_secs())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_history == 0 {
            return Err(AppError::configuration("jobs.max_history must be at least 1"));
        }
        if self.max_delay_seconds() == Some(0) {
            return Err(AppError::configuration(
                "jobs.max_delay must be at least one second",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            jobs: JobsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, writing out the defaults when the
    /// file does not exist yet
    pub fn load_from_file(config_file: impl AsRef<Path>) -> Result<Self> {
        let config_file = config_file.as_ref();
        let config = if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str::<Config>(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.jobs.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.jobs.max_history, 10);
        assert_eq!(config.jobs.max_delay, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 9090

            [jobs]
            max_delay = "2h"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 9090);
        assert_eq!(config.jobs.max_history, 10);
        assert_eq!(config.jobs.max_delay_seconds(), Some(7200));
    }

    #[test]
    fn test_invalid_limits_rejected_as_configuration_errors() {
        let config: Config = toml::from_str("[jobs]\nmax_history = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("max_history"));

        let config: Config = toml::from_str("[jobs]\nmax_delay = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.jobs.max_history, 10);
        assert!(path.exists());

        let reloaded = Config::load_from_file(&path).unwrap();
        assert_eq!(reloaded.web.port, config.web.port);
        assert_eq!(reloaded.jobs.max_delay, config.jobs.max_delay);
    }
}
