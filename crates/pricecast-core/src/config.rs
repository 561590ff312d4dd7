//! Service configuration.
//!
//! Every field has a default matching the deployed model; each can be
//! overridden through a `PRICECAST_*` environment variable.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_REGISTRY_URL: &str = "https://www.comet.com";
pub const DEFAULT_WORKSPACE: &str = "paulescu";
pub const DEFAULT_MODEL_NAME: &str = "linear-model";
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/pricecast";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Name of the registry API key secret in both credential sources.
pub const API_KEY_SECRET: &str = "COMET_ML_API_KEY";

pub const ENV_REGISTRY_URL: &str = "PRICECAST_REGISTRY_URL";
pub const ENV_WORKSPACE: &str = "PRICECAST_WORKSPACE";
pub const ENV_MODEL_NAME: &str = "PRICECAST_MODEL_NAME";
pub const ENV_ARTIFACT_DIR: &str = "PRICECAST_ARTIFACT_DIR";
pub const ENV_SECRETS_DIR: &str = "PRICECAST_SECRETS_DIR";
pub const ENV_TIMEOUT_MS: &str = "PRICECAST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub registry_url: String,
    pub workspace: String,
    pub model_name: String,
    pub artifact_dir: PathBuf,
    pub secrets_dir: PathBuf,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry_url: String::from(DEFAULT_REGISTRY_URL),
            workspace: String::from(DEFAULT_WORKSPACE),
            model_name: String::from(DEFAULT_MODEL_NAME),
            artifact_dir: PathBuf::from("./"),
            secrets_dir: PathBuf::from(DEFAULT_SECRETS_DIR),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    /// Builds the config from defaults plus process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from defaults plus overrides supplied by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_REGISTRY_URL) {
            config.registry_url = url;
        }
        if let Some(workspace) = lookup(ENV_WORKSPACE) {
            config.workspace = workspace;
        }
        if let Some(model_name) = lookup(ENV_MODEL_NAME) {
            config.model_name = model_name;
        }
        if let Some(dir) = lookup(ENV_ARTIFACT_DIR) {
            config.artifact_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_SECRETS_DIR) {
            config.secrets_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_TIMEOUT_MS,
                value: raw.clone(),
                reason: "expected an integer number of milliseconds",
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                field: "registry_url",
            });
        }
        if self.workspace.trim().is_empty() {
            return Err(ConfigError::EmptyValue { field: "workspace" });
        }
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                field: "model_name",
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: ENV_TIMEOUT_MS,
                value: String::from("0"),
                reason: "timeout must be greater than zero",
            });
        }
        Ok(())
    }
}
