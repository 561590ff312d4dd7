//! Registry credential sources.
//!
//! Hosted deployments mount secrets as files in a directory; local runs
//! export them as environment variables. [`select_provider`] picks the
//! mounted directory whenever it exists.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::CredentialError;

/// Resolves a named secret to its value.
pub trait CredentialProvider: Send + Sync {
    fn source(&self) -> CredentialSource;

    fn get_secret(&self, name: &str) -> Result<String, CredentialError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    SecretsDir,
    Environment,
}

impl Display for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecretsDir => f.write_str("secrets-dir"),
            Self::Environment => f.write_str("environment"),
        }
    }
}

/// Reads secrets from a mounted directory, one file per secret.
#[derive(Debug, Clone)]
pub struct SecretsDirProvider {
    dir: PathBuf,
}

impl SecretsDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Capability check: the secrets mount is present in this environment.
    pub fn is_available(dir: &Path) -> bool {
        dir.is_dir()
    }
}

impl CredentialProvider for SecretsDirProvider {
    fn source(&self) -> CredentialSource {
        CredentialSource::SecretsDir
    }

    fn get_secret(&self, name: &str) -> Result<String, CredentialError> {
        let path = self.dir.join(name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::MissingFile {
                    name: name.to_owned(),
                    dir: self.dir.clone(),
                });
            }
            Err(source) => {
                return Err(CredentialError::Unreadable {
                    name: name.to_owned(),
                    path,
                    source,
                });
            }
        };

        let value = raw.trim_end();
        if value.is_empty() {
            return Err(CredentialError::Empty {
                name: name.to_owned(),
            });
        }
        Ok(value.to_owned())
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads secrets from environment variables.
#[derive(Clone)]
pub struct EnvCredentialProvider {
    lookup: EnvLookup,
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self {
            lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `lookup` in place of the process environment.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

impl std::fmt::Debug for EnvCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvCredentialProvider").finish_non_exhaustive()
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn source(&self) -> CredentialSource {
        CredentialSource::Environment
    }

    fn get_secret(&self, name: &str) -> Result<String, CredentialError> {
        match (self.lookup)(name) {
            None => Err(CredentialError::MissingEnv {
                name: name.to_owned(),
            }),
            Some(value) if value.trim().is_empty() => Err(CredentialError::Empty {
                name: name.to_owned(),
            }),
            Some(value) => Ok(value),
        }
    }
}

/// Picks the secrets directory when mounted, the environment otherwise.
pub fn select_provider(secrets_dir: &Path) -> Box<dyn CredentialProvider> {
    if SecretsDirProvider::is_available(secrets_dir) {
        debug!(dir = %secrets_dir.display(), "using mounted secrets directory");
        Box::new(SecretsDirProvider::new(secrets_dir))
    } else {
        debug!("secrets directory not mounted; reading credentials from environment");
        Box::new(EnvCredentialProvider::new())
    }
}
