//! Startup model loading.
//!
//! Runs once before any request is served: find the production version,
//! download its artifact, deserialize it. Every failure here is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::artifact::{LinearPipeline, ModelArtifact};
use crate::config::{ServiceConfig, API_KEY_SECRET};
use crate::credentials::{select_provider, CredentialProvider};
use crate::error::LoadError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::registry::{ModelVersion, RegistryClient};

pub const PRODUCTION_STATUS: &str = "production";

/// A model ready to serve, with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub version: ModelVersion,
    pub artifact_path: PathBuf,
    pub predictor: LinearPipeline,
}

#[derive(Debug, Clone)]
pub struct ModelLoader {
    registry: RegistryClient,
    workspace: String,
    model_name: String,
    artifact_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(
        registry: RegistryClient,
        workspace: impl Into<String>,
        model_name: impl Into<String>,
        artifact_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            workspace: workspace.into(),
            model_name: model_name.into(),
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Wires a loader from configuration, fetching the API key from `credentials`.
    pub fn from_config(
        config: &ServiceConfig,
        http_client: Arc<dyn HttpClient>,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        let api_key = credentials.get_secret(API_KEY_SECRET)?;
        info!(source = %credentials.source(), "registry credentials resolved");

        let registry = RegistryClient::new(http_client, &config.registry_url, api_key)
            .with_timeout_ms(config.timeout_ms);

        Ok(Self::new(
            registry,
            &config.workspace,
            &config.model_name,
            config.artifact_dir.clone(),
        ))
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// First production version in registry order.
    pub async fn select_production_version(&self) -> Result<ModelVersion, LoadError> {
        let mut candidates = self
            .registry
            .find_versions(&self.workspace, &self.model_name, PRODUCTION_STATUS)
            .await?;

        if candidates.is_empty() {
            error!(
                workspace = %self.workspace,
                model = %self.model_name,
                "No production version found for model"
            );
            return Err(LoadError::NoProductionVersion {
                workspace: self.workspace.clone(),
                model: self.model_name.clone(),
            });
        }

        if candidates.len() > 1 {
            warn!(
                count = candidates.len(),
                "multiple production versions; using the first listed"
            );
        }
        Ok(candidates.swap_remove(0))
    }

    pub async fn load(&self) -> Result<LoadedModel, LoadError> {
        let version = self.select_production_version().await?;
        info!(
            model = %self.model_name,
            version = %version.version,
            "selected production model version"
        );

        let artifact_path = self
            .registry
            .download_registry_model(
                &self.workspace,
                &self.model_name,
                &version.version,
                &self.artifact_dir,
            )
            .await?;

        let predictor = load_local(&artifact_path)?;
        Ok(LoadedModel {
            version,
            artifact_path,
            predictor,
        })
    }
}

/// Deserializes an artifact already on local storage.
pub fn load_local(path: &Path) -> Result<LinearPipeline, LoadError> {
    let predictor = ModelArtifact::from_path(path)?.into_predictor()?;
    info!(
        path = %path.display(),
        features = predictor.feature_names().len(),
        "model loaded into memory"
    );
    Ok(predictor)
}

/// Loads the production model using the live registry and the credential
/// source available in this environment.
pub async fn load_model_from_registry(config: &ServiceConfig) -> Result<LoadedModel, LoadError> {
    let credentials = select_provider(&config.secrets_dir);
    let loader = ModelLoader::from_config(
        config,
        Arc::new(ReqwestHttpClient::new()),
        credentials.as_ref(),
    )?;
    loader.load().await
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::credentials::EnvCredentialProvider;
    use crate::error::CredentialError;
    use crate::http_client::ScriptedHttpClient;

    #[test]
    fn from_config_requires_api_key() {
        let credentials = EnvCredentialProvider::with_lookup(|_| None);

        let error = ModelLoader::from_config(
            &ServiceConfig::default(),
            Arc::new(ScriptedHttpClient::new()),
            &credentials,
        )
        .expect_err("no key");

        assert!(matches!(
            error,
            LoadError::Credential(CredentialError::MissingEnv { ref name }) if name == API_KEY_SECRET
        ));
    }

    #[test]
    fn load_local_reports_missing_file() {
        let dir = tempdir().expect("tempdir");

        let error = load_local(&dir.path().join("model.json")).expect_err("absent");
        assert!(matches!(error, LoadError::Artifact(_)));
    }
}
