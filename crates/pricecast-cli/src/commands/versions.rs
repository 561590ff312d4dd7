use std::sync::Arc;

use pricecast_core::{select_provider, ModelLoader, ReqwestHttpClient, ServiceConfig};
use serde_json::Value;

use crate::error::CliError;

pub async fn run(config: &ServiceConfig) -> Result<Value, CliError> {
    let credentials = select_provider(&config.secrets_dir);
    let loader = ModelLoader::from_config(
        config,
        Arc::new(ReqwestHttpClient::new()),
        credentials.as_ref(),
    )?;

    let versions = loader
        .registry()
        .get_model_versions(&config.workspace, &config.model_name)
        .await
        .map_err(pricecast_core::LoadError::from)?;

    Ok(serde_json::to_value(versions)?)
}
