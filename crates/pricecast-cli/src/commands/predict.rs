use pricecast_core::{load_local, load_model_from_registry, PredictionService, ServiceConfig};
use serde_json::Value;
use tracing::info;

use crate::cli::{PredictArgs, PredictLocalArgs};
use crate::error::CliError;

use super::score;

pub async fn run(args: &PredictArgs, config: &ServiceConfig) -> Result<Value, CliError> {
    let loaded = load_model_from_registry(config).await?;
    info!(
        version = %loaded.version.version,
        artifact = %loaded.artifact_path.display(),
        "serving production model"
    );

    let service = PredictionService::from_predictor(loaded.predictor);
    score(&service, &args.input)
}

pub fn run_local(args: &PredictLocalArgs) -> Result<Value, CliError> {
    let service = PredictionService::from_predictor(load_local(&args.artifact)?);
    score(&service, &args.input)
}
