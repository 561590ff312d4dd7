mod predict;
mod sample;
mod versions;

use std::io::Read;

use pricecast_core::{PredictionService, ServiceConfig};
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, Command, InputArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Sample => sample::run(),
        Command::PredictLocal(args) => predict::run_local(args),
        Command::Predict(args) => predict::run(args, &resolve_config(cli)?).await,
        Command::Versions => versions::run(&resolve_config(cli)?).await,
    }
}

/// Environment config with command-line flags layered on top.
fn resolve_config(cli: &Cli) -> Result<ServiceConfig, CliError> {
    let mut config = ServiceConfig::from_env()?;

    if let Some(url) = &cli.registry_url {
        config.registry_url = url.clone();
    }
    if let Some(workspace) = &cli.workspace {
        config.workspace = workspace.clone();
    }
    if let Some(model_name) = &cli.model_name {
        config.model_name = model_name.clone();
    }
    if let Some(dir) = &cli.artifact_dir {
        config.artifact_dir = dir.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

/// Reads the feature record named by `--input`, or the sample record.
fn read_item(input: Option<&str>) -> Result<Value, CliError> {
    let raw = match input {
        None => return Ok(serde_json::to_value(sample::sample_record()?)?),
        Some("-") => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            raw
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    serde_json::from_str(&raw).map_err(|error| CliError::Input(error.to_string()))
}

fn score(service: &PredictionService, input: &InputArgs) -> Result<Value, CliError> {
    let item = read_item(input.input.as_deref())?;
    let run_id = input
        .run_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!("predict", run_id = %run_id);
    let _guard = span.enter();

    let result = service.predict(&item, Some(&run_id), Some(&span))?;
    info!(prediction = result.prediction, "prediction served");
    Ok(serde_json::to_value(result)?)
}
