//! CLI argument definitions for Pricecast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `predict` | Load the production model and score one record |
//! | `predict-local` | Score one record with a local artifact file |
//! | `versions` | List registry versions of the model |
//! | `sample` | Print the built-in sample record |
//!
//! # Global Options
//!
//! | Option | Default | Env override |
//! |--------|---------|--------------|
//! | `--registry-url` | `https://www.comet.com` | `PRICECAST_REGISTRY_URL` |
//! | `--workspace` | `paulescu` | `PRICECAST_WORKSPACE` |
//! | `--model-name` | `linear-model` | `PRICECAST_MODEL_NAME` |
//! | `--artifact-dir` | `./` | `PRICECAST_ARTIFACT_DIR` |
//! | `--timeout-ms` | `30000` | `PRICECAST_TIMEOUT_MS` |
//! | `--pretty` | `false` | |
//! | `--log-format` | `pretty` | `RUST_LOG` sets the filter |
//!
//! # Examples
//!
//! ```bash
//! pricecast sample > item.json
//! COMET_ML_API_KEY=... pricecast predict --input item.json
//! pricecast predict-local --artifact ./model.json --input - < item.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Hourly price forecasts from a registry-managed model.
#[derive(Debug, Parser)]
#[command(name = "pricecast", author, version, about)]
pub struct Cli {
    /// Base URL of the model registry.
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    /// Registry workspace that owns the model.
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    /// Registered model name.
    #[arg(long, global = true)]
    pub model_name: Option<String>,

    /// Directory the downloaded artifact is written to.
    #[arg(long, global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Timeout for each registry call, in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log line format written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the production model from the registry and score one record.
    Predict(PredictArgs),

    /// Score one record with an artifact already on disk.
    PredictLocal(PredictLocalArgs),

    /// List the model's registry versions.
    Versions,

    /// Print the built-in sample feature record.
    Sample,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON file holding the feature record; `-` reads stdin. Defaults to the sample record.
    #[arg(long)]
    pub input: Option<String>,

    /// Run identifier attached to the request; generated when omitted.
    #[arg(long)]
    pub run_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct PredictLocalArgs {
    /// Path to a `model.json` artifact.
    #[arg(long)]
    pub artifact: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,
}
