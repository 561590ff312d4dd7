use std::path::PathBuf;

use thiserror::Error;

use crate::http_client::HttpError;

/// Invalid or unparsable service configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config field '{field}' cannot be empty")]
    EmptyValue { field: &'static str },
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Failure to obtain a secret from the active credential source.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("secret '{name}' is not set in the environment")]
    MissingEnv { name: String },
    #[error("secret '{name}' not found in secrets directory {}", dir.display())]
    MissingFile { name: String, dir: PathBuf },
    #[error("secret '{name}' is empty")]
    Empty { name: String },
    #[error("failed to read secret '{name}' from {}: {source}", path.display())]
    Unreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while talking to the model registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry transport error: {0}")]
    Transport(#[from] HttpError),
    #[error("registry rejected credentials (status {status})")]
    Unauthorized { status: u16 },
    #[error("model '{model}' not found in workspace '{workspace}'")]
    ModelNotFound { workspace: String, model: String },
    #[error("registry returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("registry payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to write artifact to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading or interpreting a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unsupported artifact format_version {found}, expected {expected}")]
    UnsupportedFormat { found: u32, expected: u32 },
    #[error("artifact declares no features")]
    NoFeatures,
    #[error("artifact {step} has {found} values for {expected} features")]
    ShapeMismatch {
        step: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("artifact {step} contains a non-finite value")]
    NonFinite { step: &'static str },
    #[error("artifact scaler has zero scale for feature '{feature}'")]
    ZeroScale { feature: String },
}

/// A request record that does not match the 24-field feature schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaValidationError {
    #[error("feature record must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    #[error(
        "feature record does not match schema: missing={missing:?}, unknown={unknown:?}, non_numeric={non_numeric:?}"
    )]
    Fields {
        missing: Vec<String>,
        unknown: Vec<String>,
        non_numeric: Vec<String>,
    },
    #[error("field '{field}' must be finite")]
    NonFinite { field: &'static str },
}

/// Failures of the model's inference call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("frame columns {found:?} do not match model features {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("model produced no output rows")]
    EmptyOutput,
    #[error("model produced non-finite output {value}")]
    NonFiniteOutput { value: f64 },
}

/// Fatal startup failures. The process cannot serve without a model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("no production version found for model '{model}' in workspace '{workspace}'")]
    NoProductionVersion { workspace: String, model: String },
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Per-request failures. These never affect the loaded model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
