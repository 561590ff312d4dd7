//! # Pricecast Core
//!
//! Serves an hourly price forecast from a model kept in a remote registry.
//!
//! ## Overview
//!
//! Two stages run in sequence:
//!
//! - **Model loading** (once, at startup): find the version of the model
//!   tagged `production`, download its artifact, deserialize it.
//! - **Prediction** (per request): validate a 24-field feature record,
//!   reshape it into a one-row frame, score it.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`artifact`] | Model artifact format and the [`Predictor`] trait |
//! | [`config`] | Service configuration from defaults and environment |
//! | [`credentials`] | Secrets-directory and environment credential sources |
//! | [`error`] | Error types for startup and per-request failures |
//! | [`features`] | The strict 24-field feature schema |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`loader`] | Production-version lookup and artifact download |
//! | [`registry`] | Model registry REST client |
//! | [`service`] | The prediction entry point |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricecast_core::{load_model_from_registry, PredictionService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_env()?;
//!     let loaded = load_model_from_registry(&config).await?;
//!     let service = PredictionService::from_predictor(loaded.predictor);
//!
//!     let item = serde_json::from_str(&std::fs::read_to_string("item.json")?)?;
//!     let result = service.predict(&item, None, None)?;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - The registry API key comes from a mounted secrets directory or the
//!   `COMET_ML_API_KEY` environment variable and is never logged
//! - All HTTP requests use TLS via reqwest

pub mod artifact;
pub mod config;
pub mod credentials;
pub mod error;
pub mod features;
pub mod http_client;
pub mod loader;
pub mod registry;
pub mod service;

pub use artifact::{
    LinearPipeline, LinearRegressor, ModelArtifact, Predictor, StandardScaler, ARTIFACT_FILE_NAME,
};
pub use config::ServiceConfig;
pub use credentials::{
    select_provider, CredentialProvider, CredentialSource, EnvCredentialProvider,
    SecretsDirProvider,
};
pub use error::{
    ArtifactError, ConfigError, CredentialError, InferenceError, LoadError, PredictError,
    RegistryError, SchemaValidationError,
};
pub use features::{FeatureFrame, FeatureRecord, FEATURE_COUNT, FIELD_NAMES};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use loader::{load_local, load_model_from_registry, LoadedModel, ModelLoader};
pub use registry::{ModelVersion, RegistryClient};
pub use service::{PredictionResult, PredictionService};
