use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Predict(#[from] pricecast_core::PredictError),

    #[error(transparent)]
    Load(#[from] pricecast_core::LoadError),

    #[error(transparent)]
    Config(#[from] pricecast_core::ConfigError),

    #[error("invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Predict(_) | Self::Input(_) => 2,
            Self::Load(_) | Self::Config(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
