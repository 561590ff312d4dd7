//! Log subscriber setup.
//!
//! Logs go to stderr so stdout carries only the command's JSON output.
//! `RUST_LOG` overrides the default filter, e.g.
//! `RUST_LOG=pricecast_core=debug pricecast predict`.

use clap::ValueEnum;
use tracing_subscriber::filter::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,hyper=warn,reqwest=warn,rustls=warn")
    })
}

pub type LoggingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global subscriber. Fails when one is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
