//! Model artifact format and the in-memory predictor built from it.
//!
//! The registry stores a `model.json` document describing a fitted linear
//! pipeline: an optional standard-scaler step followed by a linear
//! regressor, both keyed to an ordered list of feature names.

use std::fmt::Debug;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};
use crate::features::FeatureFrame;

/// File name the registry download writes into the artifact directory.
pub const ARTIFACT_FILE_NAME: &str = "model.json";

pub const FORMAT_VERSION: u32 = 1;

/// A loaded model: maps each frame row to one scalar.
///
/// Implementations are read-only after construction so a single instance
/// can serve concurrent callers.
pub trait Predictor: Send + Sync + Debug {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Serialized form of a fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    pub regressor: LinearRegressor,
}

impl ModelArtifact {
    pub fn linear<S: Into<String>>(
        feature_names: impl IntoIterator<Item = S>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feature_names: feature_names.into_iter().map(Into::into).collect(),
            scaler: None,
            regressor: LinearRegressor {
                coefficients,
                intercept,
            },
        }
    }

    pub fn with_scaler(mut self, mean: Vec<f64>, scale: Vec<f64>) -> Self {
        self.scaler = Some(StandardScaler { mean, scale });
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let expected = self.feature_names.len();
        if expected == 0 {
            return Err(ArtifactError::NoFeatures);
        }

        check_step("regressor", expected, &self.regressor.coefficients)?;
        if !self.regressor.intercept.is_finite() {
            return Err(ArtifactError::NonFinite { step: "regressor" });
        }

        if let Some(scaler) = &self.scaler {
            check_step("scaler mean", expected, &scaler.mean)?;
            check_step("scaler scale", expected, &scaler.scale)?;
            if let Some(index) = scaler.scale.iter().position(|scale| *scale == 0.0) {
                return Err(ArtifactError::ZeroScale {
                    feature: self.feature_names[index].clone(),
                });
            }
        }

        Ok(())
    }

    /// Validates the artifact and builds the predictor it describes.
    pub fn into_predictor(self) -> Result<LinearPipeline, ArtifactError> {
        self.validate()?;
        let scaler = self
            .scaler
            .map(|scaler| (Array1::from(scaler.mean), Array1::from(scaler.scale)));

        Ok(LinearPipeline {
            feature_names: self.feature_names,
            scaler,
            coefficients: Array1::from(self.regressor.coefficients),
            intercept: self.regressor.intercept,
        })
    }
}

fn check_step(step: &'static str, expected: usize, values: &[f64]) -> Result<(), ArtifactError> {
    if values.len() != expected {
        return Err(ArtifactError::ShapeMismatch {
            step,
            expected,
            found: values.len(),
        });
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(ArtifactError::NonFinite { step });
    }
    Ok(())
}

/// Fitted `scaler -> linear regressor` pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPipeline {
    feature_names: Vec<String>,
    scaler: Option<(Array1<f64>, Array1<f64>)>,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearPipeline {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl Predictor for LinearPipeline {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, InferenceError> {
        if frame.columns != self.feature_names {
            return Err(InferenceError::ColumnMismatch {
                expected: self.feature_names.clone(),
                found: frame.columns.clone(),
            });
        }

        let outputs = match &self.scaler {
            Some((mean, scale)) => ((&frame.rows - mean) / scale).dot(&self.coefficients),
            None => frame.rows.dot(&self.coefficients),
        } + self.intercept;

        if outputs.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        if let Some(value) = outputs.iter().copied().find(|value| !value.is_finite()) {
            return Err(InferenceError::NonFiniteOutput { value });
        }

        Ok(outputs.to_vec())
    }
}
