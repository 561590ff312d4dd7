//! Per-request prediction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Span;

use crate::artifact::Predictor;
use crate::error::{InferenceError, PredictError};
use crate::features::FeatureRecord;

/// Output of one prediction, serialized as `{"prediction": <f64>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionResult {
    pub prediction: f64,
}

/// Holds the loaded model and scores requests against it.
///
/// Cloning shares the same model; no call mutates it.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Arc<dyn Predictor>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Predictor>) -> Self {
        Self { model }
    }

    pub fn from_predictor<P: Predictor + 'static>(predictor: P) -> Self {
        Self::new(Arc::new(predictor))
    }

    /// Validates `item` against the feature schema and scores it.
    ///
    /// `run_id` and `span` are accepted for callers that track runs; they do
    /// not influence the result.
    pub fn predict(
        &self,
        item: &Value,
        run_id: Option<&str>,
        span: Option<&Span>,
    ) -> Result<PredictionResult, PredictError> {
        let _ = (run_id, span);
        let record = FeatureRecord::from_json(item)?;
        self.predict_record(&record)
    }

    /// Scores an already-typed record.
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictError> {
        let outputs = self.model.predict(&record.to_frame())?;
        let prediction = outputs
            .first()
            .copied()
            .ok_or(InferenceError::EmptyOutput)?;
        if !prediction.is_finite() {
            return Err(InferenceError::NonFiniteOutput { value: prediction }.into());
        }
        Ok(PredictionResult { prediction })
    }
}
