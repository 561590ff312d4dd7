use pricecast_core::{FeatureRecord, PredictError, FEATURE_COUNT};
use serde_json::Value;

use crate::error::CliError;

const RECENT_PRICE: f64 = 46700.535156;
const OLDEST_PRICE: f64 = 46656.851562;

/// Reference record: flat recent prices with a slightly lower oldest price.
pub fn sample_record() -> Result<FeatureRecord, CliError> {
    let mut values = [RECENT_PRICE; FEATURE_COUNT];
    values[0] = OLDEST_PRICE;
    FeatureRecord::from_values(values).map_err(|error| PredictError::from(error).into())
}

pub fn run() -> Result<Value, CliError> {
    Ok(serde_json::to_value(sample_record()?)?)
}
