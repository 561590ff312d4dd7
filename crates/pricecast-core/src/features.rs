//! Feature schema for the hourly price model.
//!
//! A request carries exactly 24 lagged prices. Column order follows field
//! declaration order, oldest observation first, which is the order the model
//! was trained on.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaValidationError;

pub const FEATURE_COUNT: usize = 24;

macro_rules! feature_record {
    ($($field:ident),+ $(,)?) => {
        /// One validated request: 24 hourly lagged prices.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct FeatureRecord {
            $(pub $field: f64,)+
        }

        /// Schema field names in column order.
        pub const FIELD_NAMES: [&str; FEATURE_COUNT] = [$(stringify!($field)),+];

        impl FeatureRecord {
            /// Values in column order.
            pub fn values(&self) -> [f64; FEATURE_COUNT] {
                [$(self.$field),+]
            }

            fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }
        }
    };
}

feature_record!(
    price_24_hour_ago,
    price_23_hour_ago,
    price_22_hour_ago,
    price_21_hour_ago,
    price_20_hour_ago,
    price_19_hour_ago,
    price_18_hour_ago,
    price_17_hour_ago,
    price_16_hour_ago,
    price_15_hour_ago,
    price_14_hour_ago,
    price_13_hour_ago,
    price_12_hour_ago,
    price_11_hour_ago,
    price_10_hour_ago,
    price_9_hour_ago,
    price_8_hour_ago,
    price_7_hour_ago,
    price_6_hour_ago,
    price_5_hour_ago,
    price_4_hour_ago,
    price_3_hour_ago,
    price_2_hour_ago,
    price_1_hour_ago,
);

impl FeatureRecord {
    /// Builds a record from values in column order, rejecting NaN and infinities.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, SchemaValidationError> {
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(SchemaValidationError::NonFinite {
                field: FIELD_NAMES[index],
            });
        }
        Ok(Self::from_ordered(values))
    }

    /// Validates an untyped request against the schema.
    ///
    /// Unknown fields are rejected rather than ignored and missing fields are
    /// rejected rather than defaulted. All offending fields are reported
    /// together.
    pub fn from_json(item: &Value) -> Result<Self, SchemaValidationError> {
        let map = item.as_object().ok_or(SchemaValidationError::NotAnObject {
            found: json_kind(item),
        })?;

        let mut missing = Vec::new();
        let mut non_numeric = Vec::new();
        let mut values = [0.0; FEATURE_COUNT];

        for (slot, name) in values.iter_mut().zip(FIELD_NAMES) {
            match map.get(name) {
                None => missing.push(name.to_owned()),
                Some(value) => match value.as_f64() {
                    Some(number) => *slot = number,
                    None => non_numeric.push(name.to_owned()),
                },
            }
        }

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| !FIELD_NAMES.contains(&key.as_str()))
            .cloned()
            .collect();

        if !missing.is_empty() || !unknown.is_empty() || !non_numeric.is_empty() {
            return Err(SchemaValidationError::Fields {
                missing,
                unknown,
                non_numeric,
            });
        }

        Self::from_values(values)
    }

    /// Reshapes the record into the single-row frame the model consumes.
    pub fn to_frame(&self) -> FeatureFrame {
        let values = self.values();
        FeatureFrame {
            columns: FIELD_NAMES.iter().map(|name| (*name).to_owned()).collect(),
            rows: Array2::from_shape_fn((1, FEATURE_COUNT), |(_, column)| values[column]),
        }
    }
}

/// Named-column tabular input for a model: one row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Array2<f64>,
}

impl FeatureFrame {
    pub fn n_rows(&self) -> usize {
        self.rows.nrows()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
