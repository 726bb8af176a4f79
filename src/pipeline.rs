//! Request validation and inference.
//!
//! A prediction runs four stages in order: the JSON payload is validated into a
//! [`FeatureRecord`], flattened into a vector in [`FEATURE_ORDER`], scaled, and
//! passed to the regressor. Each stage logs its intermediate state. A record
//! with any absent field is rejected before the scaler or model see it.

use serde::Serialize;
use serde_json::Value;

use crate::artifacts::Artifacts;
use crate::error::{InferenceError, PredictError, ValidationError};
use crate::model::{FeatureVector, FEATURE_ORDER, N_FEATURES};

/// Raw, unscaled description of one house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub sqft_above: f64,
    pub sqft_basement: f64,
}

impl FeatureRecord {
    /// Build from values already in [`FEATURE_ORDER`].
    pub fn from_vector(v: FeatureVector) -> Self {
        Self {
            bedrooms: v[0],
            bathrooms: v[1],
            sqft_living: v[2],
            sqft_lot: v[3],
            sqft_above: v[4],
            sqft_basement: v[5],
        }
    }

    /// Flatten into [`FEATURE_ORDER`].
    pub fn to_vector(&self) -> FeatureVector {
        [
            self.bedrooms,
            self.bathrooms,
            self.sqft_living,
            self.sqft_lot,
            self.sqft_above,
            self.sqft_basement,
        ]
    }

    /// Extract the six features from a JSON object.
    ///
    /// Presence of every field is checked before any type is, so a body that
    /// is both incomplete and mistyped reports the missing field. Extra keys
    /// are ignored.
    pub fn from_json(payload: &Value) -> Result<Self, PredictError> {
        let map = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        if let Some(missing) = FEATURE_ORDER.iter().find(|name| !map.contains_key(**name)) {
            return Err(ValidationError::MissingField(*missing).into());
        }

        let mut values = [0.0; N_FEATURES];
        for (slot, field) in values.iter_mut().zip(FEATURE_ORDER) {
            let value = &map[field];
            *slot = value
                .as_f64()
                .ok_or_else(|| InferenceError::NonNumeric {
                    field,
                    found: describe_json(value),
                })?;
        }

        Ok(Self::from_vector(values))
    }
}

/// Type and value of a non-numeric JSON value, for error messages.
fn describe_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::String(_) => format!("string {}", value),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
        Value::Number(n) => format!("number {}", n),
    }
}

/// Response body of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
}

/// Round to two decimal places through correctly rounded decimal formatting.
pub fn round_price(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Parse the raw request body as JSON.
pub fn parse_payload(body: &[u8]) -> Result<Value, PredictError> {
    serde_json::from_slice(body).map_err(|e| {
        let err = PredictError::from(ValidationError::from(e));
        tracing::error!(
            stage = "parse",
            body = %String::from_utf8_lossy(body),
            error = %err,
            "Prediction failed"
        );
        err
    })
}

/// Run the full pipeline on a parsed payload.
pub fn predict(artifacts: &Artifacts, payload: &Value) -> Result<PredictionResult, PredictError> {
    tracing::info!(payload = %payload, "Received prediction request");

    let record = FeatureRecord::from_json(payload).map_err(|e| failed("validate", payload, e))?;

    let raw = record.to_vector();
    tracing::info!(features = ?raw, "Input features (pre-scaling)");

    let scaled = artifacts
        .scaler
        .transform(&raw)
        .map_err(|e| failed("scale", payload, e.into()))?;
    tracing::info!(features = ?scaled, "Input features (post-scaling)");

    let price = artifacts
        .model
        .predict(&scaled)
        .map_err(|e| failed("predict", payload, e.into()))?;
    tracing::info!(predicted_price = price, "Predicted price");

    Ok(PredictionResult {
        predicted_price: round_price(price),
    })
}

fn failed(stage: &'static str, payload: &Value, err: PredictError) -> PredictError {
    tracing::error!(stage, payload = %payload, error = %err, "Prediction failed");
    err
}
