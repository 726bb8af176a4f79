//! Prediction endpoint.

use axum::{body::Bytes, extract::State, Json};
use tracing::instrument;

use crate::error::PredictError;
use crate::pipeline::{self, PredictionResult};
use crate::state::AppState;

/// `POST /predict`: price one house described by a JSON feature record.
///
/// The body is read as raw bytes and parsed here rather than through the
/// `Json` extractor, so malformed bodies get the same `{"error": ...}` shape as
/// every other failure.
#[instrument(name = "predict::predict", skip(state, body), fields(body_len = body.len()))]
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, PredictError> {
    let payload = pipeline::parse_payload(&body)?;
    let result = pipeline::predict(&state.artifacts, &payload)?;
    Ok(Json(result))
}
