use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Which of the two startup artifacts an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => f.write_str("model"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

/// Fatal boot-time failure. The server must not start when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("Failed to read {artifact} artifact '{}': {source}", .path.display())]
    Io {
        artifact: ArtifactKind,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to deserialize {artifact} artifact '{}': {source}", .path.display())]
    Parse {
        artifact: ArtifactKind,
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid {artifact} artifact '{}': {reason}", .path.display())]
    Invalid {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

/// The request body is not a usable feature record. Reported as 400.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing field in JSON: '{0}'")]
    MissingField(&'static str),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body must be a JSON object")]
    NotAnObject,
}

/// Failure while scaling or predicting a validated record. Reported as 500.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Field '{field}' must be a number, got {found}")]
    NonNumeric { field: &'static str, found: String },

    #[error("Feature dimension mismatch: expected {expected}, got {got}")]
    Shape { expected: usize, got: usize },

    #[error("Model produced a non-finite prediction: {0}")]
    NonFinite(f64),

    #[error("Malformed model: {0}")]
    MalformedModel(String),
}

/// Per-request error returned by the prediction handler.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_quotes_name() {
        let err = PredictError::from(ValidationError::MissingField("sqft_basement"));
        assert_eq!(err.to_string(), "Missing field in JSON: 'sqft_basement'");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_inference_errors_are_server_errors() {
        let err = PredictError::from(InferenceError::Shape {
            expected: 6,
            got: 5,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Feature dimension mismatch: expected 6, got 5"
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "Missing field in JSON: 'bedrooms'".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "Missing field in JSON: 'bedrooms'"})
        );
    }

    #[test]
    fn test_artifact_error_names_artifact_and_path() {
        let err = ArtifactLoadError::Invalid {
            artifact: ArtifactKind::Scaler,
            path: PathBuf::from("scaler.json"),
            reason: "mean has 5 entries, expected 6".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid scaler artifact 'scaler.json': mean has 5 entries, expected 6"
        );
    }
}
