//! Startup loading of the model and scaler artifacts.
//!
//! Both artifacts are read once, validated, and wrapped in `Arc` so request
//! handlers share them without locking. Any failure is returned to `main`,
//! which exits before the listener is bound.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ArtifactConfig;
use crate::error::{ArtifactKind, ArtifactLoadError};
use crate::model::{Regressor, StandardScaler};

/// The loaded, immutable artifacts.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scaler: Arc<StandardScaler>,
    pub model: Arc<Regressor>,
}

impl Artifacts {
    /// Build from in-memory artifacts, applying the same checks as `load`.
    pub fn new(scaler: StandardScaler, model: Regressor) -> Result<Self, String> {
        model.validate().map_err(|e| format!("model: {}", e))?;
        scaler.validate().map_err(|e| format!("scaler: {}", e))?;
        Ok(Self::from_validated(scaler, model))
    }

    fn from_validated(scaler: StandardScaler, model: Regressor) -> Self {
        Self {
            scaler: Arc::new(scaler),
            model: Arc::new(model),
        }
    }

    /// Load the model, then the scaler, from the configured paths.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactLoadError> {
        let model: Regressor =
            load_artifact(ArtifactKind::Model, &config.model_path, Regressor::validate)?;
        tracing::info!(
            path = %config.model_path.display(),
            model = %model.describe(),
            "Model loaded successfully"
        );

        let scaler: StandardScaler = load_artifact(
            ArtifactKind::Scaler,
            &config.scaler_path,
            StandardScaler::validate,
        )?;
        tracing::info!(
            path = %config.scaler_path.display(),
            with_mean = scaler.with_mean,
            with_std = scaler.with_std,
            "Scaler loaded successfully"
        );

        Ok(Self::from_validated(scaler, model))
    }
}

/// Read, deserialize and validate one artifact, logging any failure.
fn load_artifact<T, V>(
    artifact: ArtifactKind,
    path: &Path,
    validate: V,
) -> Result<T, ArtifactLoadError>
where
    T: DeserializeOwned,
    V: Fn(&T) -> Result<(), String>,
{
    let result = read_artifact(artifact, path, validate);
    if let Err(e) = &result {
        tracing::error!(
            artifact = %artifact,
            path = %path.display(),
            error = %e,
            "Failed to load artifact"
        );
    }
    result
}

fn read_artifact<T, V>(
    artifact: ArtifactKind,
    path: &Path,
    validate: V,
) -> Result<T, ArtifactLoadError>
where
    T: DeserializeOwned,
    V: Fn(&T) -> Result<(), String>,
{
    let bytes = std::fs::read(path).map_err(|source| ArtifactLoadError::Io {
        artifact,
        path: path.to_path_buf(),
        source,
    })?;

    let value: T = serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Parse {
        artifact,
        path: path.to_path_buf(),
        source,
    })?;

    validate(&value).map_err(|reason| ArtifactLoadError::Invalid {
        artifact,
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecisionTree;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const SCALER_JSON: &str = r#"{
        "mean": [3.37, 2.11, 2079.9, 15106.97, 1788.39, 291.51],
        "scale": [0.93, 0.77, 918.42, 41419.55, 828.07, 442.56]
    }"#;

    const FOREST_JSON: &str = r#"{
        "kind": "random_forest",
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [2, -2, -2],
            "threshold": [0.25, -2.0, -2.0],
            "value": [540000.0, 420000.0, 780000.0]
        }]
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config(model: &Path, scaler: &Path) -> ArtifactConfig {
        ArtifactConfig {
            model_path: model.to_path_buf(),
            scaler_path: scaler.to_path_buf(),
        }
    }

    #[test]
    fn test_load_valid_artifacts() {
        let model = write_temp(FOREST_JSON);
        let scaler = write_temp(SCALER_JSON);
        let artifacts = Artifacts::load(&config(model.path(), scaler.path())).unwrap();
        assert_eq!(artifacts.scaler.mean.len(), 6);
        assert!(matches!(
            artifacts.model.as_ref(),
            Regressor::RandomForest { trees } if trees.len() == 1
        ));
    }

    #[test]
    fn test_missing_model_file_fails_first() {
        let scaler = write_temp(SCALER_JSON);
        let missing = PathBuf::from("/nonexistent/best_rf_model.json");
        let err = Artifacts::load(&config(&missing, scaler.path())).unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Io {
                artifact: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_scaler_file() {
        let model = write_temp(FOREST_JSON);
        let missing = PathBuf::from("/nonexistent/scaler.json");
        let err = Artifacts::load(&config(model.path(), &missing)).unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Io {
                artifact: ArtifactKind::Scaler,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_scaler_is_parse_error() {
        let model = write_temp(FOREST_JSON);
        let scaler = write_temp("\u{80}\u{3}cnumpy\n");
        let err = Artifacts::load(&config(model.path(), scaler.path())).unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Parse {
                artifact: ArtifactKind::Scaler,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_model_kind_is_parse_error() {
        let model = write_temp(r#"{"kind": "gradient_boosting", "stages": []}"#);
        let scaler = write_temp(SCALER_JSON);
        let err = Artifacts::load(&config(model.path(), scaler.path())).unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Parse {
                artifact: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_dimension_scaler_is_invalid() {
        let model = write_temp(FOREST_JSON);
        let scaler = write_temp(r#"{"mean": [0, 0, 0], "scale": [1, 1, 1]}"#);
        let err = Artifacts::load(&config(model.path(), scaler.path())).unwrap_err();
        match err {
            ArtifactLoadError::Invalid {
                artifact, reason, ..
            } => {
                assert_eq!(artifact, ArtifactKind::Scaler);
                assert_eq!(reason, "mean has 3 entries, expected 6");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_tree_with_out_of_range_child() {
        let tree = DecisionTree {
            children_left: vec![1, -1],
            children_right: vec![5, -1],
            feature: vec![9, -2],
            threshold: vec![0.0, -2.0],
            value: vec![0.0, 1.0],
        };
        let err = Artifacts::new(
            StandardScaler::new(vec![0.0; 6], vec![1.0; 6]),
            Regressor::RandomForest { trees: vec![tree] },
        )
        .unwrap_err();
        assert_eq!(err, "model: tree 0: node 0 links to invalid child 5");
    }

    #[test]
    fn test_new_rejects_short_linear_coefficients() {
        let err = Artifacts::new(
            StandardScaler::new(vec![0.0; 6], vec![1.0; 6]),
            Regressor::Linear {
                coefficients: vec![1.0],
                intercept: 0.0,
            },
        )
        .unwrap_err();
        assert_eq!(err, "model: coefficients has 1 entries, expected 6");
    }

    #[test]
    fn test_new_rejects_short_scaler() {
        let err = Artifacts::new(
            StandardScaler::new(vec![0.0; 2], vec![1.0; 6]),
            Regressor::RandomForest {
                trees: vec![DecisionTree::leaf(1.0)],
            },
        )
        .unwrap_err();
        assert_eq!(err, "scaler: mean has 2 entries, expected 6");
    }
}
