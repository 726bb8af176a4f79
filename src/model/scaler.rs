//! Standard scaler: per-feature centering and scaling.

use serde::{Deserialize, Serialize};

use super::{check_params, FeatureVector, N_FEATURES};
use crate::error::InferenceError;

/// Scale values at or below this magnitude are treated as constant columns
/// and left unscaled.
const MIN_SCALE: f64 = 1e-10;

/// Fitted standard scaler.
///
/// `transform` computes `(x - mean) / scale` per feature. Centering is skipped
/// when `with_mean` is false, and division is skipped when `with_std` is false
/// or the column's scale is effectively zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean learned during fitting
    pub mean: Vec<f64>,
    /// Per-feature standard deviation learned during fitting
    pub scale: Vec<f64>,
    #[serde(default = "default_true")]
    pub with_mean: bool,
    #[serde(default = "default_true")]
    pub with_std: bool,
}

fn default_true() -> bool {
    true
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            with_mean: true,
            with_std: true,
        }
    }

    /// Reject parameter vectors that cannot transform a feature record.
    pub fn validate(&self) -> Result<(), String> {
        check_params("mean", &self.mean)?;
        check_params("scale", &self.scale)
    }

    /// Transform one raw sample into its scaled form.
    pub fn transform(&self, x: &[f64]) -> Result<FeatureVector, InferenceError> {
        if x.len() != N_FEATURES || self.mean.len() != N_FEATURES || self.scale.len() != N_FEATURES
        {
            return Err(InferenceError::Shape {
                expected: self.mean.len(),
                got: x.len(),
            });
        }

        let mut out = [0.0; N_FEATURES];
        for (j, slot) in out.iter_mut().enumerate() {
            let mut val = x[j];
            if self.with_mean {
                val -= self.mean[j];
            }
            if self.with_std && self.scale[j].abs() > MIN_SCALE {
                val /= self.scale[j];
            }
            *slot = val;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> StandardScaler {
        StandardScaler::new(
            vec![3.0, 2.0, 2000.0, 15000.0, 1800.0, 300.0],
            vec![1.0, 0.5, 900.0, 40000.0, 800.0, 450.0],
        )
    }

    #[test]
    fn test_transform_centres_and_scales() {
        let out = scaler()
            .transform(&[4.0, 3.0, 2900.0, 55000.0, 1800.0, 0.0])
            .unwrap();
        assert_eq!(out, [1.0, 2.0, 1.0, 1.0, 0.0, -300.0 / 450.0]);
    }

    #[test]
    fn test_zero_scale_column_is_only_centred() {
        let mut s = scaler();
        s.scale[0] = 0.0;
        let out = s.transform(&[5.0, 2.0, 2000.0, 15000.0, 1800.0, 300.0]).unwrap();
        assert_eq!(out[0], 2.0);
    }

    #[test]
    fn test_flags_disable_steps() {
        let mut s = scaler();
        s.with_mean = false;
        let out = s.transform(&[4.0, 1.0, 900.0, 40000.0, 800.0, 450.0]).unwrap();
        assert_eq!(out, [4.0, 2.0, 1.0, 1.0, 1.0, 1.0]);

        s.with_std = false;
        let out = s.transform(&[4.0, 1.0, 900.0, 40000.0, 800.0, 450.0]).unwrap();
        assert_eq!(out, [4.0, 1.0, 900.0, 40000.0, 800.0, 450.0]);
    }

    #[test]
    fn test_wrong_dimension_is_shape_error() {
        let err = scaler().transform(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Shape {
                expected: 6,
                got: 3
            }
        ));
    }

    #[test]
    fn test_flags_default_to_true_when_absent() {
        let s: StandardScaler = serde_json::from_str(
            r#"{"mean": [0, 0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1, 1]}"#,
        )
        .unwrap();
        assert!(s.with_mean);
        assert!(s.with_std);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_scale() {
        let s = StandardScaler::new(vec![0.0; 6], vec![1.0; 4]);
        assert_eq!(s.validate().unwrap_err(), "scale has 4 entries, expected 6");
    }
}
