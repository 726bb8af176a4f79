//! In-memory forms of the two startup artifacts.
//!
//! [`StandardScaler`] centres and scales a raw feature vector, and
//! [`Regressor`] maps the scaled vector to a price. Both are deserialized once
//! from JSON by [`crate::artifacts`] and never mutated afterwards.
//!
//! The column order below is the order the scaler and the regressor were
//! fitted with. Reordering it silently corrupts every prediction.

pub mod regressor;
pub mod scaler;

pub use regressor::{DecisionTree, Regressor};
pub use scaler::StandardScaler;

/// Feature columns, in the order the artifacts expect them.
pub const FEATURE_ORDER: [&str; N_FEATURES] = [
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "sqft_above",
    "sqft_basement",
];

/// Dimensionality of every feature vector.
pub const N_FEATURES: usize = 6;

/// Raw or scaled feature values in [`FEATURE_ORDER`].
pub type FeatureVector = [f64; N_FEATURES];

/// Check a parameter vector read from an artifact.
fn check_params(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != N_FEATURES {
        return Err(format!(
            "{} has {} entries, expected {}",
            name,
            values.len(),
            N_FEATURES
        ));
    }
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("{}[{}] is not finite", name, idx));
    }
    Ok(())
}
