//! Regression models that map a scaled feature vector to a price.
//!
//! Two artifact kinds are understood:
//!
//! - `random_forest`: an ensemble of CART regression trees whose outputs are
//!   averaged. Each tree is stored in flat parallel arrays, node 0 is the root,
//!   and a leaf is marked by `children_left[i] == -1`.
//! - `linear`: a coefficient per feature plus an intercept.

use serde::{Deserialize, Serialize};

use super::{check_params, N_FEATURES};
use crate::error::InferenceError;

/// Child index marking a leaf node.
pub const LEAF: i64 = -1;

/// A fitted regressor, tagged by `kind` in its artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    RandomForest { trees: Vec<DecisionTree> },
    Linear { coefficients: Vec<f64>, intercept: f64 },
}

/// One regression tree in flat-array form.
///
/// A sample at internal node `i` moves to `children_left[i]` when
/// `x[feature[i]] <= threshold[i]`, otherwise to `children_right[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// A tree with a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    fn n_nodes(&self) -> usize {
        self.value.len()
    }

    /// Check array lengths, feature indices and child links.
    ///
    /// Children must point strictly forward, so traversal always terminates.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.n_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_left.len() != n
            || self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
        {
            return Err(format!(
                "node arrays differ in length (left={}, right={}, feature={}, threshold={}, value={})",
                self.children_left.len(),
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                n
            ));
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {} has exactly one child", i));
                }
                if !self.value[i].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", i));
                }
                continue;
            }
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} links to invalid child {}", i, child));
                }
            }
            let feature = self.feature[i];
            if feature < 0 || feature >= N_FEATURES as i64 {
                return Err(format!("node {} splits on unknown feature {}", i, feature));
            }
            if !self.threshold[i].is_finite() {
                return Err(format!("node {} has a non-finite threshold", i));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// A tree that skipped `validate` can still be malformed, so every lookup
    /// is checked and the walk is bounded by the node count.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, InferenceError> {
        let malformed = |node: usize| {
            InferenceError::MalformedModel(format!("tree node {} is out of range or corrupt", node))
        };

        let mut node = 0usize;
        for _ in 0..self.n_nodes() {
            let left = *self.children_left.get(node).ok_or_else(|| malformed(node))?;
            if left == LEAF {
                return self.value.get(node).copied().ok_or_else(|| malformed(node));
            }
            let value = usize::try_from(*self.feature.get(node).ok_or_else(|| malformed(node))?)
                .ok()
                .and_then(|feature| x.get(feature))
                .ok_or_else(|| malformed(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| malformed(node))?;
            let next = if *value <= threshold {
                left
            } else {
                *self.children_right.get(node).ok_or_else(|| malformed(node))?
            };
            node = usize::try_from(next).map_err(|_| malformed(node))?;
        }
        Err(InferenceError::MalformedModel(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

impl Regressor {
    /// Reject artifacts that cannot produce a prediction for every input.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Regressor::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                for (idx, tree) in trees.iter().enumerate() {
                    tree.validate().map_err(|e| format!("tree {}: {}", idx, e))?;
                }
                Ok(())
            }
            Regressor::Linear {
                coefficients,
                intercept,
            } => {
                check_params("coefficients", coefficients)?;
                if !intercept.is_finite() {
                    return Err("intercept is not finite".to_string());
                }
                Ok(())
            }
        }
    }

    /// Short human-readable description for startup logs.
    pub fn describe(&self) -> String {
        match self {
            Regressor::RandomForest { trees } => {
                let nodes: usize = trees.iter().map(DecisionTree::n_nodes).sum();
                format!("random forest ({} trees, {} nodes)", trees.len(), nodes)
            }
            Regressor::Linear { .. } => "linear model".to_string(),
        }
    }

    /// Predict a single scaled sample.
    pub fn predict(&self, x: &[f64]) -> Result<f64, InferenceError> {
        if x.len() != N_FEATURES {
            return Err(InferenceError::Shape {
                expected: N_FEATURES,
                got: x.len(),
            });
        }

        let prediction = match self {
            Regressor::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(InferenceError::MalformedModel(
                        "random forest has no trees".to_string(),
                    ));
                }
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.predict_one(x)?;
                }
                sum / trees.len() as f64
            }
            Regressor::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != N_FEATURES {
                    return Err(InferenceError::Shape {
                        expected: coefficients.len(),
                        got: x.len(),
                    });
                }
                coefficients
                    .iter()
                    .zip(x)
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
                    + intercept
            }
        };

        if !prediction.is_finite() {
            return Err(InferenceError::NonFinite(prediction));
        }
        Ok(prediction)
    }
}
