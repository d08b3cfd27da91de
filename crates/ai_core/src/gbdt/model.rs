//! Boosted binary classifier with integer-only inference

use serde::{Deserialize, Serialize};

use super::tree::Tree;
use crate::errors::{ModelError, Result};
use crate::fixed::SCALE;

/// The two label values a model can predict, in micro units.
///
/// A model trained on a single label value carries it on both sides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClassLabels {
    pub negative: i64,
    pub positive: i64,
}

impl ClassLabels {
    pub fn new(negative: i64, positive: i64) -> Self {
        Self { negative, positive }
    }

    pub fn single(value: i64) -> Self {
        Self::new(value, value)
    }

    pub fn is_degenerate(&self) -> bool {
        self.negative == self.positive
    }

    /// Regression target used while boosting: 0 for negative, `SCALE` for positive
    pub fn target_for(&self, label: i64) -> i64 {
        if !self.is_degenerate() && label == self.positive {
            SCALE
        } else {
            0
        }
    }

    pub fn label(&self, positive: bool) -> i64 {
        if positive {
            self.positive
        } else {
            self.negative
        }
    }
}

/// GBDT classifier
///
/// Every tree regresses towards 0 (negative class) or `scale` (positive
/// class); a row is positive when its summed score exceeds `scale / 2`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Model format version
    pub version: i32,

    /// Fixed-point scale of thresholds, leaves and bias
    pub scale: i64,

    /// Feature columns in the order rows must present them
    pub feature_names: Vec<String>,

    pub classes: ClassLabels,

    pub trees: Vec<Tree>,

    /// Initial score (mean target of the training rows)
    pub bias: i64,
}

impl Model {
    pub fn new(feature_names: Vec<String>, classes: ClassLabels, trees: Vec<Tree>, bias: i64) -> Self {
        Self {
            version: 1,
            scale: SCALE,
            feature_names,
            classes,
            trees,
            bias,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid scale: {}",
                self.scale
            )));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_count()).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Summed ensemble output for one row
    pub fn score(&self, features: &[i64]) -> i64 {
        self.trees.iter().fold(self.bias, |sum, tree| {
            sum.saturating_add(tree.contribution(features, self.scale))
        })
    }

    /// Whether the row falls on the positive side of the decision boundary
    pub fn is_positive(&self, features: &[i64]) -> bool {
        self.score(features) as i128 * 2 > self.scale as i128
    }

    /// Predicted label value (micro units) for one row
    pub fn predict(&self, features: &[i64]) -> Result<i64> {
        if features.len() != self.feature_count() {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.feature_count(),
                actual: features.len(),
            });
        }
        Ok(self.classes.label(self.is_positive(features)))
    }

    /// Predicted label values for a batch of rows
    pub fn predict_batch(&self, rows: &[Vec<i64>]) -> Result<Vec<i64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Compact JSON; fields follow declaration order, tree nodes their index
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Blake3 hash of the compact JSON
    pub fn hash(&self) -> Result<[u8; 32]> {
        let bytes = serde_json::to_vec(self)?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }

    /// Model fingerprint as lowercase hex
    pub fn hash_hex(&self) -> Result<String> {
        Ok(hex::encode(self.hash()?))
    }
}
