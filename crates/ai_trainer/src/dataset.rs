//! Training dataset assembled from a cleaned frame
//!
//! Features and targets are fixed-point integers (SCALE = 1_000_000).

use dyslexia_ai_core::fixed::{from_fixed, row_to_fixed, to_fixed};
use tracing::warn;

use crate::errors::{PipelineError, Result};
use crate::frame::NumericFrame;

/// Training dataset with integer features and label values
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<i64>>,
    pub targets: Vec<i64>,
    pub feature_count: usize,
    /// Set when the label column was absent and zeros were used instead
    pub label_substituted: bool,
}

/// Min/max of one feature column
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl Dataset {
    /// Separate `label_column` from the features of a cleaned frame.
    ///
    /// A frame without the label column trains against all-zero labels.
    pub fn from_frame(mut frame: NumericFrame, label_column: &str) -> Result<Self> {
        if frame.is_empty() {
            return Err(PipelineError::Parse("training data has no rows".to_string()));
        }

        let (labels, label_substituted) = match frame.take_column(label_column) {
            Some(labels) => (labels, false),
            None => {
                warn!(
                    "Label column '{}' not found; training against all-zero labels",
                    label_column
                );
                (vec![0.0; frame.len()], true)
            }
        };

        let feature_names = frame.names().to_vec();
        if feature_names.is_empty() {
            return Err(PipelineError::ModelFit(
                "training data has no feature columns".to_string(),
            ));
        }

        let features: Vec<Vec<i64>> = frame
            .rows_in_order(&feature_names)?
            .iter()
            .map(|row| row_to_fixed(row))
            .collect();

        Ok(Self {
            feature_count: feature_names.len(),
            feature_names,
            features,
            targets: labels.into_iter().map(to_fixed).collect(),
            label_substituted,
        })
    }

    /// Rows selected by `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            feature_count: self.feature_count,
            label_substituted: self.label_substituted,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distinct label values, ascending
    pub fn label_values(&self) -> Vec<i64> {
        let mut values = self.targets.clone();
        values.sort_unstable();
        values.dedup();
        values
    }

    pub fn feature_stats(&self) -> Vec<FeatureStats> {
        let mut bounds = vec![(i64::MAX, i64::MIN); self.feature_count];

        for row in &self.features {
            for (i, &val) in row.iter().enumerate() {
                bounds[i].0 = bounds[i].0.min(val);
                bounds[i].1 = bounds[i].1.max(val);
            }
        }

        self.feature_names
            .iter()
            .zip(bounds)
            .map(|(name, (min, max))| FeatureStats {
                name: name.clone(),
                min: from_fixed(min),
                max: from_fixed(max),
            })
            .collect()
    }
}
