//! Gradient Boosted Decision Tree (GBDT) classifier trainer
//!
//! Least-squares boosting on fixed-point targets: the negative class regresses
//! towards 0 and the positive class towards SCALE. Trees are built with the
//! exact-greedy CART builder; every value stays an integer.

use dyslexia_ai_core::gbdt::{ClassLabels, Model, Tree};
use dyslexia_ai_core::fixed::from_fixed;
use dyslexia_ai_core::SCALE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cart::{CartBuilder, TreeConfig, HESSIAN_UNIT};
use crate::dataset::Dataset;
use crate::errors::{PipelineError, Result};

/// GBDT training configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GbdtConfig {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub learning_rate: i64, // Fixed-point, e.g., 100_000 = 0.1
    pub quant_step: i64,
}

impl Default for GbdtConfig {
    fn default() -> Self {
        Self {
            num_trees: 50,
            max_depth: 4,
            min_samples_leaf: 1,
            learning_rate: 100_000, // 0.1 in fixed-point
            quant_step: 1,
        }
    }
}

impl GbdtConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_trees == 0 {
            return Err(PipelineError::ModelFit("num_trees must be at least 1".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(PipelineError::ModelFit(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.learning_rate <= 0 || self.learning_rate > SCALE {
            return Err(PipelineError::ModelFit(format!(
                "learning_rate must be in (0, {}], got {}",
                SCALE, self.learning_rate
            )));
        }
        if self.quant_step <= 0 {
            return Err(PipelineError::ModelFit("quant_step must be positive".to_string()));
        }
        Ok(())
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            quant_step: self.quant_step,
        }
    }
}

/// GBDT trainer
pub struct GbdtTrainer {
    config: GbdtConfig,
}

impl GbdtTrainer {
    pub fn new(config: GbdtConfig) -> Self {
        Self { config }
    }

    /// Train a binary classifier on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<Model> {
        self.config.validate()?;

        if dataset.is_empty() {
            return Err(PipelineError::ModelFit("no training rows".to_string()));
        }

        let classes = Self::classes(dataset)?;
        let targets: Vec<i64> = dataset.targets.iter().map(|&t| classes.target_for(t)).collect();
        let bias = Self::calculate_bias(&targets);
        let mut predictions = vec![bias; dataset.len()];

        let mut trees = Vec::with_capacity(self.config.num_trees);
        if classes.is_degenerate() {
            warn!(
                "All training labels equal {}; the model will always predict it",
                from_fixed(classes.negative)
            );
        } else {
            let hessians = vec![HESSIAN_UNIT; dataset.len()];

            for tree_idx in 0..self.config.num_trees {
                let gradients = Self::calculate_gradients(&targets, &predictions);

                let builder = CartBuilder::new(
                    &dataset.features,
                    &gradients,
                    &hessians,
                    self.config.tree_config(),
                );
                let tree = builder.build(self.config.learning_rate);

                Self::update_predictions(&tree, &dataset.features, &mut predictions);
                debug!(
                    "Tree {}/{}: {} nodes, {} leaves",
                    tree_idx + 1,
                    self.config.num_trees,
                    tree.nodes.len(),
                    tree.leaf_count()
                );

                trees.push(tree);
            }
        }

        let model = Model::new(dataset.feature_names.clone(), classes, trees, bias);
        model.validate()?;
        Ok(model)
    }

    /// Negative and positive label values; more than two is an error
    fn classes(dataset: &Dataset) -> Result<ClassLabels> {
        match dataset.label_values().as_slice() {
            [single] => Ok(ClassLabels::single(*single)),
            [negative, positive] => Ok(ClassLabels::new(*negative, *positive)),
            values => Err(PipelineError::ModelFit(format!(
                "label column must be binary, found {} distinct values",
                values.len()
            ))),
        }
    }

    /// Initial score: mean of the boosting targets
    fn calculate_bias(targets: &[i64]) -> i64 {
        if targets.is_empty() {
            return 0;
        }

        let sum: i128 = targets.iter().map(|&t| t as i128).sum();
        (sum / targets.len() as i128) as i64
    }

    /// Squared-loss gradients: prediction - target
    fn calculate_gradients(targets: &[i64], predictions: &[i64]) -> Vec<i64> {
        predictions
            .iter()
            .zip(targets)
            .map(|(&p, &t)| p.saturating_sub(t))
            .collect()
    }

    fn update_predictions(tree: &Tree, features: &[Vec<i64>], predictions: &mut [i64]) {
        for (pred, row) in predictions.iter_mut().zip(features) {
            *pred = pred.saturating_add(tree.contribution(row, SCALE));
        }
    }
}

/// Share of rows whose predicted label equals their label
pub fn evaluate_accuracy(model: &Model, dataset: &Dataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(PipelineError::ModelFit("no rows to evaluate".to_string()));
    }

    let predicted = model.predict_batch(&dataset.features)?;
    let correct = predicted
        .iter()
        .zip(&dataset.targets)
        .filter(|(p, t)| p == t)
        .count();

    Ok(correct as f64 / dataset.len() as f64)
}
