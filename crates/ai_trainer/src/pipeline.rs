//! Train on one CSV, predict on another
//!
//! Flow: load both frames, fit the encoder on the training frame and clean
//! both with it, hold out a seeded test split, fit the ensemble, measure
//! accuracy, then predict every row of the prediction frame and fold the
//! labels into a single verdict.

use std::path::Path;

use dyslexia_ai_core::fixed::{from_fixed, row_to_fixed};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::deterministic::train_test_split;
use crate::encoder::CategoryEncoder;
use crate::errors::{PipelineError, Result};
use crate::frame::RawFrame;
use crate::report::Verdict;
use crate::trainer::{evaluate_accuracy, GbdtTrainer};

/// Result of one training and prediction run
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// Held-out accuracy in [0, 1]
    pub accuracy: f64,
    pub prediction: Verdict,
    /// Mean predicted label value over the prediction rows
    pub mean_prediction: f64,
    /// Blake3 fingerprint of the trained model
    pub model_hash: String,
    /// Set when the label column was absent and zero labels were used
    pub label_substituted: bool,
    pub train_rows: usize,
    pub test_rows: usize,
    pub predicted_rows: usize,
}

/// Load both CSV files and run the pipeline
pub fn train_and_predict(training: &Path, prediction: &Path, config: &PipelineConfig) -> Result<Outcome> {
    info!(
        "Training data path: {}, Prediction data path: {}",
        training.display(),
        prediction.display()
    );

    let training_frame = RawFrame::from_csv(training)?;
    let prediction_frame = RawFrame::from_csv(prediction)?;

    train_and_predict_frames(&training_frame, &prediction_frame, config)
}

/// Run the pipeline on frames already in memory
pub fn train_and_predict_frames(
    training: &RawFrame,
    prediction: &RawFrame,
    config: &PipelineConfig,
) -> Result<Outcome> {
    config.validate()?;

    let encoder = CategoryEncoder::fit(training);
    let cleaned_training = encoder.apply(training)?;
    let cleaned_prediction = encoder.apply(prediction)?;

    let dataset = Dataset::from_frame(cleaned_training, &config.label_column)?;
    info!(
        "Loaded {} training rows with {} features",
        dataset.len(),
        dataset.feature_count
    );
    for stats in dataset.feature_stats() {
        debug!("  {}: min={}, max={}", stats.name, stats.min, stats.max);
    }

    let split = train_test_split(dataset.len(), config.test_fraction, config.seed)?;
    let train_set = dataset.subset(&split.train);
    let test_set = dataset.subset(&split.test);
    info!(
        "Split with seed {}: {} training rows, {} held out",
        config.seed,
        train_set.len(),
        test_set.len()
    );

    info!(
        "Training {} trees (max depth {}, learning rate {})",
        config.gbdt.num_trees,
        config.gbdt.max_depth,
        from_fixed(config.gbdt.learning_rate)
    );
    let model = GbdtTrainer::new(config.gbdt.clone()).train(&train_set)?;
    let model_hash = model.hash_hex()?;
    info!("Model hash: {}", model_hash);

    let accuracy = evaluate_accuracy(&model, &test_set)?;
    info!("Held-out accuracy: {:.4}", accuracy);

    if cleaned_prediction.is_empty() {
        return Err(PipelineError::Parse("prediction data has no rows".to_string()));
    }

    let rows: Vec<Vec<i64>> = cleaned_prediction
        .rows_in_order(&model.feature_names)?
        .iter()
        .map(|row| row_to_fixed(row))
        .collect();
    let predicted = model.predict_batch(&rows)?;

    let prediction = Verdict::from_predictions(&predicted);
    let mean_prediction =
        predicted.iter().map(|&p| from_fixed(p)).sum::<f64>() / predicted.len() as f64;
    info!(
        "Predicted {} rows, mean label {:.4}: {}",
        predicted.len(),
        mean_prediction,
        prediction
    );

    Ok(Outcome {
        accuracy,
        prediction,
        mean_prediction,
        model_hash,
        label_substituted: dataset.label_substituted,
        train_rows: train_set.len(),
        test_rows: test_set.len(),
        predicted_rows: predicted.len(),
    })
}
