//! End-to-end tests of the train and predict pipeline on CSV files
//!
//! Ensures identical outcomes are produced across multiple runs.

use anyhow::Result;
use dyslexia_ai_trainer::{
    train_and_predict, CategoryEncoder, GbdtConfig, PipelineConfig, PipelineError, RawFrame, Report,
    Verdict,
};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `contents` as `name` inside the temp dir
fn write_csv(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(path)
}

/// 100 labelled rows: dyslexia follows the score column, age is noise
fn training_csv() -> String {
    let mut csv = String::from("age,score,dyslexia\n");
    for i in 0..100 {
        let high = i % 4 != 0;
        csv.push_str(&format!(
            "{},{},{}\n",
            6 + (i * 7) % 10,
            if high { "high" } else { "low" },
            u8::from(high)
        ));
    }
    csv
}

fn prediction_csv(high_rows: usize, low_rows: usize) -> String {
    let mut csv = String::from("age,score\n");
    for i in 0..high_rows {
        csv.push_str(&format!("{},high\n", 7 + i % 5));
    }
    for i in 0..low_rows {
        csv.push_str(&format!("{},low\n", 8 + i % 5));
    }
    csv
}

#[test]
fn test_screening_example() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(8, 2))?;

    let outcome = train_and_predict(&training, &prediction, &PipelineConfig::default())?;

    assert_eq!(outcome.accuracy, 1.0);
    assert_eq!(outcome.prediction, Verdict::Likely);
    assert_eq!(outcome.train_rows, 75);
    assert_eq!(outcome.test_rows, 25);
    assert_eq!(outcome.predicted_rows, 10);
    assert!((outcome.mean_prediction - 0.8).abs() < 1e-9);

    let report = Report::from(&outcome).to_json()?;
    assert_eq!(report, r#"{"accuracy": 1.0, "prediction": "Dyslexia Likely"}"#);
    Ok(())
}

#[test]
fn test_mostly_low_scores_not_likely() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(2, 8))?;

    let outcome = train_and_predict(&training, &prediction, &PipelineConfig::default())?;
    assert_eq!(outcome.prediction, Verdict::NotLikely);
    Ok(())
}

#[test]
fn test_exact_half_is_not_likely() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(5, 5))?;

    let outcome = train_and_predict(&training, &prediction, &PipelineConfig::default())?;
    assert!((outcome.mean_prediction - 0.5).abs() < 1e-9);
    assert_eq!(outcome.prediction, Verdict::NotLikely);
    Ok(())
}

#[test]
fn test_missing_label_column_trains_on_zeros() -> Result<()> {
    let dir = TempDir::new()?;
    let unlabelled = training_csv().replace(",dyslexia", "").replace(",1\n", "\n").replace(",0\n", "\n");
    let training = write_csv(&dir, "training.csv", &unlabelled)?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(10, 0))?;

    let outcome = train_and_predict(&training, &prediction, &PipelineConfig::default())?;
    assert_eq!(outcome.accuracy, 1.0);
    assert_eq!(outcome.prediction, Verdict::NotLikely);
    assert!(outcome.label_substituted);
    Ok(())
}

#[test]
fn test_huge_numeric_feature_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    // perfectly separable, but every timestamp overflows micro units
    let mut csv = String::from("ts,dyslexia\n");
    for i in 0..40u64 {
        csv.push_str(&format!("{},{}\n", 10_000_000_000_000u64 + i * 1_000_000_000_000, u8::from(i >= 20)));
    }
    let training = write_csv(&dir, "training.csv", &csv)?;
    let prediction = write_csv(&dir, "prediction.csv", "ts\n1\n")?;

    let err = train_and_predict(&training, &prediction, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
    assert!(err.to_string().contains("column 'ts' row 1"), "{}", err);

    let report = Report::from(&err).to_json()?;
    assert!(report.starts_with(r#"{"error": "parse error: "#));
    Ok(())
}

#[test]
fn test_prediction_schema_mismatch() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", "age,height\n7,120\n")?;

    let err = train_and_predict(&training, &prediction, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaMismatch(_)));

    let report = Report::from(&err).to_json()?;
    assert!(report.starts_with(r#"{"error": "schema mismatch: "#));
    Ok(())
}

#[test]
fn test_missing_file() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let absent = dir.path().join("absent.csv");

    let err = train_and_predict(&training, &absent, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::FileNotFound(ref path) if *path == absent));

    let err = train_and_predict(&absent, &training, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::FileNotFound(_)));
    Ok(())
}

#[test]
fn test_shared_encoding_across_files() -> Result<()> {
    let dir = TempDir::new()?;
    let training_path = write_csv(&dir, "training.csv", &training_csv())?;
    // only "low" present; encoding this file alone would code it 0 instead of 1
    let prediction_path = write_csv(&dir, "prediction.csv", &prediction_csv(0, 6))?;

    let training = RawFrame::from_csv(&training_path)?;
    let prediction = RawFrame::from_csv(&prediction_path)?;
    let encoder = CategoryEncoder::fit(&training);
    let cleaned = encoder.apply(&prediction)?;
    assert!(cleaned.column("score").unwrap().iter().all(|&v| v == 1.0));

    let outcome = train_and_predict(&training_path, &prediction_path, &PipelineConfig::default())?;
    assert_eq!(outcome.prediction, Verdict::NotLikely);
    assert_eq!(outcome.mean_prediction, 0.0);
    assert!(!outcome.label_substituted);
    Ok(())
}

#[test]
fn test_deterministic_runs() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(4, 6))?;

    let config = PipelineConfig {
        seed: 7,
        gbdt: GbdtConfig {
            num_trees: 10,
            max_depth: 3,
            ..GbdtConfig::default()
        },
        ..PipelineConfig::default()
    };

    let first = train_and_predict(&training, &prediction, &config)?;
    let second = train_and_predict(&training, &prediction, &config)?;

    assert_eq!(first, second);
    assert_eq!(first.model_hash, second.model_hash);
    Ok(())
}

#[test]
fn test_seed_changes_split_not_verdict() -> Result<()> {
    let dir = TempDir::new()?;
    let training = write_csv(&dir, "training.csv", &training_csv())?;
    let prediction = write_csv(&dir, "prediction.csv", &prediction_csv(9, 1))?;

    for seed in [1, 42, 1234] {
        let config = PipelineConfig {
            seed,
            ..PipelineConfig::default()
        };
        let outcome = train_and_predict(&training, &prediction, &config)?;
        assert_eq!(outcome.prediction, Verdict::Likely, "seed {}", seed);
        assert_eq!(outcome.accuracy, 1.0, "seed {}", seed);
    }
    Ok(())
}
