//! Dyslexia likelihood predictor CLI
//!
//! Trains on the first CSV, predicts on the second and prints one JSON
//! document to stdout. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dyslexia_ai_trainer::config::{DEFAULT_LABEL_COLUMN, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use dyslexia_ai_trainer::{train_and_predict, GbdtConfig, PipelineConfig, Report, VERSION};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "dyslexia-predict")]
#[command(author = "Dyslexia Screen Contributors")]
#[command(version = VERSION)]
#[command(about = "Train a GBDT classifier on labelled CSV data and screen a second CSV", long_about = None)]
struct Args {
    /// Training CSV path (must contain the label column)
    training: Option<PathBuf>,

    /// Prediction CSV path (same features, no label column)
    prediction: Option<PathBuf>,

    /// Further positional arguments are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,

    /// Label column name in the training data
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label: String,

    /// Number of boosting trees
    #[arg(long, default_value = "50")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "4")]
    max_depth: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "1")]
    min_samples_leaf: usize,

    /// Learning rate (fixed-point, e.g., 100000 = 0.1)
    #[arg(long, default_value = "100000")]
    learning_rate: i64,

    /// Share of training rows held out for accuracy
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Seed of the train/test shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            label_column: self.label.clone(),
            test_fraction: self.test_fraction,
            seed: self.seed,
            gbdt: GbdtConfig {
                num_trees: self.trees,
                max_depth: self.max_depth,
                min_samples_leaf: self.min_samples_leaf,
                learning_rate: self.learning_rate,
                ..GbdtConfig::default()
            },
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if !args.extra.is_empty() {
        warn!("Ignoring extra arguments: {:?}", args.extra);
    }

    let (training, prediction) = match (provided(&args.training), provided(&args.prediction)) {
        (Some(training), Some(prediction)) => (training, prediction),
        _ => {
            error!("Missing input path");
            emit(&Report::missing_inputs())?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = args.pipeline_config();
    let report = match train_and_predict(&training, &prediction, &config) {
        Ok(outcome) => {
            info!("Done: {} (model {})", outcome.prediction, outcome.model_hash);
            Report::from(&outcome)
        }
        Err(err) => {
            error!("Pipeline failed: {}", err);
            Report::from(&err)
        }
    };

    emit(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Empty path arguments count as missing
fn provided(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
}

fn emit(report: &Report) -> Result<()> {
    let json = report.to_json().context("Failed to serialize report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write report")?;
    Ok(())
}
