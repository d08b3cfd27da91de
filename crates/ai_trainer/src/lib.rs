//! Dyslexia screener trainer - deterministic offline GBDT classifier
//!
//! Cleans CSV datasets into numbers, trains a Gradient Boosted Decision Tree
//! classifier with full determinism, and aggregates its predictions on a
//! second dataset into a single verdict.

pub mod cart;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod encoder;
pub mod errors;
pub mod frame;
pub mod pipeline;
pub mod report;
pub mod trainer;

pub use config::PipelineConfig;
pub use dataset::{Dataset, FeatureStats};
pub use deterministic::{train_test_split, LcgRng, SplitIndices, SplitTieBreaker};
pub use encoder::{clean_frame, CategoryEncoder, ColumnEncoding};
pub use errors::PipelineError;
pub use frame::{NumericFrame, RawFrame};
pub use pipeline::{train_and_predict, train_and_predict_frames, Outcome};
pub use report::{Report, Verdict, MISSING_INPUTS_MESSAGE};
pub use trainer::{evaluate_accuracy, GbdtConfig, GbdtTrainer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
