//! Pipeline configuration
//!
//! There is no configuration file; the defaults below are the fixed
//! constants of the screener and the CLI can override each of them.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, Result};
use crate::trainer::GbdtConfig;

/// Default label column name
pub const DEFAULT_LABEL_COLUMN: &str = "dyslexia";

/// Default share of training rows held out for accuracy
pub const DEFAULT_TEST_FRACTION: f64 = 0.25;

/// Default seed of the train/test shuffle
pub const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub label_column: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub gbdt: GbdtConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            gbdt: GbdtConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.label_column.is_empty() {
            return Err(PipelineError::ModelFit("label column name is empty".to_string()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::ModelFit(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.gbdt.validate()
    }
}
