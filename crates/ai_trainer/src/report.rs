//! JSON documents printed by the CLI

use std::fmt;
use std::io;

use dyslexia_ai_core::SCALE;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};

use crate::errors::PipelineError;
use crate::pipeline::Outcome;

/// Error printed when either input path is absent
pub const MISSING_INPUTS_MESSAGE: &str = "Both training and prediction data must be provided";

/// Aggregate prediction over all rows of the prediction data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Dyslexia Likely")]
    Likely,
    #[serde(rename = "Dyslexia Not Likely")]
    NotLikely,
}

impl Verdict {
    /// `Likely` when the mean predicted label (micro units) is strictly above 0.5
    pub fn from_predictions(predicted: &[i64]) -> Self {
        let sum: i128 = predicted.iter().map(|&p| p as i128).sum();
        if !predicted.is_empty() && sum * 2 > predicted.len() as i128 * SCALE as i128 {
            Self::Likely
        } else {
            Self::NotLikely
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Likely => "Dyslexia Likely",
            Self::NotLikely => "Dyslexia Not Likely",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output document: either the result or a single error message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Success { accuracy: f64, prediction: Verdict },
    Failure { error: String },
}

impl Report {
    pub fn missing_inputs() -> Self {
        Self::Failure {
            error: MISSING_INPUTS_MESSAGE.to_string(),
        }
    }

    /// Single-line JSON with `": "` and `", "` separators
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, SpacedFormatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|err| serde::ser::Error::custom(err.to_string()))
    }
}

/// Compact formatter that keeps a space after separators
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

impl From<&Outcome> for Report {
    fn from(outcome: &Outcome) -> Self {
        Self::Success {
            accuracy: outcome.accuracy,
            prediction: outcome.prediction,
        }
    }
}

impl From<&PipelineError> for Report {
    fn from(err: &PipelineError) -> Self {
        Self::Failure {
            error: err.to_string(),
        }
    }
}
