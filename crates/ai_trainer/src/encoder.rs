//! Column type coercion
//!
//! A `CategoryEncoder` is fitted once, on the training frame, and then applied
//! unchanged to every frame of the run. Textual columns therefore map the same
//! value to the same code in the training and the prediction data.

use std::collections::BTreeSet;

use dyslexia_ai_core::fixed::try_to_fixed;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PipelineError, Result};
use crate::frame::{is_missing, NumericFrame, RawFrame};

/// Code assigned to missing and unseen categorical values
pub const UNKNOWN_CODE: f64 = -1.0;

/// How a single column turns into numbers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnEncoding {
    /// Every present cell parses as a finite float
    Numeric,
    /// Every cell is `true`/`false` in any letter case
    Boolean,
    /// Code = position in the sorted list of distinct values
    Categorical { categories: Vec<String> },
}

/// Finite floats only; `inf` and `NAN` stay text
fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl ColumnEncoding {
    /// Infer the encoding from a column's cells
    pub fn infer(cells: &[String]) -> Self {
        let present = || cells.iter().map(String::as_str).filter(|c| !is_missing(c));

        if present().all(|c| parse_number(c).is_some()) {
            return Self::Numeric;
        }

        if present().count() == cells.len() && present().all(|c| parse_bool(c).is_some()) {
            return Self::Boolean;
        }

        let categories: BTreeSet<&str> = present().collect();
        Self::Categorical {
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    /// Encode `cells` of the column called `column`
    pub fn encode(&self, column: &str, cells: &[String]) -> Result<Vec<f64>> {
        match self {
            Self::Numeric => cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    if is_missing(cell) {
                        return Err(missing_value(column, row));
                    }
                    let value = parse_number(cell).ok_or_else(|| {
                        PipelineError::SchemaMismatch(format!(
                            "column '{}' is numeric in the training data but row {} holds '{}'",
                            column,
                            row + 1,
                            cell
                        ))
                    })?;
                    if try_to_fixed(value).is_none() {
                        return Err(PipelineError::Parse(format!(
                            "column '{}' row {}: value {} is out of range",
                            column,
                            row + 1,
                            cell
                        )));
                    }
                    Ok(value)
                })
                .collect(),
            Self::Boolean => cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    if is_missing(cell) {
                        return Err(missing_value(column, row));
                    }
                    parse_bool(cell)
                        .map(|b| if b { 1.0 } else { 0.0 })
                        .ok_or_else(|| {
                            PipelineError::SchemaMismatch(format!(
                                "column '{}' is boolean in the training data but row {} holds '{}'",
                                column,
                                row + 1,
                                cell
                            ))
                        })
                })
                .collect(),
            Self::Categorical { categories } => {
                let mut unseen = 0usize;
                let codes = cells
                    .iter()
                    .map(|cell| {
                        if is_missing(cell) {
                            return UNKNOWN_CODE;
                        }
                        match categories.binary_search(cell) {
                            Ok(code) => code as f64,
                            Err(_) => {
                                unseen += 1;
                                UNKNOWN_CODE
                            }
                        }
                    })
                    .collect();
                if unseen > 0 {
                    debug!("Column '{}': {} value(s) unseen at fit time", column, unseen);
                }
                Ok(codes)
            }
        }
    }
}

fn missing_value(column: &str, row: usize) -> PipelineError {
    PipelineError::Parse(format!(
        "column '{}' row {}: missing numeric value",
        column,
        row + 1
    ))
}

/// Column encodings fitted on one frame, reusable on others
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    columns: Vec<(String, ColumnEncoding)>,
}

impl CategoryEncoder {
    pub fn fit(frame: &RawFrame) -> Self {
        let columns = frame
            .columns()
            .map(|(name, cells)| (name.to_string(), ColumnEncoding::infer(cells)))
            .collect();
        Self { columns }
    }

    pub fn encoding(&self, column: &str) -> Option<&ColumnEncoding> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, encoding)| encoding)
    }

    /// Encode every column of `frame`.
    ///
    /// Columns the encoder was not fitted on get a column-local encoding.
    pub fn apply(&self, frame: &RawFrame) -> Result<NumericFrame> {
        let mut cleaned = NumericFrame::new(frame.len());

        for (name, cells) in frame.columns() {
            let values = match self.encoding(name) {
                Some(encoding) => encoding.encode(name, cells)?,
                None => {
                    debug!("Column '{}' was not seen at fit time", name);
                    ColumnEncoding::infer(cells).encode(name, cells)?
                }
            };
            cleaned.push_column(name.to_string(), values);
        }

        Ok(cleaned)
    }
}

/// Clean a single frame on its own
pub fn clean_frame(frame: &RawFrame) -> Result<NumericFrame> {
    CategoryEncoder::fit(frame).apply(frame)
}
