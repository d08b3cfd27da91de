//! Tabular frames read from CSV files
//!
//! `RawFrame` keeps every cell as trimmed text, column by column, exactly as
//! the file provided it. `NumericFrame` is the cleaned counterpart produced by
//! the encoder.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::errors::{PipelineError, Result};

/// Cell literals treated as missing values
pub const MISSING_LITERALS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

pub fn is_missing(cell: &str) -> bool {
    MISSING_LITERALS.contains(&cell)
}

/// Column-major textual frame
#[derive(Clone, Debug, PartialEq)]
pub struct RawFrame {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    rows: usize,
}

impl RawFrame {
    /// Build a frame from a header and row-major cells.
    ///
    /// Short rows are padded with missing cells; long rows are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::Parse("missing header row".to_string()));
        }

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(PipelineError::Parse(format!("duplicate column '{}'", header)));
            }
        }

        let width = headers.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        let row_count = rows.len();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(PipelineError::Parse(format!(
                    "row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    width
                )));
            }

            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or_default());
            }
        }

        Ok(Self {
            headers,
            columns,
            rows: row_count,
        })
    }

    /// Load a frame from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PipelineError::FileNotFound(path.to_path_buf()),
            _ => PipelineError::Parse(format!("{}: {}", path.display(), err)),
        })?;

        Self::from_reader(file).map_err(|err| match err {
            PipelineError::Parse(msg) => PipelineError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Load a frame from any CSV source
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|err| PipelineError::Parse(err.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| PipelineError::Parse(err.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.columns[idx].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Column-major frame with every cell coerced to a number
#[derive(Clone, Debug, PartialEq)]
pub struct NumericFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl NumericFrame {
    pub fn new(rows: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            rows,
        }
    }

    pub fn push_column(&mut self, name: String, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.rows);
        self.names.push(name);
        self.columns.push(values);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Detach a column, returning its values
    pub fn take_column(&mut self, name: &str) -> Option<Vec<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Row-major values ordered by `names`.
    ///
    /// The frame must hold exactly the requested columns; order may differ.
    pub fn rows_in_order(&self, names: &[String]) -> Result<Vec<Vec<f64>>> {
        let missing: Vec<&str> = names
            .iter()
            .filter(|n| !self.names.contains(n))
            .map(String::as_str)
            .collect();
        let unexpected: Vec<&str> = self
            .names
            .iter()
            .filter(|n| !names.contains(n))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            let mut parts = Vec::new();
            if !missing.is_empty() {
                parts.push(format!("missing columns [{}]", missing.join(", ")));
            }
            if !unexpected.is_empty() {
                parts.push(format!("unexpected columns [{}]", unexpected.join(", ")));
            }
            return Err(PipelineError::SchemaMismatch(format!(
                "prediction data does not match training features: {}",
                parts.join("; ")
            )));
        }

        let order: Vec<&[f64]> = names
            .iter()
            .filter_map(|n| self.column(n))
            .collect();

        Ok((0..self.rows)
            .map(|row| order.iter().map(|column| column[row]).collect())
            .collect())
    }
}
