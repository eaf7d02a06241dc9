// ============================================================
// Layer 4 — CSV Data Loader
// ============================================================
// Loads a numeric dataset from a comma-separated text file.
//
// File format:
//   - one example per line, features separated by commas
//   - blank lines and lines starting with '#' are skipped
//   - every data line must have the same number of values
//
// Example:
//   # 4-pixel toy images
//   1,0,0,0
//   0,1,0,0
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::matrix::Matrix;
use crate::domain::traits::DataSource;

/// Reads a data matrix from a CSV file.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for CsvLoader {
    fn load(&self) -> Result<Matrix> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read data file '{}'", self.path.display()))?;

        let rows = parse_rows(&text)
            .with_context(|| format!("Invalid data in '{}'", self.path.display()))?;

        let matrix = Matrix::from_rows(rows)
            .with_context(|| format!("Inconsistent row widths in '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} rows × {} features from '{}'",
            matrix.rows(),
            matrix.cols(),
            self.path.display()
        );
        Ok(matrix)
    }
}

/// Parse every data line of a CSV document into a row of f32 values.
fn parse_rows(text: &str) -> Result<Vec<Vec<f32>>> {
    let mut rows = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                field
                    .parse::<f32>()
                    .with_context(|| format!("line {}: '{}' is not a number", line_no + 1, field))
            })
            .collect::<Result<Vec<f32>>>()?;

        rows.push(row);
    }

    Ok(rows)
}
