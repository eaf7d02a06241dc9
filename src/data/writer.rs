// ============================================================
// Layer 4 — CSV Data Writer
// ============================================================
// Writes a matrix back out in the same format CsvLoader reads,
// so generated samples and reconstructions can be re-loaded.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::domain::matrix::Matrix;
use crate::domain::traits::DataSink;

pub struct CsvWriter {
    path: PathBuf,
}

impl CsvWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSink for CsvWriter {
    fn save(&self, matrix: &Matrix) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;
        let mut out = BufWriter::new(file);

        for row in matrix.iter_rows() {
            let line = row
                .iter()
                .map(|v| format!("{v:.6}"))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "{line}")?;
        }
        out.flush()?;

        tracing::debug!("Wrote {} rows to '{}'", matrix.rows(), self.path.display());
        Ok(())
    }
}
