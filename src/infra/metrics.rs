// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records per-epoch training cost to a CSV file.
//
// Output file: <checkpoint dir>/metrics.csv
//
// Example CSV output:
//   epoch,avg_cost,batches
//   1,2.771904,10
//   2,2.603315,10
//   ...
//
// Epochs are written 1-based, matching the training log lines.
// Epochs without a full batch never appear.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::trainer::EpochSummary;

const HEADER: &str = "epoch,avg_cost,batches";

/// Appends epoch summaries to a metrics CSV.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet, so
    /// repeated runs append to one log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, summary: &EpochSummary) -> Result<()> {
        self.log_all(std::slice::from_ref(summary))
    }

    pub fn log_all(&self, summaries: &[EpochSummary]) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        for s in summaries {
            writeln!(f, "{},{:.6},{}", s.epoch + 1, s.avg_cost, s.batches)?;
        }

        tracing::debug!("Logged {} epochs to '{}'", summaries.len(), self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
