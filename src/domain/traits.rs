// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer reads and writes datasets only through
// these traits, so a loader for another format can be dropped
// in without touching the use cases.

use anyhow::Result;

use crate::domain::matrix::Matrix;

// ─── DataSource ───────────────────────────────────────────────────────────────
/// Anything that can produce a data matrix (one example per row).
///
/// Implementations:
///   - CsvLoader → comma-separated numeric text files
pub trait DataSource {
    fn load(&self) -> Result<Matrix>;
}

// ─── DataSink ─────────────────────────────────────────────────────────────────
/// Anything that can persist a data matrix, e.g. generated samples.
///
/// Implementations:
///   - CsvWriter → comma-separated numeric text files
pub trait DataSink {
    fn save(&self, matrix: &Matrix) -> Result<()>;
}
