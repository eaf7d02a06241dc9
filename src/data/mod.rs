// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between files on disk and tensors on a device:
//
//   data.csv
//       │
//       ▼
//   CsvLoader        → parses rows into a Matrix
//       │
//       ▼
//   MatrixBatcher    → uploads mini-batches as [batch, features]
//       │
//       ▼
//   training loop / inference (Layer 5)
//       │
//       ▼
//   CsvWriter        → writes samples and reconstructions back out
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads numeric CSV files into a Matrix
pub mod loader;

/// Writes a Matrix as numeric CSV
pub mod writer;

/// Host matrix ⇄ tensor conversion and mini-batch partitioning
pub mod batcher;
