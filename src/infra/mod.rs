// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Persistence concerns shared by the application use cases:
//
//   checkpoint.rs — Saving and loading a trained model.
//                   Weights go through Burn's MessagePack recorder,
//                   the DaeConfig is stored as JSON so the
//                   layer layout can be rebuilt first.
//
//   metrics.rs    — Per-epoch training cost, appended to a
//                   CSV file for plotting learning curves.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
