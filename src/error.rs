// ============================================================
// Library Error Types
// ============================================================
// Every fallible operation in the library returns DaeError.
// The application and CLI layers wrap it in anyhow with context.

use thiserror::Error;

/// Errors raised by the autoencoder core.
#[derive(Debug, Error)]
pub enum DaeError {
    /// Input width does not match the configured `n_input`
    #[error("shape mismatch: expected {expected} features per row, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// A matrix was built from rows of differing widths
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRows {
        row:      usize,
        expected: usize,
        found:    usize,
    },

    #[error("sampling requires at least one seed example")]
    EmptySeedSet,

    #[error("cannot run an optimizer step on an empty batch")]
    EmptyBatch,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading values back out of a backend tensor failed
    #[error("cannot read tensor data: {0}")]
    TensorData(String),
}

pub type Result<T> = std::result::Result<T, DaeError>;
