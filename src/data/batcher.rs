// ============================================================
// Layer 4 — Matrix Batcher
// ============================================================
// Moves data between host matrices and backend tensors.
//
// How batching works here:
//   Input:  a Matrix plus the row indices of one mini-batch
//   Output: a Tensor of shape [batch_size, n_features]
//
//   The selected rows are already contiguous row-major floats,
//   so a 1D tensor is created and reshaped:
//   [r1_f1, ..., r1_fN, r2_f1, ..., rB_fN] → [B, N]
//
// Mini-batch partitioning also lives here. Only *full* batches
// are produced; a trailing partial batch is dropped.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;

use crate::domain::matrix::Matrix;
use crate::error::{DaeError, Result};

/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct MatrixBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> MatrixBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Upload a whole matrix as a `[rows, cols]` tensor.
    pub fn batch(&self, matrix: &Matrix) -> Tensor<B, 2> {
        Tensor::<B, 1>::from_floats(matrix.as_slice(), &self.device)
            .reshape([matrix.rows(), matrix.cols()])
    }

    /// Upload the given rows of a matrix, in index order.
    pub fn batch_rows(&self, matrix: &Matrix, indices: &[usize]) -> Tensor<B, 2> {
        self.batch(&matrix.select_rows(indices))
    }
}

/// Download a 2D tensor into a host matrix.
pub fn to_matrix<B: Backend>(tensor: Tensor<B, 2>) -> Result<Matrix> {
    let [rows, cols] = tensor.dims();
    let values = tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| DaeError::TensorData(format!("{e:?}")))?;
    Matrix::new(rows, cols, values)
}

/// Split an epoch's row order into full mini-batches.
///
/// `batch_size` must be non-zero; the remainder that does not fill a
/// batch is not returned.
pub fn full_batches(order: &[usize], batch_size: usize) -> std::slice::ChunksExact<'_, usize> {
    order.chunks_exact(batch_size)
}
