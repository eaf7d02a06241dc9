// ============================================================
// Layer 3 — Matrix Domain Type
// ============================================================
// A dense, row-major f32 matrix living in host memory.
// Every public input and output of the autoencoder is a Matrix:
// one row per example, one column per feature.
//
// Keeping this type free of Burn means the data layer and the
// application layer can load, slice and write datasets without
// touching a backend.

use serde::{Deserialize, Serialize};

use crate::error::{DaeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Wrap a flat row-major buffer. The buffer length must equal rows * cols.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(DaeError::ShapeMismatch {
                expected: rows * cols,
                found:    data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Build a matrix from nested rows, rejecting ragged input.
    ///
    /// An empty list gives a 0 × 0 matrix.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(DaeError::RaggedRows {
                    row:      i,
                    expected: cols,
                    found:    row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self { rows: rows.len(), cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Borrow row `i`. Panics when `i` is out of range, like slice indexing.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Gather the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix { rows: indices.len(), cols: self.cols, data }
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.iter_rows().map(<[f32]>::to_vec).collect()
    }
}
