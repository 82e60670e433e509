//! Row-compressed (CSR) training matrix

use crate::core::{Result, SvmError};
use crate::matrix::RowView;
use serde::{Deserialize, Serialize};

/// Sparse matrix in CSR layout: `row_ptr[i]..row_ptr[i + 1]` indexes the
/// nonzeros of row `i` in `values`/`col_indices`. Column indices must be
/// sorted within each row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMatrix {
    values: Vec<f64>,
    col_indices: Vec<usize>,
    row_ptr: Vec<usize>,
    n_rows: usize,
    n_cols: usize,
}

impl CsrMatrix {
    pub fn new(
        values: Vec<f64>,
        col_indices: Vec<usize>,
        row_ptr: Vec<usize>,
        n_rows: usize,
        n_cols: usize,
    ) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SvmError::InvalidInput(format!(
                "matrix dimensions must be positive, got {}x{}",
                n_rows, n_cols
            )));
        }
        if row_ptr.len() != n_rows + 1 {
            return Err(SvmError::DimensionMismatch {
                expected: n_rows + 1,
                actual: row_ptr.len(),
            });
        }
        if values.len() != col_indices.len() || row_ptr[n_rows] != values.len() {
            return Err(SvmError::InvalidInput(
                "inconsistent CSR buffers".to_string(),
            ));
        }
        for w in row_ptr.windows(2) {
            if w[1] < w[0] {
                return Err(SvmError::InvalidInput(
                    "row pointers must be non-decreasing".to_string(),
                ));
            }
        }
        if col_indices.iter().any(|&j| j >= n_cols) {
            return Err(SvmError::InvalidInput(
                "column index out of range".to_string(),
            ));
        }
        Ok(Self {
            values,
            col_indices,
            row_ptr,
            n_rows,
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row(&self, i: usize) -> RowView<'_> {
        let (lo, hi) = (self.row_ptr[i], self.row_ptr[i + 1]);
        RowView::Sparse {
            cols: &self.col_indices[lo..hi],
            vals: &self.values[lo..hi],
        }
    }

    /// Borrow rows `r0..r1` as a standalone CSR block. Row pointers are
    /// rebased by the offset `row_ptr[r0]` so the block can be consumed
    /// like an independent matrix during batched kernel evaluation.
    pub fn row_batch(&self, r0: usize, r1: usize) -> CsrBatch<'_> {
        let base = self.row_ptr[r0];
        let end = self.row_ptr[r1];
        CsrBatch {
            values: &self.values[base..end],
            col_indices: &self.col_indices[base..end],
            row_ptr: &self.row_ptr[r0..=r1],
            base,
        }
    }

    /// Copy the given rows into a fresh CSR matrix (row extraction)
    pub fn gather_rows(&self, indices: &[usize]) -> CsrMatrix {
        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptr = Vec::with_capacity(indices.len() + 1);
        row_ptr.push(0);
        for &i in indices {
            let (lo, hi) = (self.row_ptr[i], self.row_ptr[i + 1]);
            values.extend_from_slice(&self.values[lo..hi]);
            col_indices.extend_from_slice(&self.col_indices[lo..hi]);
            row_ptr.push(values.len());
        }
        CsrMatrix {
            values,
            col_indices,
            row_ptr,
            n_rows: indices.len(),
            n_cols: self.n_cols,
        }
    }
}

/// Borrowed batch of consecutive CSR rows with rebased row pointers
pub struct CsrBatch<'a> {
    values: &'a [f64],
    col_indices: &'a [usize],
    row_ptr: &'a [usize],
    base: usize,
}

impl<'a> CsrBatch<'a> {
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    pub fn row(&self, local: usize) -> RowView<'a> {
        let lo = self.row_ptr[local] - self.base;
        let hi = self.row_ptr[local + 1] - self.base;
        RowView::Sparse {
            cols: &self.col_indices[lo..hi],
            vals: &self.values[lo..hi],
        }
    }
}
