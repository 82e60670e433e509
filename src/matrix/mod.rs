//! Training matrix storage and row-level primitives
//!
//! The solver is polymorphic over a dense column-major layout and a
//! row-compressed sparse layout, modeled as a tagged variant. Both expose
//! row views plus the row-extraction primitives the kernel tile provider
//! builds on.

pub mod dense;
pub mod sparse;

pub use dense::DenseMatrix;
pub use sparse::{CsrBatch, CsrMatrix};

use serde::{Deserialize, Serialize};

/// Borrowed view of a single training row
#[derive(Debug, Clone, Copy)]
pub enum RowView<'a> {
    /// Contiguous row-major slice
    Dense(&'a [f64]),
    /// Strided view into a column-major buffer; element `j` is `data[j * stride]`
    Strided {
        data: &'a [f64],
        stride: usize,
        len: usize,
    },
    /// Sparse row with sorted column indices
    Sparse { cols: &'a [usize], vals: &'a [f64] },
}

/// Dot product between two row views, covering every layout combination
pub fn dot(a: &RowView<'_>, b: &RowView<'_>) -> f64 {
    match (a, b) {
        (RowView::Dense(x), RowView::Dense(y)) => {
            x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum()
        }
        (RowView::Dense(x), RowView::Strided { data, stride, len }) => (0..*len)
            .map(|j| x[j] * data[j * stride])
            .sum(),
        (RowView::Strided { .. }, RowView::Dense(_)) => dot(b, a),
        (
            RowView::Strided { data, stride, len },
            RowView::Strided {
                data: yd,
                stride: ys,
                ..
            },
        ) => (0..*len).map(|j| data[j * stride] * yd[j * ys]).sum(),
        (RowView::Sparse { cols, vals }, RowView::Dense(y)) => cols
            .iter()
            .zip(vals.iter())
            .map(|(&j, &v)| v * y[j])
            .sum(),
        (RowView::Dense(_), RowView::Sparse { .. }) => dot(b, a),
        (RowView::Sparse { cols, vals }, RowView::Strided { data, stride, .. }) => cols
            .iter()
            .zip(vals.iter())
            .map(|(&j, &v)| v * data[j * stride])
            .sum(),
        (RowView::Strided { .. }, RowView::Sparse { .. }) => dot(b, a),
        (
            RowView::Sparse { cols, vals },
            RowView::Sparse {
                cols: yc,
                vals: yv,
            },
        ) => {
            let mut result = 0.0;
            let (mut i, mut j) = (0, 0);
            while i < cols.len() && j < yc.len() {
                if cols[i] == yc[j] {
                    result += vals[i] * yv[j];
                    i += 1;
                    j += 1;
                } else if cols[i] < yc[j] {
                    i += 1;
                } else {
                    j += 1;
                }
            }
            result
        }
    }
}

/// Squared L2 norm of a row view
pub fn norm_sq(a: &RowView<'_>) -> f64 {
    match a {
        RowView::Dense(x) => x.iter().map(|v| v * v).sum(),
        RowView::Strided { data, stride, len } => {
            (0..*len).map(|j| data[j * stride]).map(|v| v * v).sum()
        }
        RowView::Sparse { vals, .. } => vals.iter().map(|v| v * v).sum(),
    }
}

/// Training matrix, read-only for the solver's lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainingMatrix {
    Dense(DenseMatrix),
    Sparse(CsrMatrix),
}

impl TrainingMatrix {
    pub fn n_rows(&self) -> usize {
        match self {
            TrainingMatrix::Dense(m) => m.n_rows(),
            TrainingMatrix::Sparse(m) => m.n_rows(),
        }
    }

    pub fn n_cols(&self) -> usize {
        match self {
            TrainingMatrix::Dense(m) => m.n_cols(),
            TrainingMatrix::Sparse(m) => m.n_cols(),
        }
    }

    pub fn row(&self, i: usize) -> RowView<'_> {
        match self {
            TrainingMatrix::Dense(m) => m.row(i),
            TrainingMatrix::Sparse(m) => m.row(i),
        }
    }

    /// Per-row squared L2 norms, computed once per fit call
    pub fn row_norms_sq(&self) -> Vec<f64> {
        (0..self.n_rows()).map(|i| norm_sq(&self.row(i))).collect()
    }

    /// Extract the given rows into an owned block. Dense input always
    /// produces a dense row-major block. Sparse input is densified only if
    /// the dense block would fit `densify_budget_bytes`, since contiguous
    /// rows speed up the kernel dot products downstream.
    pub fn gather_rows(&self, indices: &[usize], densify_budget_bytes: usize) -> RowBlock {
        match self {
            TrainingMatrix::Dense(m) => {
                let n_cols = m.n_cols();
                let mut data = vec![0.0; indices.len() * n_cols];
                for (k, &i) in indices.iter().enumerate() {
                    m.gather_row_into(i, &mut data[k * n_cols..(k + 1) * n_cols]);
                }
                RowBlock::Dense {
                    data,
                    n_rows: indices.len(),
                    n_cols,
                }
            }
            TrainingMatrix::Sparse(m) => {
                let dense_bytes = indices.len() * m.n_cols() * std::mem::size_of::<f64>();
                if dense_bytes <= densify_budget_bytes {
                    let n_cols = m.n_cols();
                    let mut data = vec![0.0; indices.len() * n_cols];
                    for (k, &i) in indices.iter().enumerate() {
                        if let RowView::Sparse { cols, vals } = m.row(i) {
                            let out = &mut data[k * n_cols..(k + 1) * n_cols];
                            for (&j, &v) in cols.iter().zip(vals.iter()) {
                                out[j] = v;
                            }
                        }
                    }
                    RowBlock::Dense {
                        data,
                        n_rows: indices.len(),
                        n_cols,
                    }
                } else {
                    RowBlock::Sparse(m.gather_rows(indices))
                }
            }
        }
    }
}

/// Owned block of extracted rows (working-set rows, support vectors)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RowBlock {
    Dense {
        data: Vec<f64>,
        n_rows: usize,
        n_cols: usize,
    },
    Sparse(CsrMatrix),
}

impl RowBlock {
    pub fn n_rows(&self) -> usize {
        match self {
            RowBlock::Dense { n_rows, .. } => *n_rows,
            RowBlock::Sparse(m) => m.n_rows(),
        }
    }

    pub fn n_cols(&self) -> usize {
        match self {
            RowBlock::Dense { n_cols, .. } => *n_cols,
            RowBlock::Sparse(m) => m.n_cols(),
        }
    }

    pub fn row(&self, i: usize) -> RowView<'_> {
        match self {
            RowBlock::Dense { data, n_cols, .. } => {
                RowView::Dense(&data[i * n_cols..(i + 1) * n_cols])
            }
            RowBlock::Sparse(m) => m.row(i),
        }
    }
}
