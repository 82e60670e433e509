//! Dense column-major training matrix

use crate::core::{Result, SvmError};
use crate::matrix::RowView;
use serde::{Deserialize, Serialize};

/// Dense matrix stored column-major (Fortran order) with the default
/// leading dimension, i.e. element (i, j) lives at `data[j * n_rows + i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl DenseMatrix {
    /// Create a matrix from a column-major buffer
    pub fn from_column_major(data: Vec<f64>, n_rows: usize, n_cols: usize) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SvmError::InvalidInput(format!(
                "matrix dimensions must be positive, got {}x{}",
                n_rows, n_cols
            )));
        }
        if data.len() != n_rows * n_cols {
            return Err(SvmError::DimensionMismatch {
                expected: n_rows * n_cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            n_rows,
            n_cols,
        })
    }

    /// Create a matrix from row slices (convenient for tests and small data)
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        if n_rows == 0 || n_cols == 0 {
            return Err(SvmError::InvalidInput(
                "matrix dimensions must be positive".to_string(),
            ));
        }
        let mut data = vec![0.0; n_rows * n_cols];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SvmError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                data[j * n_rows + i] = v;
            }
        }
        Ok(Self {
            data,
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

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.n_rows + i]
    }

    /// View of row `i` as a strided slice (stride = leading dimension)
    pub fn row(&self, i: usize) -> RowView<'_> {
        RowView::Strided {
            data: &self.data[i..],
            stride: self.n_rows,
            len: self.n_cols,
        }
    }

    /// Copy row `i` into `out` (row gather for dense tiles)
    pub fn gather_row_into(&self, i: usize, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.n_cols);
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = self.data[j * self.n_rows + i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::dot;

    #[test]
    fn test_column_major_layout() {
        // 2x3 matrix: rows [1 2 3] and [4 5 6]
        let m = DenseMatrix::from_column_major(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 2, 3).unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(1, 1), 5.0);
    }

    #[test]
    fn test_from_rows_matches_column_major() {
        let a = DenseMatrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
        let b = DenseMatrix::from_column_major(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 2, 3).unwrap();
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(a.get(i, j), b.get(i, j));
            }
        }
    }

    #[test]
    fn test_strided_row_view() {
        let m = DenseMatrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
        let r0 = m.row(0);
        let r1 = m.row(1);
        assert_eq!(dot(&r0, &r1), 1.0 * 3.0 + 2.0 * 4.0);
    }

    #[test]
    fn test_gather_row() {
        let m = DenseMatrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
        let mut buf = vec![0.0; 3];
        m.gather_row_into(1, &mut buf);
        assert_eq!(buf, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_dimension_validation() {
        assert!(DenseMatrix::from_column_major(vec![1.0], 0, 1).is_err());
        assert!(DenseMatrix::from_column_major(vec![1.0, 2.0], 3, 1).is_err());
    }
}
