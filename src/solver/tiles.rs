//! Kernel tile computation under memory budgets
//!
//! Recomputes the working-set self tile each outer iteration and streams
//! the full-set tile in row batches whenever the whole tile would blow
//! the configured byte budget. Per-row squared norms are computed once
//! per fit call and reused by distance-based kernels.

use crate::core::{Result, SolverConfig};
use crate::kernel::Kernel;
use crate::matrix::{RowBlock, TrainingMatrix};
use rayon::prelude::*;
use std::ops::Range;

pub struct KernelMatrixProvider<'a, K: Kernel> {
    x: &'a TrainingMatrix,
    kernel: &'a K,
    /// Squared L2 norms per training row; only present for kernels that
    /// consume them (RBF)
    norms: Option<Vec<f64>>,
    extraction_budget: usize,
    tile_budget: usize,
}

impl<'a, K: Kernel> KernelMatrixProvider<'a, K> {
    pub fn new(x: &'a TrainingMatrix, kernel: &'a K, config: &SolverConfig) -> Self {
        let norms = if kernel.uses_norms() {
            Some(x.row_norms_sq())
        } else {
            None
        };
        Self {
            x,
            kernel,
            norms,
            extraction_budget: config.extraction_budget_bytes,
            tile_budget: config.tile_budget_bytes,
        }
    }

    fn norm_of(&self, row: usize) -> f64 {
        self.norms.as_ref().map_or(0.0, |n| n[row])
    }

    fn eval(&self, a: &crate::matrix::RowView<'_>, b: &crate::matrix::RowView<'_>, na: f64, nb: f64) -> f64 {
        if self.norms.is_some() {
            self.kernel.eval_with_norms(a, b, na, nb)
        } else {
            self.kernel.eval(a, b)
        }
    }

    /// Extract the given training rows, densifying within the budget
    pub fn gather(&self, rows: &[usize]) -> RowBlock {
        self.x.gather_rows(rows, self.extraction_budget)
    }

    /// q*q kernel tile over the working set's training rows (row-major)
    pub fn ws_tile(&self, rows: &[usize]) -> Result<Vec<f64>> {
        let q = rows.len();
        let block = self.gather(rows);
        let mut tile = vec![0.0; q * q];
        tile.par_chunks_mut(q).enumerate().for_each(|(i, out)| {
            let ri = block.row(i);
            let ni = self.norm_of(rows[i]);
            for (j, slot) in out.iter_mut().enumerate() {
                *slot = self.eval(&ri, &block.row(j), ni, self.norm_of(rows[j]));
            }
        });
        Ok(tile)
    }

    /// Row-batch size honoring the tile byte budget, never below one row
    pub fn batch_rows(&self, subset_len: usize) -> usize {
        let per_row = subset_len * std::mem::size_of::<f64>();
        (self.tile_budget / per_row.max(1)).max(1)
    }

    /// Stream `K[rows, subset]` over sequential row batches. `subset`
    /// holds training-row indices (the working-set columns); the callback
    /// receives the global row range and the `range.len() * subset.len()`
    /// row-major tile for it.
    pub fn for_each_batch<F>(&self, subset: &[usize], mut body: F) -> Result<()>
    where
        F: FnMut(Range<usize>, &[f64]),
    {
        let n_rows = self.x.n_rows();
        let cols = self.gather(subset);
        let width = subset.len();
        let batch = self.batch_rows(width).min(n_rows);
        let mut tile = vec![0.0; batch * width];

        let mut r0 = 0;
        while r0 < n_rows {
            let r1 = (r0 + batch).min(n_rows);
            let rows = r1 - r0;
            match self.x {
                TrainingMatrix::Dense(m) => {
                    tile[..rows * width]
                        .par_chunks_mut(width)
                        .enumerate()
                        .for_each(|(local, out)| {
                            let ri = m.row(r0 + local);
                            let ni = self.norm_of(r0 + local);
                            for (k, slot) in out.iter_mut().enumerate() {
                                *slot =
                                    self.eval(&ri, &cols.row(k), ni, self.norm_of(subset[k]));
                            }
                        });
                }
                TrainingMatrix::Sparse(m) => {
                    // the rebased batch view behaves as a standalone CSR block
                    let view = m.row_batch(r0, r1);
                    tile[..rows * width]
                        .par_chunks_mut(width)
                        .enumerate()
                        .for_each(|(local, out)| {
                            let ri = view.row(local);
                            let ni = self.norm_of(r0 + local);
                            for (k, slot) in out.iter_mut().enumerate() {
                                *slot =
                                    self.eval(&ri, &cols.row(k), ni, self.norm_of(subset[k]));
                            }
                        });
                }
            }
            body(r0..r1, &tile[..rows * width]);
            r0 = r1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{LinearKernel, RbfKernel};
    use crate::matrix::{CsrMatrix, DenseMatrix};
    use approx::assert_relative_eq;

    fn dense_x() -> TrainingMatrix {
        TrainingMatrix::Dense(
            DenseMatrix::from_rows(&[
                &[1.0, 0.0],
                &[0.0, 1.0],
                &[1.0, 1.0],
                &[2.0, 0.0],
            ])
            .unwrap(),
        )
    }

    fn sparse_x() -> TrainingMatrix {
        TrainingMatrix::Sparse(
            CsrMatrix::new(
                vec![1.0, 1.0, 1.0, 1.0, 2.0],
                vec![0, 1, 0, 1, 0],
                vec![0, 1, 2, 4, 5],
                4,
                2,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_ws_tile_linear() {
        let x = dense_x();
        let kernel = LinearKernel::new();
        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        let tile = provider.ws_tile(&[0, 2, 3]).unwrap();
        // row 0 . row 2 = 1, row 2 . row 3 = 2, diag of row 3 = 4
        assert_relative_eq!(tile[0 * 3 + 1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(tile[1 * 3 + 2], 2.0, epsilon = 1e-12);
        assert_relative_eq!(tile[2 * 3 + 2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ws_tile_rbf_uses_cached_norms() {
        let x = dense_x();
        let kernel = RbfKernel::new(0.5);
        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        let tile = provider.ws_tile(&[0, 1]).unwrap();
        assert_relative_eq!(tile[0], 1.0, epsilon = 1e-12);
        // ||r0 - r1||^2 = 2
        assert_relative_eq!(tile[1], (-1.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_batch_rows_floor() {
        let x = dense_x();
        let kernel = LinearKernel::new();
        let mut cfg = SolverConfig::default();
        cfg.tile_budget_bytes = 1; // force single-row batches
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        assert_eq!(provider.batch_rows(1024), 1);
    }

    #[test]
    fn test_batched_full_tile_matches_unbatched() {
        let x = dense_x();
        let kernel = LinearKernel::new();
        let subset = [1, 3];

        let collect = |cfg: &SolverConfig| {
            let provider = KernelMatrixProvider::new(&x, &kernel, cfg);
            let mut out = vec![0.0; x.n_rows() * subset.len()];
            provider
                .for_each_batch(&subset, |range, tile| {
                    out[range.start * subset.len()..range.end * subset.len()]
                        .copy_from_slice(tile);
                })
                .unwrap();
            out
        };

        let whole = collect(&SolverConfig::default());
        let mut tight = SolverConfig::default();
        tight.tile_budget_bytes = subset.len() * 8; // one row per batch
        let batched = collect(&tight);
        assert_eq!(whole, batched);
    }

    #[test]
    fn test_sparse_and_dense_tiles_agree() {
        let kernel = RbfKernel::new(1.0);
        let cfg = SolverConfig::default();
        let xd = dense_x();
        let xs = sparse_x();
        let pd = KernelMatrixProvider::new(&xd, &kernel, &cfg);
        let ps = KernelMatrixProvider::new(&xs, &kernel, &cfg);
        let td = pd.ws_tile(&[0, 1, 2, 3]).unwrap();
        let ts = ps.ws_tile(&[0, 1, 2, 3]).unwrap();
        for (a, b) in td.iter().zip(ts.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sparse_batches_stay_sparse_under_tight_extraction_budget() {
        let kernel = LinearKernel::new();
        let mut cfg = SolverConfig::default();
        cfg.extraction_budget_bytes = 0;
        cfg.tile_budget_bytes = 2 * 8;
        let xs = sparse_x();
        let provider = KernelMatrixProvider::new(&xs, &kernel, &cfg);
        let mut rows_seen = 0;
        provider
            .for_each_batch(&[2], |range, tile| {
                rows_seen += range.len();
                assert_eq!(tile.len(), range.len());
            })
            .unwrap();
        assert_eq!(rows_seen, 4);
    }
}
