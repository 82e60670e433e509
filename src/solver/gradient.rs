//! Full gradient propagation
//!
//! Applies the working set's coefficient deltas to the global gradient:
//! `f_i += sum_k K[i, k] * delta_alpha_k`. This is the dominant cost per
//! outer iteration, so the working set is first filtered down to the
//! slots that actually moved and the kernel tile is only requested for
//! those columns, batched by the provider's memory policy. For
//! regression the mirrored half of the gradient receives the same
//! update because the duplicated instances share kernel rows.

use crate::core::Result;
use crate::kernel::Kernel;
use crate::solver::tiles::KernelMatrixProvider;
use rayon::prelude::*;

pub fn apply_deltas<K: Kernel>(
    provider: &KernelMatrixProvider<'_, K>,
    ws: &[usize],
    delta_alpha: &[f64],
    f: &mut [f64],
    n_rows: usize,
) -> Result<()> {
    // skip the linear algebra entirely when the block made no progress
    let mut subset = Vec::new();
    let mut deltas = Vec::new();
    for (k, &da) in delta_alpha.iter().enumerate() {
        if da != 0.0 {
            subset.push(ws[k] % n_rows);
            deltas.push(da);
        }
    }
    if subset.is_empty() {
        return Ok(());
    }

    let mirrored = f.len() == 2 * n_rows;
    let (first, second) = f.split_at_mut(n_rows.min(f.len()));
    let width = subset.len();

    provider.for_each_batch(&subset, |range, tile| {
        first[range.clone()]
            .par_iter_mut()
            .zip(tile.par_chunks(width))
            .for_each(|(fi, krow)| {
                let mut acc = 0.0;
                for (kv, da) in krow.iter().zip(deltas.iter()) {
                    acc += kv * da;
                }
                *fi += acc;
            });
        if mirrored {
            second[range.clone()]
                .par_iter_mut()
                .zip(tile.par_chunks(width))
                .for_each(|(fi, krow)| {
                    let mut acc = 0.0;
                    for (kv, da) in krow.iter().zip(deltas.iter()) {
                        acc += kv * da;
                    }
                    *fi += acc;
                });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SolverConfig;
    use crate::kernel::LinearKernel;
    use crate::matrix::{DenseMatrix, TrainingMatrix};
    use approx::assert_relative_eq;

    fn x() -> TrainingMatrix {
        TrainingMatrix::Dense(
            DenseMatrix::from_rows(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]).unwrap(),
        )
    }

    #[test]
    fn test_zero_deltas_skip_update() {
        let x = x();
        let kernel = LinearKernel::new();
        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        let mut f = vec![1.0, 2.0, 3.0];
        apply_deltas(&provider, &[0, 1], &[0.0, 0.0], &mut f, 3).unwrap();
        assert_eq!(f, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_gradient_accumulates_kernel_columns() {
        let x = x();
        let kernel = LinearKernel::new();
        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        let mut f = vec![0.0; 3];
        // ws slots 0 and 2 moved by +0.5 and -0.25
        apply_deltas(&provider, &[0, 1, 2], &[0.5, 0.0, -0.25], &mut f, 3).unwrap();
        // f_i = 0.5 * K(i, 0) - 0.25 * K(i, 2)
        assert_relative_eq!(f[0], 0.5 * 1.0 - 0.25 * 1.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 0.5 * 0.0 - 0.25 * 1.0, epsilon = 1e-12);
        assert_relative_eq!(f[2], 0.5 * 1.0 - 0.25 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_regression_mirrored_half_receives_same_update() {
        let x = x();
        let kernel = LinearKernel::new();
        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        let mut f = vec![0.0; 6];
        // duplicated index 4 maps to training row 1
        apply_deltas(&provider, &[4], &[1.0], &mut f, 3).unwrap();
        assert_relative_eq!(f[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(f[4], 1.0, epsilon = 1e-12);
        assert_eq!(f[0], 0.0);
        assert_eq!(f[3], 0.0);
    }

    #[test]
    fn test_batched_update_matches_single_tile() {
        let x = x();
        let kernel = LinearKernel::new();
        let mut f_whole = vec![0.0; 3];
        let mut f_batched = vec![0.0; 3];

        let cfg = SolverConfig::default();
        let provider = KernelMatrixProvider::new(&x, &kernel, &cfg);
        apply_deltas(&provider, &[0, 2], &[0.3, 0.7], &mut f_whole, 3).unwrap();

        let mut tight = SolverConfig::default();
        tight.tile_budget_bytes = 16; // one row per batch
        let provider = KernelMatrixProvider::new(&x, &kernel, &tight);
        apply_deltas(&provider, &[0, 2], &[0.3, 0.7], &mut f_batched, 3).unwrap();

        for (a, b) in f_whole.iter().zip(f_batched.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}
