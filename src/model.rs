//! Trained SVM model and decision function evaluation

use crate::core::{Prediction, Result, SolveSummary, SvmError, Task};
use crate::kernel::Kernel;
use crate::matrix::{RowBlock, TrainingMatrix};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Sparse support-vector model produced by a converged (or best-effort)
/// solve. All arrays are sized to the exact support count and own their
/// storage; nothing references solver-internal buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmModel {
    /// Dual coefficients: y_i * alpha_i for classification, the signed
    /// alpha difference for regression
    pub dual_coefs: Vec<f64>,
    /// Support-vector rows extracted from the training matrix
    pub support_rows: RowBlock,
    /// Original training-set indices of the support vectors
    pub support_idx: Vec<usize>,
    /// Bias term b of the decision function
    pub bias: f64,
    /// Number of support vectors
    pub n_support: usize,
    /// Distinct label values (classification only)
    pub classes: Option<Vec<f64>>,
    /// Task the model was trained for
    pub task: Task,
    /// How the solve ended
    pub summary: SolveSummary,
}

impl SvmModel {
    /// Raw decision values for every row of `x`:
    /// `sum_s coef_s * K(x_i, sv_s) + b`
    pub fn decision_values<K: Kernel>(&self, kernel: &K, x: &TrainingMatrix) -> Result<Vec<f64>> {
        if x.n_cols() != self.support_rows.n_cols() && self.n_support > 0 {
            return Err(SvmError::DimensionMismatch {
                expected: self.support_rows.n_cols(),
                actual: x.n_cols(),
            });
        }
        let values = (0..x.n_rows())
            .into_par_iter()
            .map(|i| {
                let xi = x.row(i);
                let mut acc = self.bias;
                for (s, &coef) in self.dual_coefs.iter().enumerate() {
                    acc += coef * kernel.eval(&xi, &self.support_rows.row(s));
                }
                acc
            })
            .collect();
        Ok(values)
    }

    /// Predict labels (classification) by thresholding the decision value
    pub fn predict<K: Kernel>(&self, kernel: &K, x: &TrainingMatrix) -> Result<Vec<Prediction>> {
        let values = self.decision_values(kernel, x)?;
        Ok(values
            .into_iter()
            .map(|dv| {
                let label = if dv >= 0.0 { 1.0 } else { -1.0 };
                Prediction::new(label, dv)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SolveSummary, StopReason};
    use crate::kernel::LinearKernel;
    use crate::matrix::DenseMatrix;
    use approx::assert_relative_eq;

    fn model() -> SvmModel {
        // two support vectors at x = +1 and x = -1, coefficients +-0.5
        SvmModel {
            dual_coefs: vec![0.5, -0.5],
            support_rows: RowBlock::Dense {
                data: vec![1.0, -1.0],
                n_rows: 2,
                n_cols: 1,
            },
            support_idx: vec![0, 1],
            bias: 0.0,
            n_support: 2,
            classes: Some(vec![-1.0, 1.0]),
            task: Task::Classification,
            summary: SolveSummary {
                stop_reason: StopReason::Converged,
                outer_iterations: 1,
                inner_iterations: 1,
                final_gap: Some(0.0),
            },
        }
    }

    #[test]
    fn test_decision_values_linear() {
        let m = model();
        let x = TrainingMatrix::Dense(
            DenseMatrix::from_column_major(vec![2.0, -2.0], 2, 1).unwrap(),
        );
        let dv = m.decision_values(&LinearKernel::new(), &x).unwrap();
        assert_relative_eq!(dv[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(dv[1], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_predict_thresholds_by_sign() {
        let m = model();
        let x = TrainingMatrix::Dense(
            DenseMatrix::from_column_major(vec![0.5, -0.5], 2, 1).unwrap(),
        );
        let preds = m.predict(&LinearKernel::new(), &x).unwrap();
        assert_eq!(preds[0].label, 1.0);
        assert_eq!(preds[1].label, -1.0);
    }

    #[test]
    fn test_dimension_check() {
        let m = model();
        let x = TrainingMatrix::Dense(
            DenseMatrix::from_column_major(vec![1.0, 1.0], 1, 2).unwrap(),
        );
        assert!(m.decision_values(&LinearKernel::new(), &x).is_err());
    }
}
