//! Conversion of converged solver state into a sparse model

use crate::core::{Result, SolveSummary, Task};
use crate::matrix::TrainingMatrix;
use crate::model::SvmModel;
use crate::solver::init::ProblemSetup;
use crate::solver::working_set::{in_lower_set, in_upper_set};

/// Build the final model from the solver's state. The produced arrays
/// are freshly allocated and sized to the exact support count; the
/// caller releases the solver buffers right after.
pub fn extract_model(
    x: &TrainingMatrix,
    setup: &ProblemSetup,
    alpha: &[f64],
    f: &[f64],
    task: Task,
    summary: SolveSummary,
) -> Result<SvmModel> {
    let n_rows = x.n_rows();
    let mut support_idx = Vec::new();
    let mut dual_coefs = Vec::new();
    match task {
        Task::Classification => {
            for i in 0..n_rows {
                if alpha[i] != 0.0 {
                    support_idx.push(i);
                    dual_coefs.push(setup.y[i] * alpha[i]);
                }
            }
        }
        Task::Regression => {
            for i in 0..n_rows {
                let coef = alpha[i] - alpha[n_rows + i];
                if coef != 0.0 {
                    support_idx.push(i);
                    dual_coefs.push(coef);
                }
            }
        }
    }

    let bias = calculate_bias(setup, alpha, f);
    // budget 0 keeps sparse training data sparse in the stored model
    let support_rows = x.gather_rows(&support_idx, 0);

    Ok(SvmModel {
        dual_coefs,
        support_rows,
        n_support: support_idx.len(),
        support_idx,
        bias,
        classes: setup.classes.clone(),
        task,
        summary,
    })
}

/// Average the gradient over free support vectors; with none available,
/// take the midpoint between the bound upper and lower sets.
fn calculate_bias(setup: &ProblemSetup, alpha: &[f64], f: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..setup.n_train {
        if alpha[i] > 0.0 && alpha[i] < setup.c_vec[i] {
            sum += f[i];
            count += 1;
        }
    }
    if count > 0 {
        return -sum / count as f64;
    }

    let mut f_up = f64::INFINITY;
    let mut f_low = f64::NEG_INFINITY;
    for i in 0..setup.n_train {
        if in_upper_set(i, alpha, &setup.y, &setup.c_vec) {
            f_up = f_up.min(f[i]);
        }
        if in_lower_set(i, alpha, &setup.y, &setup.c_vec) {
            f_low = f_low.max(f[i]);
        }
    }
    if f_up.is_finite() && f_low.is_finite() {
        -0.5 * (f_low + f_up)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SolverConfig, StopReason};
    use crate::matrix::DenseMatrix;
    use crate::solver::init::setup_problem;
    use approx::assert_relative_eq;

    fn summary() -> SolveSummary {
        SolveSummary {
            stop_reason: StopReason::Converged,
            outer_iterations: 0,
            inner_iterations: 0,
            final_gap: Some(0.0),
        }
    }

    fn x2() -> TrainingMatrix {
        TrainingMatrix::Dense(DenseMatrix::from_rows(&[&[1.0], &[-1.0]]).unwrap())
    }

    #[test]
    fn test_classification_coefficients_carry_label_sign() {
        let cfg = SolverConfig::default();
        let setup = setup_problem(&[1.0, -1.0], None, &cfg, Task::Classification).unwrap();
        let alpha = [0.5, 0.5];
        let f = [0.0, 0.0];
        let model =
            extract_model(&x2(), &setup, &alpha, &f, Task::Classification, summary()).unwrap();
        assert_eq!(model.n_support, 2);
        assert_eq!(model.support_idx, vec![0, 1]);
        assert_eq!(model.dual_coefs, vec![0.5, -0.5]);
        assert_eq!(model.classes, Some(vec![-1.0, 1.0]));
    }

    #[test]
    fn test_regression_coefficients_are_signed_differences() {
        let cfg = SolverConfig::default();
        let setup = setup_problem(&[1.0, -1.0], None, &cfg, Task::Regression).unwrap();
        // alpha pairs: (0.3, 0.0) and (0.2, 0.2) - the second cancels out
        let alpha = [0.3, 0.2, 0.0, 0.2];
        let f = [0.0; 4];
        let model = extract_model(&x2(), &setup, &alpha, &f, Task::Regression, summary()).unwrap();
        assert_eq!(model.n_support, 1);
        assert_eq!(model.support_idx, vec![0]);
        assert_relative_eq!(model.dual_coefs[0], 0.3, epsilon = 1e-12);
        assert!(model.classes.is_none());
    }

    #[test]
    fn test_bias_from_free_support_vectors() {
        let cfg = SolverConfig::default();
        let setup = setup_problem(&[1.0, -1.0], None, &cfg, Task::Classification).unwrap();
        let alpha = [0.5, 0.5];
        let f = [-0.2, 0.4];
        assert_relative_eq!(
            calculate_bias(&setup, &alpha, &f),
            -0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bias_fallback_to_bound_vectors() {
        let cfg = SolverConfig::default();
        let setup = setup_problem(&[1.0, -1.0], None, &cfg, Task::Classification).unwrap();
        // both at bounds: alpha = C = 1
        let alpha = [1.0, 1.0];
        let f = [-0.5, 0.7];
        // upper set: index 1 (y=-1, alpha>0), lower set: index 0
        assert_relative_eq!(
            calculate_bias(&setup, &alpha, &f),
            -0.5 * (-0.5 + 0.7),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_alpha_yields_empty_model() {
        let cfg = SolverConfig::default();
        let setup = setup_problem(&[1.0, -1.0], None, &cfg, Task::Classification).unwrap();
        let alpha = [0.0, 0.0];
        let f = [-1.0, 1.0];
        let model =
            extract_model(&x2(), &setup, &alpha, &f, Task::Classification, summary()).unwrap();
        assert_eq!(model.n_support, 0);
        assert!(model.dual_coefs.is_empty());
        assert_eq!(model.support_rows.n_rows(), 0);
    }
}
