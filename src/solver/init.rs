//! Problem setup for classification and regression
//!
//! Builds the label, gradient and penalty vectors the decomposition loop
//! works on. Classification keeps the instance count; epsilon-SVR expands
//! every instance into a ±1-labeled pair, folding the real targets into
//! the initial gradient.

use crate::core::{Result, SolverConfig, SvmError, Task};
use crate::matrix::TrainingMatrix;

/// Dual problem state vectors, sized to `n_train`
#[derive(Debug)]
pub struct ProblemSetup {
    /// Internal ±1 labels (duplicated for regression)
    pub y: Vec<f64>,
    /// Initial gradient / optimality indicator
    pub f: Vec<f64>,
    /// Per-instance penalty bounds C * weight
    pub c_vec: Vec<f64>,
    /// Number of dual variables (n_rows, or 2 * n_rows for regression)
    pub n_train: usize,
    /// Distinct label values seen in the input (classification only)
    pub classes: Option<Vec<f64>>,
}

/// Validate fit inputs before any solver allocation happens
pub fn validate_inputs(
    x: &TrainingMatrix,
    targets: &[f64],
    weights: Option<&[f64]>,
    config: &SolverConfig,
) -> Result<()> {
    if x.n_rows() == 0 || x.n_cols() == 0 {
        return Err(SvmError::InvalidInput(format!(
            "training matrix must have positive dimensions, got {}x{}",
            x.n_rows(),
            x.n_cols()
        )));
    }
    if targets.len() != x.n_rows() {
        return Err(SvmError::DimensionMismatch {
            expected: x.n_rows(),
            actual: targets.len(),
        });
    }
    if let Some(w) = weights {
        if w.len() != x.n_rows() {
            return Err(SvmError::DimensionMismatch {
                expected: x.n_rows(),
                actual: w.len(),
            });
        }
        if w.iter().any(|&wi| !wi.is_finite() || wi <= 0.0) {
            return Err(SvmError::InvalidInput(
                "sample weights must be positive and finite".to_string(),
            ));
        }
    }
    if !(config.c > 0.0) {
        return Err(SvmError::InvalidInput(format!(
            "penalty C must be positive, got {}",
            config.c
        )));
    }
    if !(config.tol > 0.0) {
        return Err(SvmError::InvalidInput(format!(
            "tolerance must be positive, got {}",
            config.tol
        )));
    }
    Ok(())
}

/// Prepare state for the requested task
pub fn setup_problem(
    targets: &[f64],
    weights: Option<&[f64]>,
    config: &SolverConfig,
    task: Task,
) -> Result<ProblemSetup> {
    match task {
        Task::Classification => setup_classification(targets, weights, config),
        Task::Regression => setup_regression(targets, weights, config),
    }
}

fn setup_classification(
    y: &[f64],
    weights: Option<&[f64]>,
    config: &SolverConfig,
) -> Result<ProblemSetup> {
    let mut classes: Vec<f64> = Vec::with_capacity(2);
    for &yi in y {
        if !classes.contains(&yi) {
            classes.push(yi);
        }
    }
    if classes.len() > 2 {
        return Err(SvmError::UnsupportedConfiguration(format!(
            "{} classes requested; only binary problems are solved here, layer one-vs-rest on top",
            classes.len()
        )));
    }
    if classes.iter().any(|&v| v != 1.0 && v != -1.0) {
        return Err(SvmError::InvalidInput(
            "classification labels must be remapped to -1/+1 before fitting".to_string(),
        ));
    }
    classes.sort_by(|a, b| a.total_cmp(b));

    let n = y.len();
    let f = y.iter().map(|&yi| -yi).collect();
    let c_vec = (0..n)
        .map(|i| config.c * weights.map_or(1.0, |w| w[i]))
        .collect();
    Ok(ProblemSetup {
        y: y.to_vec(),
        f,
        c_vec,
        n_train: n,
        classes: Some(classes),
    })
}

fn setup_regression(
    z: &[f64],
    weights: Option<&[f64]>,
    config: &SolverConfig,
) -> Result<ProblemSetup> {
    if !(config.epsilon >= 0.0) {
        return Err(SvmError::InvalidInput(format!(
            "epsilon must be non-negative, got {}",
            config.epsilon
        )));
    }
    let n = z.len();
    let mut y = vec![1.0; 2 * n];
    let mut f = vec![0.0; 2 * n];
    let mut c_vec = vec![0.0; 2 * n];
    for i in 0..n {
        y[n + i] = -1.0;
        f[i] = config.epsilon - z[i];
        f[n + i] = -config.epsilon - z[i];
        let ci = config.c * weights.map_or(1.0, |w| w[i]);
        c_vec[i] = ci;
        c_vec[n + i] = ci;
    }
    Ok(ProblemSetup {
        y,
        f,
        c_vec,
        n_train: 2 * n,
        classes: None,
    })
}
