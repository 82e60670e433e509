//! High-level training interface
//!
//! Builder-style front ends over the decomposition solver, one per task.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qsmo::api::Svc;
//! use qsmo::kernel::RbfKernel;
//! use qsmo::matrix::{DenseMatrix, TrainingMatrix};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let x = TrainingMatrix::Dense(DenseMatrix::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]])?);
//! let y = vec![1.0, -1.0];
//!
//! let model = Svc::with_kernel(RbfKernel::new(0.5))
//!     .with_c(10.0)
//!     .fit(&x, &y)?;
//!
//! let predictions = model.predict(&RbfKernel::new(0.5), &x)?;
//! # Ok(())
//! # }
//! ```

use crate::core::{Prediction, Result, SolverConfig, Task};
use crate::kernel::{Kernel, LinearKernel};
use crate::matrix::TrainingMatrix;
use crate::model::SvmModel;
use crate::solver::SmoSolver;

/// Support vector classifier with builder pattern
pub struct Svc<K: Kernel = LinearKernel> {
    kernel: K,
    config: SolverConfig,
}

impl Svc<LinearKernel> {
    /// Linear classifier with default parameters
    pub fn new() -> Self {
        Self {
            kernel: LinearKernel::new(),
            config: SolverConfig::default(),
        }
    }
}

impl Default for Svc<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> Svc<K> {
    /// Classifier with a custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            config: SolverConfig::default(),
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance on the optimality gap
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set working set size
    pub fn with_working_set_size(mut self, q: usize) -> Self {
        self.config.working_set_size = q;
        self
    }

    /// Set the outer iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_outer_iter = Some(max_iterations);
        self
    }

    /// Replace the whole solver configuration
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit on ±1 labels
    pub fn fit(self, x: &TrainingMatrix, y: &[f64]) -> Result<SvmModel> {
        SmoSolver::new(self.kernel, self.config).fit(x, y, None, Task::Classification)
    }

    /// Fit with per-instance penalty weights
    pub fn fit_weighted(self, x: &TrainingMatrix, y: &[f64], weights: &[f64]) -> Result<SvmModel> {
        SmoSolver::new(self.kernel, self.config).fit(x, y, Some(weights), Task::Classification)
    }
}

/// Epsilon support vector regressor with builder pattern
pub struct Svr<K: Kernel = LinearKernel> {
    kernel: K,
    config: SolverConfig,
}

impl Svr<LinearKernel> {
    /// Linear regressor with default parameters
    pub fn new() -> Self {
        Self {
            kernel: LinearKernel::new(),
            config: SolverConfig::default(),
        }
    }
}

impl Default for Svr<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> Svr<K> {
    /// Regressor with a custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            config: SolverConfig::default(),
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set the epsilon-insensitive margin width
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set convergence tolerance on the optimality gap
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set working set size
    pub fn with_working_set_size(mut self, q: usize) -> Self {
        self.config.working_set_size = q;
        self
    }

    /// Set the outer iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_outer_iter = Some(max_iterations);
        self
    }

    /// Replace the whole solver configuration
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit on real-valued targets
    pub fn fit(self, x: &TrainingMatrix, z: &[f64]) -> Result<SvmModel> {
        SmoSolver::new(self.kernel, self.config).fit(x, z, None, Task::Regression)
    }

    /// Fit with per-instance penalty weights
    pub fn fit_weighted(self, x: &TrainingMatrix, z: &[f64], weights: &[f64]) -> Result<SvmModel> {
        SmoSolver::new(self.kernel, self.config).fit(x, z, Some(weights), Task::Regression)
    }
}

/// Accuracy of label predictions against reference labels
pub fn evaluate(predictions: &[Prediction], labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(pred, &actual)| pred.label == actual)
        .count();
    correct as f64 / labels.len() as f64
}

/// Confusion-matrix counts for binary predictions
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    /// Tally predictions against reference labels
    pub fn from_predictions(predictions: &[Prediction], labels: &[f64]) -> Self {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        for (pred, &actual) in predictions.iter().zip(labels.iter()) {
            match (pred.label > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Harmonic mean of precision and recall
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }
}
