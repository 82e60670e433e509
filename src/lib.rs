//! Two-level SMO decomposition solver for support vector machines
//!
//! Trains binary classifiers and epsilon-regressors by decomposing the
//! dual QP into working sets of up to 1024 variables. The kernel matrix
//! is never materialized; per-iteration tiles are recomputed under
//! configurable byte budgets, so memory stays proportional to the
//! training data plus one tile.

pub mod api;
pub mod core;
pub mod kernel;
pub mod matrix;
pub mod model;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{evaluate, EvaluationMetrics, Svc, Svr};
pub use crate::core::{
    Prediction, Result, SolveSummary, SolverConfig, StopReason, SvmError, Task,
};
pub use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RbfKernel, SigmoidKernel};
pub use crate::matrix::{CsrMatrix, DenseMatrix, TrainingMatrix};
pub use crate::model::SvmModel;
pub use crate::persistence::SavedModel;
pub use crate::solver::SmoSolver;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
