//! Core type definitions for the SMO solver

use serde::{Deserialize, Serialize};

/// Default byte budget (1 GiB) for transient kernel buffers.
pub const DEFAULT_BYTE_BUDGET: usize = 1 << 30;

/// Training task solved by the decomposition loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Binary classification with labels in {-1, +1}
    Classification,
    /// Epsilon-SVR with real-valued targets
    Regression,
}

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Why the outer decomposition loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Optimality gap dropped below tolerance
    Converged,
    /// Gap unchanged for the configured patience window; best-effort result
    Stalled,
    /// Outer iteration cap reached; best-effort result
    IterationCap,
}

/// Summary of one solve, attached to the returned model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Why the outer loop terminated
    pub stop_reason: StopReason,
    /// Number of outer iterations performed
    pub outer_iterations: usize,
    /// Total inner (block solver) sub-iterations
    pub inner_iterations: usize,
    /// Last observed optimality gap; `None` when no iteration ran.
    /// Kept optional so the summary stays JSON-safe: a non-finite float
    /// would not survive a serde_json round trip.
    pub final_gap: Option<f64>,
}

/// Configuration for the two-level SMO solver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Penalty parameter (upper bound for alpha, scaled by sample weights)
    pub c: f64,
    /// Convergence tolerance on the optimality gap
    pub tol: f64,
    /// Margin width for epsilon-SVR (ignored for classification)
    pub epsilon: f64,
    /// Working set size q; clamped to the number of dual variables
    pub working_set_size: usize,
    /// Outer iteration cap; `None` selects max(100_000, min(n_train * 100, i32::MAX))
    pub max_outer_iter: Option<usize>,
    /// Inner (block solver) sub-iteration cap
    pub max_inner_iter: usize,
    /// Patience window for the stall detector, in outer iterations
    pub nochange_steps: usize,
    /// Byte budget for densifying working-set rows extracted from a sparse matrix
    pub extraction_budget_bytes: usize,
    /// Byte budget for the full-set kernel tile; exceeding it triggers row batching
    pub tile_budget_bytes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 0.001,
            epsilon: 0.1,
            working_set_size: 1024,
            max_outer_iter: None,
            max_inner_iter: 10_000,
            nochange_steps: 1000,
            extraction_budget_bytes: DEFAULT_BYTE_BUDGET,
            tile_budget_bytes: DEFAULT_BYTE_BUDGET,
        }
    }
}
