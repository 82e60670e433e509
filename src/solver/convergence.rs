//! Stopping rules and divergence diagnostics

use crate::core::{Result, StopReason, SvmError};
use log::warn;

/// Fraction of the tolerance below which two consecutive gaps count as
/// "unchanged" for the stall detector
const STALL_SCALE: f64 = 0.001;

/// Gap growth factor that counts an iteration as diverging
const DIVERGENCE_FACTOR: f64 = 1.5;

/// Iterations to observe before the divergence advisory may fire
const DIVERGENCE_WARMUP: usize = 100;

/// Verdict for one outer iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stop(StopReason),
}

/// Tracks the optimality gap across outer iterations
pub struct ConvergenceMonitor {
    tol: f64,
    nochange_steps: usize,
    cap: usize,
    prev_gap: f64,
    small_change_streak: usize,
    diverging_iterations: usize,
    advisory_emitted: bool,
    iterations: usize,
}

impl ConvergenceMonitor {
    pub fn new(tol: f64, nochange_steps: usize, max_outer_iter: Option<usize>, n_train: usize) -> Self {
        let cap = max_outer_iter
            .unwrap_or_else(|| 100_000.max(n_train.saturating_mul(100).min(i32::MAX as usize)));
        Self {
            tol,
            nochange_steps,
            cap,
            prev_gap: f64::INFINITY,
            small_change_streak: 0,
            diverging_iterations: 0,
            advisory_emitted: false,
            iterations: 0,
        }
    }

    /// Outer iteration cap in effect
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Judge the gap reported for the iteration that just finished.
    /// Rules are checked in order: convergence, stall, NaN.
    pub fn observe(&mut self, gap: f64) -> Result<Verdict> {
        let first = self.iterations == 0;
        self.iterations += 1;

        if gap < self.tol {
            return Ok(Verdict::Stop(StopReason::Converged));
        }

        if (gap - self.prev_gap).abs() < STALL_SCALE * self.tol {
            self.small_change_streak += 1;
            if self.small_change_streak > self.nochange_steps {
                warn!(
                    "optimality gap {:.6e} unchanged for {} iterations; stopping with best-effort result",
                    gap, self.small_change_streak
                );
                return Ok(Verdict::Stop(StopReason::Stalled));
            }
        } else {
            self.small_change_streak = 0;
        }

        if gap.is_nan() {
            return Err(SvmError::NumericalFailure(
                "optimality gap is NaN; check kernel parameters and consider rescaling features"
                    .to_string(),
            ));
        }

        if !first && gap > DIVERGENCE_FACTOR * self.prev_gap {
            self.diverging_iterations += 1;
        }
        if !self.advisory_emitted
            && self.iterations > DIVERGENCE_WARMUP
            && self.diverging_iterations * 10 > self.iterations
        {
            warn!(
                "optimality gap increased in {} of {} iterations; convergence is non-monotonic, \
                 consider scaling features or adjusting kernel parameters",
                self.diverging_iterations, self.iterations
            );
            self.advisory_emitted = true;
        }

        self.prev_gap = gap;
        Ok(Verdict::Continue)
    }
}
