//! Two-level SMO decomposition solver
//!
//! The outer loop selects a working set, asks the tile provider for its
//! kernel tile, runs the restricted pairwise solve, propagates the
//! resulting coefficient deltas into the global gradient and lets the
//! convergence monitor judge the optimality gap. The inner level lives
//! in [`block`]; everything it needs is staged per iteration so the
//! full kernel matrix is never materialized.

pub mod block;
pub mod convergence;
pub mod extract;
pub mod gradient;
pub mod init;
pub mod tiles;
pub mod working_set;

pub use block::{solve_block, BlockResult};
pub use convergence::{ConvergenceMonitor, Verdict};
pub use extract::extract_model;
pub use gradient::apply_deltas;
pub use init::{setup_problem, validate_inputs, ProblemSetup};
pub use tiles::KernelMatrixProvider;
pub use working_set::WorkingSetSelector;

use crate::core::{Result, SolveSummary, SolverConfig, StopReason, Task};
use crate::kernel::Kernel;
use crate::matrix::TrainingMatrix;
use crate::model::SvmModel;
use log::{debug, info};

/// Drives the decomposition loop for one fit call
pub struct SmoSolver<K: Kernel> {
    kernel: K,
    config: SolverConfig,
}

impl<K: Kernel> SmoSolver<K> {
    pub fn new(kernel: K, config: SolverConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the dual problem for `targets` over the rows of `x`.
    /// `targets` holds ±1 labels for classification and real values for
    /// regression; optional `weights` scale the per-instance penalty.
    pub fn fit(
        &self,
        x: &TrainingMatrix,
        targets: &[f64],
        weights: Option<&[f64]>,
        task: Task,
    ) -> Result<SvmModel> {
        validate_inputs(x, targets, weights, &self.config)?;
        let setup = setup_problem(targets, weights, &self.config, task)?;
        let n_rows = x.n_rows();
        let n_train = setup.n_train;

        let mut alpha = vec![0.0; n_train];
        let mut f = setup.f.clone();

        let provider = KernelMatrixProvider::new(x, &self.kernel, &self.config);
        let mut selector = WorkingSetSelector::new(self.config.working_set_size, n_train);
        let mut monitor = ConvergenceMonitor::new(
            self.config.tol,
            self.config.nochange_steps,
            self.config.max_outer_iter,
            n_train,
        );

        debug!(
            "starting solve: {} instances, {} dual variables, working set {}",
            n_rows,
            n_train,
            selector.size()
        );

        let mut stop_reason = StopReason::IterationCap;
        let mut outer_iterations = 0;
        let mut inner_iterations = 0;
        let mut final_gap = None;

        for _ in 0..monitor.cap() {
            let ws = selector.select(&f, &alpha, &setup.y, &setup.c_vec);
            // dual indices above n_rows alias the same training row
            let ws_rows: Vec<usize> = ws.iter().map(|&i| i % n_rows).collect();
            let tile = provider.ws_tile(&ws_rows)?;
            let blk = solve_block(
                &ws,
                &tile,
                &mut alpha,
                &f,
                &setup.y,
                &setup.c_vec,
                self.config.tol,
                self.config.max_inner_iter,
            );
            apply_deltas(&provider, &ws, &blk.delta_alpha, &mut f, n_rows)?;

            outer_iterations += 1;
            inner_iterations += blk.inner_iterations;
            final_gap = Some(blk.gap);
            if outer_iterations % 100 == 0 {
                debug!(
                    "outer iteration {}: gap {:.6e}",
                    outer_iterations, blk.gap
                );
            }

            match monitor.observe(blk.gap)? {
                Verdict::Continue => {}
                Verdict::Stop(reason) => {
                    stop_reason = reason;
                    break;
                }
            }
        }

        let summary = SolveSummary {
            stop_reason,
            outer_iterations,
            inner_iterations,
            final_gap,
        };
        info!(
            "solve finished: {:?} after {} outer / {} inner iterations, gap {:?}",
            summary.stop_reason, outer_iterations, inner_iterations, summary.final_gap
        );

        extract_model(x, &setup, &alpha, &f, task, summary)
    }
}
