//! Kernel trait definition

use crate::matrix::RowView;

/// Gram-matrix kernel function
///
/// A kernel K(x, y) must satisfy Mercer's condition to be valid for SVM
/// training. The tile provider calls `eval_with_norms` whenever
/// `uses_norms` reports true, passing squared L2 norms that were
/// precomputed once per fit call.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn eval(&self, x: &RowView<'_>, y: &RowView<'_>) -> f64;

    /// Compute kernel value using precomputed squared norms.
    /// More efficient for distance-based kernels (RBF).
    fn eval_with_norms(
        &self,
        x: &RowView<'_>,
        y: &RowView<'_>,
        x_norm_sq: f64,
        y_norm_sq: f64,
    ) -> f64 {
        let _ = (x_norm_sq, y_norm_sq);
        self.eval(x, y)
    }

    /// Whether the kernel benefits from precomputed row norms
    fn uses_norms(&self) -> bool {
        false
    }
}
