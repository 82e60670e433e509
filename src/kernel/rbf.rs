//! RBF (Radial Basis Function) kernel: K(x, y) = exp(-gamma * ||x - y||^2)

use crate::kernel::Kernel;
use crate::matrix::{dot, norm_sq, RowView};

/// RBF kernel
///
/// The gamma parameter controls the reach of each training example:
/// high gamma means only close points influence each other, low gamma
/// lets distant points interact. A common default is 1 / n_features.
#[derive(Debug, Clone, Copy)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    /// Create an RBF kernel with the given gamma.
    ///
    /// Non-finite gamma values are accepted so that pathological
    /// configurations surface as a `NumericalFailure` during the solve
    /// rather than a panic at construction.
    pub fn new(gamma: f64) -> Self {
        assert!(
            !(gamma <= 0.0),
            "Gamma must be positive, got: {}",
            gamma
        );
        Self { gamma }
    }

    /// RBF kernel with gamma = 1 / n_features
    pub fn with_auto_gamma(n_features: usize) -> Self {
        assert!(n_features > 0, "Number of features must be positive");
        Self::new(1.0 / n_features as f64)
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RbfKernel {
    fn eval(&self, x: &RowView<'_>, y: &RowView<'_>) -> f64 {
        self.eval_with_norms(x, y, norm_sq(x), norm_sq(y))
    }

    fn eval_with_norms(
        &self,
        x: &RowView<'_>,
        y: &RowView<'_>,
        x_norm_sq: f64,
        y_norm_sq: f64,
    ) -> f64 {
        // ||x - y||^2 = ||x||^2 + ||y||^2 - 2 x.y, clamped against
        // cancellation for near-identical rows
        let dist_sq = (x_norm_sq + y_norm_sq - 2.0 * dot(x, y)).max(0.0);
        (-self.gamma * dist_sq).exp()
    }

    fn uses_norms(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rbf_identical_rows() {
        let k = RbfKernel::new(1.0);
        let x = RowView::Dense(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(k.eval(&x, &x), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_with_norms_matches_direct() {
        let k = RbfKernel::new(2.0);
        let x = RowView::Dense(&[3.0, 4.0]);
        let y = RowView::Dense(&[1.0, 2.0]);
        let direct = k.eval(&x, &y);
        let via_norms = k.eval_with_norms(&x, &y, 25.0, 5.0);
        assert_relative_eq!(direct, via_norms, epsilon = 1e-12);
        assert_relative_eq!(direct, (-2.0 * 8.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_decays_with_distance() {
        let k = RbfKernel::new(1.0);
        let x = RowView::Dense(&[0.0]);
        let near = RowView::Dense(&[1.0]);
        let far = RowView::Dense(&[3.0]);
        assert!(k.eval(&x, &near) > k.eval(&x, &far));
    }

    #[test]
    fn test_rbf_nan_gamma_is_accepted() {
        // NaN propagates into the solve where the convergence monitor
        // reports it as a numerical failure
        let k = RbfKernel::new(f64::NAN);
        let x = RowView::Dense(&[0.0]);
        let y = RowView::Dense(&[1.0]);
        assert!(k.eval(&x, &y).is_nan());
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_invalid_gamma() {
        RbfKernel::new(-0.5);
    }
}
