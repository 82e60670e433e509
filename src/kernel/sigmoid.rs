//! Sigmoid kernel: K(x, y) = tanh(gamma * x . y + coef0)

use crate::kernel::Kernel;
use crate::matrix::{dot, RowView};

/// Sigmoid (hyperbolic tangent) kernel
#[derive(Debug, Clone, Copy)]
pub struct SigmoidKernel {
    gamma: f64,
    coef0: f64,
}

impl SigmoidKernel {
    /// Create a sigmoid kernel
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64, coef0: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma, coef0 }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn coef0(&self) -> f64 {
        self.coef0
    }
}

impl Kernel for SigmoidKernel {
    fn eval(&self, x: &RowView<'_>, y: &RowView<'_>) -> f64 {
        (self.gamma * dot(x, y) + self.coef0).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sigmoid_kernel() {
        let k = SigmoidKernel::new(1.0, 0.0);
        let x = RowView::Dense(&[0.5]);
        let y = RowView::Dense(&[1.0]);
        assert_relative_eq!(k.eval(&x, &y), 0.5_f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn test_sigmoid_bounded() {
        let k = SigmoidKernel::new(10.0, 1.0);
        let x = RowView::Dense(&[100.0]);
        let y = RowView::Dense(&[100.0]);
        assert!(k.eval(&x, &y) <= 1.0);
    }
}
