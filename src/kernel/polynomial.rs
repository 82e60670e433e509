//! Polynomial kernel: K(x, y) = (gamma * x . y + coef0)^degree

use crate::kernel::Kernel;
use crate::matrix::{dot, RowView};

/// Polynomial kernel
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    gamma: f64,
    coef0: f64,
    degree: u32,
}

impl PolynomialKernel {
    /// Create a polynomial kernel
    ///
    /// # Panics
    /// Panics if gamma is not positive or degree is zero
    pub fn new(gamma: f64, coef0: f64, degree: u32) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        assert!(degree > 0, "Degree must be positive");
        Self {
            gamma,
            coef0,
            degree,
        }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn coef0(&self) -> f64 {
        self.coef0
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }
}

impl Kernel for PolynomialKernel {
    fn eval(&self, x: &RowView<'_>, y: &RowView<'_>) -> f64 {
        (self.gamma * dot(x, y) + self.coef0).powi(self.degree as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_kernel() {
        let k = PolynomialKernel::new(0.5, 1.0, 2);
        let x = RowView::Dense(&[2.0, 0.0]);
        let y = RowView::Dense(&[1.0, 1.0]);
        // (0.5 * 2 + 1)^2 = 4
        assert_relative_eq!(k.eval(&x, &y), 4.0, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_polynomial_kernel_invalid_gamma() {
        PolynomialKernel::new(0.0, 0.0, 3);
    }

    #[test]
    #[should_panic(expected = "Degree must be positive")]
    fn test_polynomial_kernel_zero_degree() {
        PolynomialKernel::new(1.0, 0.0, 0);
    }
}
