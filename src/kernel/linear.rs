//! Linear kernel: K(x, y) = x . y

use crate::kernel::Kernel;
use crate::matrix::{dot, RowView};

/// Linear kernel (plain dot product)
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn eval(&self, x: &RowView<'_>, y: &RowView<'_>) -> f64 {
        dot(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_kernel() {
        let k = LinearKernel::new();
        let x = RowView::Dense(&[1.0, 2.0, 3.0]);
        let y = RowView::Dense(&[4.0, 5.0, 6.0]);
        assert_eq!(k.eval(&x, &y), 32.0);
        assert!(!k.uses_norms());
    }
}
