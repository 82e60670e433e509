//! Kernel functions for SVM training

pub mod linear;
pub mod polynomial;
pub mod rbf;
pub mod sigmoid;
pub mod traits;

pub use self::linear::LinearKernel;
pub use self::polynomial::PolynomialKernel;
pub use self::rbf::RbfKernel;
pub use self::sigmoid::SigmoidKernel;
pub use self::traits::Kernel;
