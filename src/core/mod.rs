//! Core types, errors and configuration

pub mod error;
pub mod types;

pub use error::{Result, SvmError};
pub use types::{
    Prediction, SolveSummary, SolverConfig, StopReason, Task, DEFAULT_BYTE_BUDGET,
};
