//! Regression losses used for critic training.

pub mod functions;

pub use functions::{Loss, MeanSquaredError};
