//! Service layer module

pub mod predictor;
pub mod types;

pub use predictor::Predictor;
pub use types::*;
