//! Submission Output
//!
//! Writes two-column prediction files (identifier, predicted class).

mod writer;

pub use writer::{SubmissionConfig, SubmissionWriter};

use thiserror::Error;

/// Submission errors
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{ids} ids but {predictions} predictions")]
    LengthMismatch { ids: usize, predictions: usize },
    #[error("Prediction for id {id} is not finite: {value}")]
    NonFinitePrediction { id: i64, value: f64 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
