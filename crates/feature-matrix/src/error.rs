//! Feature Preparation Error Types

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading tables or building feature matrices
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Required column absent from an input table
    #[error("Column '{column}' is missing from the {dataset} table")]
    Schema { column: String, dataset: &'static str },

    /// Numerical column has no observed values to derive a statistic from
    #[error("Column '{0}' has no non-missing values; median is undefined")]
    EmptyColumn(String),

    /// Text found where a number is required
    #[error("Column '{column}' row {row}: expected a number, found '{found}'")]
    NonNumeric {
        column: String,
        row: usize,
        found: String,
    },

    /// Outcome cell left empty in the training table
    #[error("Outcome column '{column}' is missing a value at row {row}")]
    MissingTarget { column: String, row: usize },

    /// Feature layout is inconsistent
    #[error("Invalid feature spec: {0}")]
    InvalidSpec(String),

    /// Table shape is inconsistent
    #[error("Malformed table: {0}")]
    Malformed(String),

    /// Dataframe or CSV failure inside polars
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for feature preparation
pub type Result<T> = std::result::Result<T, FeatureError>;
