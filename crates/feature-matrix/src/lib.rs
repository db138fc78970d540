//! Feature Matrix Preparation
//!
//! Turns raw passenger tables into classifier-ready numeric matrices:
//! median imputation, one-hot expansion and train/test column alignment.
//! Tables are polars dataframes; encoded matrices are `ndarray` arrays.

mod builder;
mod encoding;
mod error;
mod imputation;
mod label;
mod loader;
mod matrix;
mod schema;
mod statistics;
mod table;

pub use builder::{build, FeatureMatrices, FeatureMatrixBuilder};
pub use encoding::{label_codes, observed_categories, row_categories, Category, OneHotEncoder};
pub use error::{FeatureError, Result};
pub use imputation::MedianImputer;
pub use label::prepare_label_encoded;
pub use loader::{load_csv, read_csv};
pub use matrix::{align, ColumnKey, EncodedMatrix};
pub use schema::FeatureSpec;
pub use statistics::ColumnStatistics;
pub use table::Dataset;
