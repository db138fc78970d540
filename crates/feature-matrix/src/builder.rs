//! Feature Matrix Assembly

use crate::encoding::OneHotEncoder;
use crate::error::{FeatureError, Result};
use crate::imputation::MedianImputer;
use crate::matrix::{align, EncodedMatrix};
use crate::schema::FeatureSpec;
use crate::table::Dataset;
use tracing::{debug, info};

/// Aligned train/test matrices plus the training target
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrices {
    /// Encoded training features
    pub train: EncodedMatrix,
    /// Encoded test features, same columns as `train`
    pub test: EncodedMatrix,
    /// Outcome column of the training table, in row order
    pub target: Vec<f64>,
}

/// Builds classifier-ready matrices from raw train/test tables
pub struct FeatureMatrixBuilder {
    spec: FeatureSpec,
}

impl FeatureMatrixBuilder {
    /// Create a builder for a feature layout
    pub fn new(spec: FeatureSpec) -> Self {
        Self { spec }
    }

    /// Feature layout in use
    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// Impute, project, one-hot encode and align both tables.
    ///
    /// Medians come from `train` only and fill both tables. Inputs are left
    /// untouched.
    pub fn build(&self, train: &Dataset, test: &Dataset) -> Result<FeatureMatrices> {
        self.spec.validate()?;
        let features = self.spec.feature_columns();

        // Schema checks up front so the first missing column is reported
        // before any statistic is computed.
        for column in &features {
            train.require(column, "train")?;
            test.require(column, "test")?;
        }
        let target = extract_target(train, &self.spec.outcome)?;

        let imputer = MedianImputer::fit(train, &self.spec.numerical, "train")?;
        let train = imputer.transform(&train.select(&features, "train")?, "train")?;
        let test = imputer.transform(&test.select(&features, "test")?, "test")?;

        let encoder = OneHotEncoder::new(&self.spec);
        let train_encoded = encoder.encode(&train, "train")?;
        let test_encoded = encoder.encode(&test, "test")?;
        debug!(
            "Encoded train to {} columns, test to {} columns",
            train_encoded.n_cols(),
            test_encoded.n_cols()
        );

        let (train, test) = align(&train_encoded, &test_encoded)?;
        info!(
            "Built feature matrices: train {}x{}, test {}x{}",
            train.n_rows(),
            train.n_cols(),
            test.n_rows(),
            test.n_cols()
        );

        Ok(FeatureMatrices {
            train,
            test,
            target,
        })
    }
}

/// Build aligned matrices for `spec` in one call
pub fn build(train: &Dataset, test: &Dataset, spec: &FeatureSpec) -> Result<FeatureMatrices> {
    FeatureMatrixBuilder::new(spec.clone()).build(train, test)
}

/// Numeric outcome values of the training table
pub(crate) fn extract_target(data: &Dataset, outcome: &str) -> Result<Vec<f64>> {
    data.float_column(outcome, "train")?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.ok_or_else(|| FeatureError::MissingTarget {
                column: outcome.to_string(),
                row,
            })
        })
        .collect()
}
