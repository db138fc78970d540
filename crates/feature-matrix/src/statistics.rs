//! Column Statistics Computation

use crate::error::{FeatureError, Result};
use crate::table::float_values;
use polars::prelude::*;

/// Summary of the observed values of a numerical column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStatistics {
    /// Number of non-missing values
    pub count: usize,
    /// Number of missing cells, NaN included
    pub missing: usize,
    /// Mean value
    pub mean: f64,
    /// Median value; even counts average the two middle values
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics over the non-missing cells of a column.
    ///
    /// Text cells are rejected; an all-missing column yields `count == 0`
    /// with zeroed statistics.
    pub fn compute(column: &str, series: &Series) -> Result<Self> {
        let values = float_values(column, series)?;
        let missing = values.null_count();
        let count = values.len() - missing;

        if count == 0 {
            return Ok(Self {
                missing,
                ..Self::default()
            });
        }

        Ok(Self {
            count,
            missing,
            mean: values.mean().unwrap_or_default(),
            median: values.median().unwrap_or_default(),
            min: values.min().unwrap_or_default(),
            max: values.max().unwrap_or_default(),
        })
    }

    /// Median of the column, failing when there is nothing to take it from
    pub fn require_median(&self, column: &str) -> Result<f64> {
        if self.count == 0 {
            Err(FeatureError::EmptyColumn(column.to_string()))
        } else {
            Ok(self.median)
        }
    }
}
