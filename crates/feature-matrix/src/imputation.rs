//! Median Imputation

use crate::error::Result;
use crate::statistics::ColumnStatistics;
use crate::table::{float_values, Dataset};
use polars::prelude::*;
use tracing::debug;

/// Fill values learned from a reference table
#[derive(Debug, Clone, PartialEq)]
pub struct MedianImputer {
    /// (column, median) pairs in fit order
    medians: Vec<(String, f64)>,
}

impl MedianImputer {
    /// Learn the median of each column from `reference`
    pub fn fit(reference: &Dataset, columns: &[String], dataset: &'static str) -> Result<Self> {
        let mut medians = Vec::with_capacity(columns.len());
        for column in columns {
            let series = reference.require(column, dataset)?;
            let stats = ColumnStatistics::compute(column, series)?;
            let median = stats.require_median(column)?;
            debug!(
                "Fitted median for '{}': {} ({} observed, {} missing)",
                column, median, stats.count, stats.missing
            );
            medians.push((column.clone(), median));
        }
        Ok(Self { medians })
    }

    /// Learned median for a column
    pub fn median(&self, column: &str) -> Option<f64> {
        self.medians
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, m)| *m)
    }

    /// Copy of `data` with missing cells in fitted columns replaced.
    ///
    /// Fitted columns come back as `Float64`, NaN cells filled like nulls.
    pub fn transform(&self, data: &Dataset, dataset: &'static str) -> Result<Dataset> {
        let mut out = data.clone();
        for (column, median) in &self.medians {
            let values = float_values(column, data.require(column, dataset)?)?;
            let filled = values.null_count();
            if filled > 0 {
                debug!("Imputed {} cells of '{}' in {} with {}", filled, column, dataset, median);
            }
            let imputed = values.fill_null_with_values(*median)?;
            out = out.with_series(imputed.into_series())?;
        }
        Ok(out)
    }
}
