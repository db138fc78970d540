//! In-memory Tabular Data
//!
//! `Dataset` is a thin wrapper over a polars `DataFrame` that reports
//! schema problems with the crate's own error taxonomy. Null cells and
//! floating-point NaN are both treated as missing values.

use crate::error::{FeatureError, Result};
use polars::prelude::*;

/// Whether a dtype holds plain integers or floats
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Values of a numerical column as `f64`, with NaN turned into null.
///
/// Non-numeric columns are accepted only when every observed cell parses
/// as a number; otherwise the first offending cell is reported as
/// `NonNumeric`.
pub(crate) fn float_values(column: &str, series: &Series) -> Result<Float64Chunked> {
    let dtype = series.dtype();
    if !is_numeric_dtype(dtype) && !matches!(dtype, DataType::Null) {
        let text = series.cast(&DataType::String)?;
        let first = text
            .str()?
            .into_iter()
            .enumerate()
            .find_map(|(row, cell)| match cell {
                Some(s) if s.trim().parse::<f64>().is_err() => Some((row, s.to_string())),
                _ => None,
            });
        if let Some((row, found)) = first {
            return Err(FeatureError::NonNumeric {
                column: column.to_string(),
                row,
                found,
            });
        }
    }

    let cast = series.cast(&DataType::Float64)?;
    let values: Float64Chunked = cast
        .f64()?
        .into_iter()
        .map(|cell| cell.filter(|v| !v.is_nan()))
        .collect();
    Ok(values.with_name(series.name().clone()))
}

/// A loaded table
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl From<DataFrame> for Dataset {
    fn from(frame: DataFrame) -> Self {
        Self { frame }
    }
}

impl Dataset {
    /// Underlying dataframe
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Take ownership of the underlying dataframe
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    /// Look up a column
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.frame
            .column(name)
            .ok()
            .map(Column::as_materialized_series)
    }

    /// Look up a column, failing with a schema error naming `dataset`
    pub fn require(&self, name: &str, dataset: &'static str) -> Result<&Series> {
        self.column(name).ok_or_else(|| FeatureError::Schema {
            column: name.to_string(),
            dataset,
        })
    }

    /// Numeric values of a column, missing cells as `None`
    pub fn float_column(&self, name: &str, dataset: &'static str) -> Result<Float64Chunked> {
        float_values(name, self.require(name, dataset)?)
    }

    /// New dataset holding only `names`, in the given order
    pub fn select(&self, names: &[String], dataset: &'static str) -> Result<Self> {
        for name in names {
            self.require(name, dataset)?;
        }
        let frame = self.frame.select(names.iter().map(String::as_str))?;
        Ok(Self { frame })
    }

    /// New dataset with `keep[i] == false` rows removed
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.n_rows() {
            return Err(FeatureError::Malformed(format!(
                "row mask has {} entries for {} rows",
                keep.len(),
                self.n_rows()
            )));
        }
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        Ok(Self {
            frame: self.frame.filter(&mask)?,
        })
    }

    /// Copy of this dataset with `series` added or replacing its namesake
    pub(crate) fn with_series(&self, series: Series) -> Result<Self> {
        let mut frame = self.frame.clone();
        frame.with_column(series)?;
        Ok(Self { frame })
    }

    /// Integer identifiers from `name`, as used in submission files
    pub fn ids(&self, name: &str) -> Result<Vec<i64>> {
        self.float_column(name, "input")?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Some(n) if n.fract() == 0.0 => Ok(n as i64),
                other => Err(FeatureError::NonNumeric {
                    column: name.to_string(),
                    row,
                    found: other.map(|n| n.to_string()).unwrap_or_default(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_values_treat_nan_as_missing() {
        let series = Series::new("Age".into(), [Some(22.0), Some(f64::NAN), None]);
        let values = float_values("Age", &series).unwrap();
        assert_eq!(values.null_count(), 2);
        assert_eq!(values.get(0), Some(22.0));
        assert_eq!(values.name().as_str(), "Age");
    }

    #[test]
    fn test_float_values_cast_integers() {
        let series = Series::new("Pclass".into(), [3i64, 1]);
        let values = float_values("Pclass", &series).unwrap();
        assert_eq!(values.get(1), Some(1.0));
    }

    #[test]
    fn test_float_values_reject_text() {
        let series = Series::new("Age".into(), [None, Some("n/a")]);
        let err = float_values("Age", &series).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::NonNumeric { row: 1, ref found, .. } if found == "n/a"
        ));
    }

    #[test]
    fn test_float_values_all_missing_text_column() {
        let series = Series::new("Age".into(), [None::<&str>, None]);
        let values = float_values("Age", &series).unwrap();
        assert_eq!(values.null_count(), 2);
    }

    #[test]
    fn test_select_orders_columns() {
        let ds = Dataset::from(df!("a" => [1.0], "b" => ["x"], "c" => [None::<f64>]).unwrap());
        let picked = ds.select(&["c".to_string(), "a".to_string()], "train").unwrap();
        assert_eq!(picked.column_names(), vec!["c", "a"]);
        assert_eq!(picked.n_rows(), 1);

        let err = ds.select(&["z".to_string()], "train").unwrap_err();
        assert!(matches!(err, FeatureError::Schema { dataset: "train", .. }));
    }

    #[test]
    fn test_filter_rows() {
        let ds = Dataset::from(df!("a" => [1.0, 2.0, 3.0]).unwrap());
        let kept = ds.filter_rows(&[true, false, true]).unwrap();
        assert_eq!(kept.n_rows(), 2);
        let values = kept.float_column("a", "train").unwrap();
        assert_eq!(values.get(1), Some(3.0));

        assert!(matches!(
            ds.filter_rows(&[true]),
            Err(FeatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_with_series_replaces_copy() {
        let ds = Dataset::from(df!("a" => [1.0, 2.0]).unwrap());
        let replaced = ds.with_series(Series::new("a".into(), [5.0, 6.0])).unwrap();
        assert_eq!(replaced.float_column("a", "train").unwrap().get(0), Some(5.0));
        assert_eq!(ds.float_column("a", "train").unwrap().get(0), Some(1.0));
    }

    #[test]
    fn test_ids() {
        let ds = Dataset::from(df!("id" => [10i64, 11]).unwrap());
        assert_eq!(ds.ids("id").unwrap(), vec![10, 11]);

        let bad = Dataset::from(df!("id" => [Some(1.5), None]).unwrap());
        assert!(bad.ids("id").is_err());
    }
}
