//! Label-encoded Preparation for Tree Models
//!
//! Single-table variant of the matrix builder: rows with missing values in
//! selected columns are dropped, numerical columns are median-imputed from
//! the remaining rows and categorical columns become integer codes.

use crate::builder::extract_target;
use crate::encoding::{label_codes, row_categories, Category};
use crate::error::{FeatureError, Result};
use crate::imputation::MedianImputer;
use crate::matrix::{ColumnKey, EncodedMatrix};
use crate::schema::FeatureSpec;
use crate::table::{float_values, Dataset};
use polars::prelude::*;
use tracing::info;

/// Label-encode `data`, dropping rows missing any column in `drop_missing`.
///
/// Returns the matrix (categorical codes first, then numerical columns)
/// and the outcome values of the kept rows.
pub fn prepare_label_encoded(
    data: &Dataset,
    spec: &FeatureSpec,
    drop_missing: &[String],
) -> Result<(EncodedMatrix, Vec<f64>)> {
    spec.validate()?;
    let features = spec.feature_columns();

    if let Some(column) = drop_missing.iter().find(|c| !features.contains(c)) {
        return Err(FeatureError::Schema {
            column: column.clone(),
            dataset: "feature spec",
        });
    }

    let projected = data.select(&features, "input")?;
    // Validate the outcome before rows are dropped so row numbers in errors
    // refer to the caller's table.
    extract_target(data, &spec.outcome)?;

    let mut keep = vec![true; data.n_rows()];
    for column in drop_missing {
        let levels = row_categories(column, projected.require(column, "input")?)?;
        for (row, level) in levels.iter().enumerate() {
            if *level == Category::Missing {
                keep[row] = false;
            }
        }
    }
    let dropped = keep.iter().filter(|&&k| !k).count();

    let rows = projected.filter_rows(&keep)?;
    let target = extract_target(&data.filter_rows(&keep)?, &spec.outcome)?;

    let imputer = MedianImputer::fit(&rows, &spec.numerical, "input")?;
    let rows = imputer.transform(&rows, "input")?;

    let mut keys = Vec::with_capacity(features.len());
    let mut columns = Vec::with_capacity(features.len());
    for (position, name) in spec.categorical.iter().enumerate() {
        let codes = label_codes(name, rows.require(name, "input")?)?;
        keys.push(ColumnKey::plain(position, name));
        columns.push(Series::new(name.as_str().into(), codes));
    }
    for (offset, name) in spec.numerical.iter().enumerate() {
        let values = float_values(name, rows.require(name, "input")?)?;
        keys.push(ColumnKey::plain(spec.categorical.len() + offset, name));
        columns.push(values.into_series());
    }

    let matrix = EncodedMatrix::from_columns(keys, columns)?;
    info!(
        "Label-encoded {} rows x {} columns ({} rows dropped)",
        matrix.n_rows(),
        matrix.n_cols(),
        dropped
    );
    Ok((matrix, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passengers() -> Dataset {
        Dataset::from(
            df!(
                "Survived" => [0i64, 1, 1, 0],
                "Sex" => ["male", "female", "female", "male"],
                "Embarked" => [Some("S"), Some("C"), None, Some("S")],
                "Age" => [Some(22.0), None, Some(26.0), Some(35.0)],
                "Fare" => [Some(7.25), Some(71.28), Some(7.92), None]
            )
            .unwrap(),
        )
    }

    fn spec() -> FeatureSpec {
        FeatureSpec::new(["Sex", "Embarked"], ["Age", "Fare"], "Survived")
    }

    #[test]
    fn test_label_encoding_layout() {
        let (matrix, target) = prepare_label_encoded(&passengers(), &spec(), &[]).unwrap();
        assert_eq!(matrix.column_names(), &["Sex", "Embarked", "Age", "Fare"]);
        assert_eq!(matrix.column("Sex").unwrap().to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(matrix.column("Embarked").unwrap().to_vec(), vec![1.0, 0.0, 2.0, 1.0]);
        // Median of 22, 26, 35
        assert_eq!(matrix.column("Age").unwrap()[1], 26.0);
        assert_eq!(target, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_drop_missing_rows() {
        let drop = vec!["Embarked".to_string()];
        let (matrix, target) = prepare_label_encoded(&passengers(), &spec(), &drop).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(target, vec![0.0, 1.0, 0.0]);
        assert_eq!(matrix.column("Embarked").unwrap().to_vec(), vec![1.0, 0.0, 1.0]);
        // Fare median over the kept rows: 7.25 and 71.28
        assert!((matrix.column("Fare").unwrap()[2] - 39.265).abs() < 1e-9);
    }

    #[test]
    fn test_drop_rows_with_nan() {
        let data = Dataset::from(
            df!(
                "Survived" => [1.0, 0.0, 1.0],
                "Sex" => ["male", "female", "male"],
                "Embarked" => ["S", "C", "Q"],
                "Age" => [30.0, f64::NAN, 40.0],
                "Fare" => [8.0, 9.0, 10.0]
            )
            .unwrap(),
        );
        let drop = vec!["Age".to_string()];
        let (matrix, target) = prepare_label_encoded(&data, &spec(), &drop).unwrap();
        assert_eq!(target, vec![1.0, 1.0]);
        assert_eq!(matrix.column("Age").unwrap().to_vec(), vec![30.0, 40.0]);
    }

    #[test]
    fn test_drop_column_outside_spec() {
        let drop = vec!["Cabin".to_string()];
        let err = prepare_label_encoded(&passengers(), &spec(), &drop).unwrap_err();
        assert!(matches!(err, FeatureError::Schema { ref column, .. } if column == "Cabin"));
    }
}
