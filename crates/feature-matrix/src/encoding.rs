//! Categorical Encoding
//!
//! Expands categorical columns into indicator columns and assigns integer
//! label codes. Both encodings share the `Category` ordering so that output
//! layout never depends on row order.

use crate::error::{FeatureError, Result};
use crate::matrix::{ColumnKey, EncodedMatrix};
use crate::schema::FeatureSpec;
use crate::table::{float_values, is_numeric_dtype, Dataset};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Level of a categorical column
#[derive(Debug, Clone)]
pub enum Category {
    /// Numeric level
    Number(f64),
    /// Text level
    Text(String),
    /// Reserved level for empty cells
    Missing,
}

impl Category {
    /// Level for a numeric cell. NaN is missing and `-0.0` is the same
    /// level as `0.0`.
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Category::Missing
        } else if value == 0.0 {
            Category::Number(0.0)
        } else {
            Category::Number(value)
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Category::Number(_) => 0,
            Category::Text(_) => 1,
            Category::Missing => 2,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Category::Number(a), Category::Number(b)) => a.total_cmp(b),
            (Category::Text(a), Category::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Number(n) => write!(f, "{}", n),
            Category::Text(s) => f.write_str(s),
            Category::Missing => f.write_str("missing"),
        }
    }
}

/// Level of every cell of a column, in row order.
///
/// Numeric columns give numeric levels; any other dtype is read as text.
/// Nulls and NaN are `Missing`.
pub fn row_categories(column: &str, series: &Series) -> Result<Vec<Category>> {
    if is_numeric_dtype(series.dtype()) {
        let values = float_values(column, series)?;
        let levels = values
            .into_iter()
            .map(|cell| cell.map_or(Category::Missing, Category::number))
            .collect();
        return Ok(levels);
    }

    let text = series.cast(&DataType::String)?;
    let levels = text
        .str()?
        .into_iter()
        .map(|cell| cell.map_or(Category::Missing, |s| Category::Text(s.to_string())))
        .collect();
    Ok(levels)
}

/// Distinct levels of a column, always including `Missing`
pub fn observed_categories(column: &str, series: &Series) -> Result<BTreeSet<Category>> {
    let mut levels: BTreeSet<Category> = row_categories(column, &series.unique()?)?
        .into_iter()
        .collect();
    levels.insert(Category::Missing);
    Ok(levels)
}

/// One-hot encoder for a single table
pub struct OneHotEncoder<'a> {
    spec: &'a FeatureSpec,
}

impl<'a> OneHotEncoder<'a> {
    /// Create an encoder for a feature layout
    pub fn new(spec: &'a FeatureSpec) -> Self {
        Self { spec }
    }

    /// Encode a projected, imputed table.
    ///
    /// Numerical columns come first in spec order, followed by one indicator
    /// per observed level of each categorical column. Output names that
    /// clash (a text level spelled `missing`, or a numerical column named
    /// like an indicator) are rejected as `Malformed`.
    pub fn encode(&self, data: &Dataset, dataset: &'static str) -> Result<EncodedMatrix> {
        let mut keys = Vec::new();
        let mut columns: Vec<Series> = Vec::new();

        for (position, name) in self.spec.numerical.iter().enumerate() {
            let values = float_values(name, data.require(name, dataset)?)?;
            if values.null_count() > 0 {
                // Imputation runs before encoding, so this is a caller bug.
                return Err(FeatureError::Malformed(format!(
                    "numerical column '{}' still has missing values",
                    name
                )));
            }
            keys.push(ColumnKey::plain(position, name));
            columns.push(values.into_series());
        }

        for (group, name) in self.spec.categorical.iter().enumerate() {
            let series = data.require(name, dataset)?;
            let rows = row_categories(name, series)?;
            for category in observed_categories(name, series)? {
                let indicator: Vec<f64> = rows
                    .iter()
                    .map(|level| if *level == category { 1.0 } else { 0.0 })
                    .collect();
                columns.push(Series::new(name.as_str().into(), indicator));
                keys.push(ColumnKey::indicator(group, name, category));
            }
        }

        EncodedMatrix::from_columns(keys, columns)
    }
}

/// Integer codes for a categorical column, by `Category` order
pub fn label_codes(column: &str, series: &Series) -> Result<Vec<f64>> {
    let rows = row_categories(column, series)?;
    let levels: Vec<Category> = rows
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    Ok(rows
        .iter()
        .map(|category| {
            // Every row's level is in `levels` by construction.
            levels.binary_search(category).unwrap_or_default() as f64
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        let mut levels = vec![
            Category::Missing,
            Category::Text("S".into()),
            Category::number(3.0),
            Category::Text("C".into()),
            Category::number(1.0),
        ];
        levels.sort();
        let names: Vec<String> = levels.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["1", "3", "C", "S", "missing"]);
    }

    #[test]
    fn test_signed_zero_is_one_level() {
        assert_eq!(Category::number(-0.0), Category::number(0.0));
        assert_eq!(Category::number(-0.0).to_string(), "0");
        assert_eq!(Category::number(f64::NAN), Category::Missing);
    }

    #[test]
    fn test_observed_always_has_missing() {
        let series = Series::new("Sex".into(), ["male", "male"]);
        let levels = observed_categories("Sex", &series).unwrap();
        assert!(levels.contains(&Category::Missing));
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn test_encode_indicators() {
        let spec = FeatureSpec::new(["Sex"], ["Age"], "Survived");
        let data = Dataset::from(
            df!(
                "Sex" => [Some("male"), None, Some("female")],
                "Age" => [22.0, 38.0, 26.0]
            )
            .unwrap(),
        );

        let matrix = OneHotEncoder::new(&spec).encode(&data, "train").unwrap();
        assert_eq!(
            matrix.column_names(),
            vec!["Age", "Sex_female", "Sex_male", "Sex_missing"]
        );
        assert_eq!(matrix.column("Sex_male").unwrap().to_vec(), vec![1.0, 0.0, 0.0]);
        assert_eq!(matrix.column("Sex_missing").unwrap().to_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(matrix.column("Age").unwrap().to_vec(), vec![22.0, 38.0, 26.0]);
    }

    #[test]
    fn test_numeric_levels_named_without_fraction() {
        let spec = FeatureSpec::new(["Pclass"], Vec::<&str>::new(), "Survived");
        let data = Dataset::from(df!("Pclass" => [3i64, 1]).unwrap());
        let matrix = OneHotEncoder::new(&spec).encode(&data, "test").unwrap();
        assert_eq!(
            matrix.column_names(),
            vec!["Pclass_1", "Pclass_3", "Pclass_missing"]
        );
    }

    #[test]
    fn test_nan_level_is_missing() {
        let spec = FeatureSpec::new(["Fare"], Vec::<&str>::new(), "Survived");
        let data = Dataset::from(df!("Fare" => [7.25, f64::NAN, 7.25]).unwrap());
        let matrix = OneHotEncoder::new(&spec).encode(&data, "train").unwrap();
        assert_eq!(matrix.column_names(), vec!["Fare_7.25", "Fare_missing"]);
        assert_eq!(matrix.column("Fare_missing").unwrap().to_vec(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_signed_zero_shares_indicator() {
        let spec = FeatureSpec::new(["Parch"], Vec::<&str>::new(), "Survived");
        let data = Dataset::from(df!("Parch" => [0.0, -0.0, 2.0]).unwrap());
        let matrix = OneHotEncoder::new(&spec).encode(&data, "train").unwrap();
        assert_eq!(matrix.column_names(), vec!["Parch_0", "Parch_2", "Parch_missing"]);
        assert_eq!(matrix.column("Parch_0").unwrap().to_vec(), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_text_level_named_missing_rejected() {
        let spec = FeatureSpec::new(["Cabin"], Vec::<&str>::new(), "Survived");
        let data = Dataset::from(df!("Cabin" => ["C85", "missing"]).unwrap());
        let err = OneHotEncoder::new(&spec).encode(&data, "train").unwrap_err();
        assert!(matches!(err, FeatureError::Malformed(ref m) if m.contains("Cabin_missing")));
    }

    #[test]
    fn test_numerical_name_clashing_with_indicator_rejected() {
        let spec = FeatureSpec::new(["Sex"], ["Sex_male"], "Survived");
        let data = Dataset::from(df!("Sex" => ["male", "female"], "Sex_male" => [1.0, 0.0]).unwrap());
        let err = OneHotEncoder::new(&spec).encode(&data, "train").unwrap_err();
        assert!(matches!(err, FeatureError::Malformed(ref m) if m.contains("Sex_male")));
    }

    #[test]
    fn test_label_codes() {
        let series = Series::new("Embarked".into(), [Some("S"), Some("C"), None, Some("S")]);
        assert_eq!(
            label_codes("Embarked", &series).unwrap(),
            vec![1.0, 0.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_label_codes_numeric_nan() {
        let series = Series::new("Pclass".into(), [3.0, f64::NAN, 1.0]);
        assert_eq!(label_codes("Pclass", &series).unwrap(), vec![1.0, 2.0, 0.0]);
    }
}
