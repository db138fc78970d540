//! Encoded Feature Matrices and Column Alignment

use crate::encoding::Category;
use crate::error::{FeatureError, Result};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::io;
use tracing::debug;

/// Identity of an encoded column.
///
/// The derived ordering is the output layout: plain columns first by
/// position, then indicator groups by position with levels in `Category`
/// order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnKey {
    /// Column carried over one-to-one from a source column
    Plain { position: usize, name: String },
    /// Indicator for one level of a categorical column
    Indicator {
        group: usize,
        source: String,
        category: Category,
    },
}

impl ColumnKey {
    /// Key for a carried-over column
    pub fn plain(position: usize, name: &str) -> Self {
        ColumnKey::Plain {
            position,
            name: name.to_string(),
        }
    }

    /// Key for an indicator column
    pub fn indicator(group: usize, source: &str, category: Category) -> Self {
        ColumnKey::Indicator {
            group,
            source: source.to_string(),
            category,
        }
    }

    /// Output column name, `<column>_<level>` for indicators
    pub fn name(&self) -> String {
        match self {
            ColumnKey::Plain { name, .. } => name.clone(),
            ColumnKey::Indicator {
                source, category, ..
            } => format!("{}_{}", source, category),
        }
    }
}

/// Output names of `keys`, rejecting two keys that render the same name
fn unique_names(keys: &[ColumnKey]) -> Result<Vec<String>> {
    let names: Vec<String> = keys.iter().map(ColumnKey::name).collect();
    let mut seen = HashSet::with_capacity(names.len());
    if let Some(name) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(FeatureError::Malformed(format!(
            "more than one encoded column is named '{}'",
            name
        )));
    }
    Ok(names)
}

/// Dense numeric matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMatrix {
    keys: Vec<ColumnKey>,
    names: Vec<String>,
    data: Array2<f64>,
}

impl EncodedMatrix {
    /// Assemble a matrix from one `Float64` series per key.
    ///
    /// Series are renamed after their keys; every output name must be
    /// distinct and every series must have the same length.
    pub fn from_columns(keys: Vec<ColumnKey>, columns: Vec<Series>) -> Result<Self> {
        if keys.len() != columns.len() {
            return Err(FeatureError::Malformed(format!(
                "{} column keys for {} columns",
                keys.len(),
                columns.len()
            )));
        }
        let names = unique_names(&keys)?;
        if let Some(first) = columns.first() {
            if let Some((i, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != first.len()) {
                return Err(FeatureError::Malformed(format!(
                    "column '{}' has {} rows, expected {}",
                    names[i],
                    column.len(),
                    first.len()
                )));
            }
        }

        let columns: Vec<Column> = columns
            .into_iter()
            .zip(&names)
            .map(|(series, name)| series.with_name(name.as_str().into()).into())
            .collect();
        let frame = DataFrame::new(columns)?;
        let data = frame.to_ndarray::<Float64Type>(IndexOrder::C)?;
        Ok(Self { keys, names, data })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// Column names in matrix order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Column keys in matrix order
    pub fn keys(&self) -> &[ColumnKey] {
        &self.keys
    }

    /// Values of a named column
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.data.column(i))
    }

    /// Underlying matrix
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Take ownership of the underlying matrix
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Rebuild this matrix over `layout`, zero-filling columns it lacks
    fn conform(&self, layout: &[ColumnKey], names: &[String]) -> Self {
        let mut data = Array2::zeros((self.n_rows(), layout.len()));
        for (dst, key) in layout.iter().enumerate() {
            if let Some(src) = self.keys.iter().position(|k| k == key) {
                data.column_mut(dst).assign(&self.data.column(src));
            } else {
                debug!("Zero-filling absent column '{}'", names[dst]);
            }
        }
        Self {
            keys: layout.to_vec(),
            names: names.to_vec(),
            data,
        }
    }

    /// The matrix as a dataframe with one `Float64` column per name
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .names
            .iter()
            .zip(self.data.columns())
            .map(|(name, values)| Series::new(name.as_str().into(), values.to_vec()).into())
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    /// Write the matrix as CSV with a header of column names
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut frame = self.to_frame()?;
        CsvWriter::new(writer)
            .include_header(true)
            .finish(&mut frame)?;
        Ok(())
    }
}

/// Give two matrices the union of their columns in one shared order.
///
/// A column present on only one side is added to the other filled with
/// zeros. The resulting order depends only on the column keys, never on
/// which side observed them first. Distinct keys that render the same
/// output name are rejected as `Malformed`.
pub fn align(left: &EncodedMatrix, right: &EncodedMatrix) -> Result<(EncodedMatrix, EncodedMatrix)> {
    let layout: Vec<ColumnKey> = left
        .keys
        .iter()
        .chain(right.keys.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let names = unique_names(&layout)?;

    debug!(
        "Aligning {} + {} columns into {}",
        left.n_cols(),
        right.n_cols(),
        layout.len()
    );

    Ok((left.conform(&layout, &names), right.conform(&layout, &names)))
}
