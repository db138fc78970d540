//! CSV Table Loading

use crate::error::{FeatureError, Result};
use crate::table::Dataset;
use polars::prelude::*;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use tracing::info;

/// Load a headed CSV file into a dataset
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = read_csv(file)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        dataset.n_rows(),
        dataset.column_names().len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse headed CSV from any reader.
///
/// Column types are inferred from every row. Empty fields become nulls.
pub fn read_csv<R: io::Read>(mut reader: R) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    if frame.get_column_names().iter().any(|name| name.is_empty()) {
        return Err(FeatureError::Malformed("empty column name in header".into()));
    }
    Ok(Dataset::from(frame))
}
