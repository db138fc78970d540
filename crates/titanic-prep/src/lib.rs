//! Titanic Feature Preparation Tool
//!
//! Wires CSV loading, matrix building and submission writing together for
//! the command-line binary.

use anyhow::{bail, Context, Result};
use feature_matrix::{load_csv, Dataset, FeatureMatrixBuilder, FeatureSpec};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use submission::{SubmissionConfig, SubmissionWriter};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Tool settings, loaded from an optional TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Feature layout
    pub features: FeatureSpec,
    /// Submission file layout
    pub submission: SubmissionConfig,
}

impl Settings {
    /// Load settings from `path`, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()
            .with_context(|| format!("reading config {}", path.display()))?
            .try_deserialize::<Settings>()
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Files written by [`prepare`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFiles {
    pub train_matrix: PathBuf,
    pub test_matrix: PathBuf,
    pub target: PathBuf,
}

/// Build aligned matrices from train/test CSVs and write them to `out_dir`
pub fn prepare(settings: &Settings, train: &Path, test: &Path, out_dir: &Path) -> Result<PreparedFiles> {
    let train = load_csv(train).with_context(|| format!("loading {}", train.display()))?;
    let test = load_csv(test).with_context(|| format!("loading {}", test.display()))?;

    let matrices = FeatureMatrixBuilder::new(settings.features.clone())
        .build(&train, &test)
        .context("building feature matrices")?;

    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let files = PreparedFiles {
        train_matrix: out_dir.join("train_matrix.csv"),
        test_matrix: out_dir.join("test_matrix.csv"),
        target: out_dir.join("target.csv"),
    };

    matrices.train.write_csv(File::create(&files.train_matrix)?)?;
    matrices.test.write_csv(File::create(&files.test_matrix)?)?;

    let mut target = DataFrame::new(vec![Series::new(
        settings.features.outcome.as_str().into(),
        matrices.target.as_slice(),
    )
    .into()])?;
    CsvWriter::new(File::create(&files.target)?)
        .include_header(true)
        .finish(&mut target)?;

    info!("Wrote matrices and target to {}", out_dir.display());
    Ok(files)
}

/// Write a submission from a test CSV (for ids) and a predictions CSV
pub fn submit(
    settings: &Settings,
    test: &Path,
    predictions: &Path,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let test = load_csv(test).with_context(|| format!("loading {}", test.display()))?;
    let ids = test.ids(&settings.submission.id_column)?;

    let predictions = load_csv(predictions)
        .with_context(|| format!("loading {}", predictions.display()))?;
    let values = prediction_values(&predictions, &settings.submission.prediction_column)?;

    let path = SubmissionWriter::new(settings.submission.clone()).write(&ids, &values, output)?;
    Ok(path)
}

/// Predictions from the column named `column`, or from the only column
fn prediction_values(predictions: &Dataset, column: &str) -> Result<Vec<f64>> {
    let names = predictions.column_names();
    let name = if names.contains(&column) {
        column
    } else if let [only] = names.as_slice() {
        *only
    } else {
        bail!(
            "predictions file needs a '{}' column or exactly one column, found {:?}",
            column,
            names
        );
    };

    predictions
        .float_column(name, "predictions")?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(n) => Ok(n),
            None => bail!("prediction row {} is missing", row),
        })
        .collect()
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
