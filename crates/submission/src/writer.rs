//! Submission Writer Implementation

use crate::SubmissionError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Submission file layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Header of the identifier column
    pub id_column: String,
    /// Header of the prediction column
    pub prediction_column: String,
    /// Directory for files written without an explicit path
    pub output_dir: PathBuf,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            id_column: "PassengerId".to_string(),
            prediction_column: "Survived".to_string(),
            output_dir: PathBuf::from("submissions"),
        }
    }
}

/// Writes prediction CSVs with an id column and an integer prediction column
pub struct SubmissionWriter {
    config: SubmissionConfig,
}

impl SubmissionWriter {
    /// Create a writer with the given layout
    pub fn new(config: SubmissionConfig) -> Self {
        Self { config }
    }

    /// Layout in use
    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    /// Write predictions to `path`, or to a timestamped file in the output
    /// directory when no path is given. Returns the path written.
    pub fn write(
        &self,
        ids: &[i64],
        predictions: &[f64],
        path: Option<&Path>,
    ) -> Result<PathBuf, SubmissionError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                fs::create_dir_all(&self.config.output_dir)?;
                self.default_path(Local::now())
            }
        };

        let file = File::create(&path)?;
        self.write_to(file, ids, predictions)?;
        info!("Wrote {} predictions to {}", ids.len(), path.display());
        Ok(path)
    }

    /// Write predictions as CSV to any writer
    pub fn write_to<W: io::Write>(
        &self,
        writer: W,
        ids: &[i64],
        predictions: &[f64],
    ) -> Result<(), SubmissionError> {
        if ids.len() != predictions.len() {
            return Err(SubmissionError::LengthMismatch {
                ids: ids.len(),
                predictions: predictions.len(),
            });
        }
        if let Some((&id, &value)) = ids.iter().zip(predictions).find(|(_, p)| !p.is_finite()) {
            return Err(SubmissionError::NonFinitePrediction { id, value });
        }

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([&self.config.id_column, &self.config.prediction_column])?;
        for (id, prediction) in ids.iter().zip(predictions) {
            // Truncate toward zero, so probabilities must be thresholded first.
            let label = prediction.trunc() as i64;
            wtr.write_record([id.to_string(), label.to_string()])?;
        }
        wtr.flush()?;
        debug!("Serialized {} submission rows", ids.len());
        Ok(())
    }

    /// Timestamped file name: `<output_dir>/<YYYY-MM-DD>t<HH-MM-SS>.csv`
    pub fn default_path(&self, now: DateTime<Local>) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.csv", now.format("%Y-%m-%dt%H-%M-%S")))
    }
}

impl Default for SubmissionWriter {
    fn default() -> Self {
        Self::new(SubmissionConfig::default())
    }
}
