//! Feature Layout

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Columns used as model features, plus the outcome column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSpec {
    /// Columns expanded into indicator columns
    pub categorical: Vec<String>,
    /// Columns kept as numbers after median imputation
    pub numerical: Vec<String>,
    /// Target column, present only in the training table
    pub outcome: String,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self::titanic()
    }
}

impl FeatureSpec {
    /// Create a spec from column names
    pub fn new<S: Into<String>>(
        categorical: impl IntoIterator<Item = S>,
        numerical: impl IntoIterator<Item = S>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            categorical: categorical.into_iter().map(Into::into).collect(),
            numerical: numerical.into_iter().map(Into::into).collect(),
            outcome: outcome.into(),
        }
    }

    /// Standard Titanic passenger layout
    pub fn titanic() -> Self {
        Self::new(
            ["Pclass", "SibSp", "Parch", "Sex", "Embarked"],
            ["Fare", "Age"],
            "Survived",
        )
    }

    /// All feature columns, categorical first
    pub fn feature_columns(&self) -> Vec<String> {
        self.categorical
            .iter()
            .chain(self.numerical.iter())
            .cloned()
            .collect()
    }

    /// Reject duplicated names and an outcome that doubles as a feature
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.categorical.iter().chain(self.numerical.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(FeatureError::InvalidSpec(format!(
                    "column '{}' is listed more than once",
                    name
                )));
            }
        }
        if seen.contains(self.outcome.as_str()) {
            return Err(FeatureError::InvalidSpec(format!(
                "outcome '{}' is also a feature",
                self.outcome
            )));
        }
        Ok(())
    }
}
