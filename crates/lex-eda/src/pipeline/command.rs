//! Mutating commands and their results.

use crate::cleaner::{DataCleaner, DateCoercion, MissingResolution};
use crate::config::MissingStrategy;
use crate::error::Result;
use crate::table::TableStore;
use crate::transform::{DataTransformer, EncodingOutcome, ScalerParams};
use serde::{Deserialize, Serialize};

/// One mutating operation on the session table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    ResolveMissing(MissingStrategy),
    RemoveDuplicates,
    CoerceDates,
    EncodeColumn(String),
    ScaleColumns(Vec<String>),
}

impl Command {
    /// Apply the command to a store.
    pub fn apply(&self, store: &mut TableStore) -> Result<StepResult> {
        Ok(match self {
            Command::ResolveMissing(strategy) => {
                StepResult::Missing(DataCleaner::resolve_missing(store, *strategy)?)
            }
            Command::RemoveDuplicates => StepResult::Duplicates {
                removed: DataCleaner::remove_duplicates(store)?,
            },
            Command::CoerceDates => StepResult::Dates(DataCleaner::coerce_dates(store)?),
            Command::EncodeColumn(column) => {
                StepResult::Encoded(DataTransformer::encode_column(store, column)?)
            }
            Command::ScaleColumns(columns) => {
                StepResult::Scaled(DataTransformer::scale_columns(store, columns)?)
            }
        })
    }

    /// Short name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ResolveMissing(_) => "resolve missing values",
            Command::RemoveDuplicates => "remove duplicates",
            Command::CoerceDates => "coerce dates",
            Command::EncodeColumn(_) => "encode column",
            Command::ScaleColumns(_) => "scale columns",
        }
    }
}

/// What one command did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", content = "result", rename_all = "snake_case")]
pub enum StepResult {
    Missing(MissingResolution),
    Duplicates { removed: usize },
    Dates(Option<DateCoercion>),
    Encoded(EncodingOutcome),
    Scaled(Vec<ScalerParams>),
}

impl StepResult {
    /// Human-readable summary for the step log.
    pub fn describe(&self) -> String {
        match self {
            StepResult::Missing(resolution) => {
                if resolution.actions.is_empty() {
                    format!("Missing values: {} (no change)", resolution.strategy)
                } else {
                    format!(
                        "Missing values: {} ({})",
                        resolution.strategy,
                        resolution.actions.join("; ")
                    )
                }
            }
            StepResult::Duplicates { removed } => format!("Removed {} duplicate rows", removed),
            StepResult::Dates(Some(coercion)) => format!(
                "Converted '{}' to datetime ({} unparseable values)",
                coercion.column, coercion.unparseable
            ),
            StepResult::Dates(None) => "No 'Date' column to convert".to_string(),
            StepResult::Encoded(outcome) => format!(
                "Label-encoded '{}' into '{}' ({} codes)",
                outcome.mapping.column,
                outcome.new_column,
                outcome.mapping.len()
            ),
            StepResult::Scaled(params) if params.is_empty() => "No columns scaled".to_string(),
            StepResult::Scaled(params) => format!(
                "Standardized {}",
                params
                    .iter()
                    .map(|p| format!("'{}'", p.column))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
