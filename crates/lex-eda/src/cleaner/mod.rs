//! Data cleaning module for the session table.
//!
//! This module provides the mutating cleaning operations:
//! - Resolving missing values with one of the [`MissingStrategy`] choices
//! - Removing duplicate rows
//! - Coercing the `Date` column to datetimes
//!
//! Each operation works on a copy of the current frame and hands the finished
//! frame to [`TableStore::replace`]. An operation that changes nothing leaves
//! the store (and its version) alone.

mod dates;

pub use dates::{DATE_DTYPE, coerce_series, parse_date};

use crate::config::MissingStrategy;
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::table::{ColumnKind, DATE_COLUMN, TableStore};
use crate::types::MissingReport;
use crate::utils::{first_occurrence_mask, missing_count, missing_mask};
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Result of resolving missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingResolution {
    pub strategy: MissingStrategy,
    /// One entry per column filled or rows dropped.
    pub actions: Vec<String>,
    pub rows_dropped: usize,
    /// Missing counts of the resulting table.
    pub missing: MissingReport,
}

/// Result of coercing the `Date` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCoercion {
    pub column: String,
    /// Values that held something before but are missing after parsing.
    pub unparseable: usize,
}

/// Data cleaner for the mutating cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Resolve missing values with the given strategy.
    ///
    /// `FillMean` and `FillMedian` touch numeric columns only; missing values
    /// in other columns are kept. A numeric column without a single value has
    /// nothing to fill from and is left missing. `DropRows` removes every row
    /// with a missing value in any column.
    pub fn resolve_missing(
        store: &mut TableStore,
        strategy: MissingStrategy,
    ) -> Result<MissingResolution> {
        let table = store.current_snapshot();
        let mut actions = Vec::new();
        let mut rows_dropped = 0;

        let next = match strategy {
            MissingStrategy::DoNothing => None,
            MissingStrategy::FillMean | MissingStrategy::FillMedian => {
                let mut df = table.frame().clone();

                for name in table.columns_of_kind(ColumnKind::Numeric) {
                    let has_missing = table.series(&name).is_some_and(|s| missing_count(s) > 0);
                    if !has_missing {
                        continue;
                    }

                    let filled = if strategy == MissingStrategy::FillMean {
                        StatisticalImputer::apply_numeric_mean(&mut df, &name, &mut actions)
                    } else {
                        StatisticalImputer::apply_numeric_median(&mut df, &name, &mut actions)
                    }
                    .context(format!("Filling '{}'", name))?;

                    if filled.is_none() {
                        debug!("Column '{}' has no values to fill from", name);
                    }
                }

                (!actions.is_empty()).then_some(df)
            }
            MissingStrategy::DropRows => {
                let df = table.frame();
                let mut keep = vec![true; df.height()];
                for col in df.get_columns() {
                    for (k, missing) in keep
                        .iter_mut()
                        .zip(missing_mask(col.as_materialized_series()))
                    {
                        *k &= !missing;
                    }
                }

                rows_dropped = keep.iter().filter(|k| !**k).count();
                if rows_dropped > 0 {
                    actions.push(format!("Dropped {} rows with missing values", rows_dropped));
                    let mask = BooleanChunked::from_slice("keep".into(), &keep);
                    Some(df.filter(&mask)?)
                } else {
                    None
                }
            }
        };

        if let Some(df) = next {
            store.replace_frame(df);
        }

        for action in &actions {
            debug!("{}", action);
        }
        info!("Resolved missing values: {}", strategy);

        Ok(MissingResolution {
            strategy,
            actions,
            rows_dropped,
            missing: MissingReport::from_table(store.current_snapshot()),
        })
    }

    /// Remove rows equal to an earlier row in every column.
    ///
    /// The first occurrence is kept and row order is preserved. Returns the
    /// number of rows removed; running it again removes nothing.
    pub fn remove_duplicates(store: &mut TableStore) -> Result<usize> {
        let df = store.current_snapshot().frame();
        let keep = first_occurrence_mask(df);
        let removed = keep.iter().filter(|k| !**k).count();

        if removed == 0 {
            debug!("No duplicate rows found");
            return Ok(0);
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let deduped = df.filter(&mask)?;
        store.replace_frame(deduped);

        info!("Removed {} duplicate rows", removed);
        Ok(removed)
    }

    /// Parse the column named exactly `Date` to datetimes.
    ///
    /// Returns `None` when the table has no such column. Unparseable values
    /// become missing; this never fails on content.
    pub fn coerce_dates(store: &mut TableStore) -> Result<Option<DateCoercion>> {
        let table = store.current_snapshot();
        let Some(series) = table.series(DATE_COLUMN) else {
            debug!("No '{}' column, skipping date coercion", DATE_COLUMN);
            return Ok(None);
        };

        if series.dtype() == &DATE_DTYPE {
            return Ok(Some(DateCoercion {
                column: DATE_COLUMN.to_string(),
                unparseable: 0,
            }));
        }

        let before = series.len() - missing_count(series);
        let coerced = coerce_series(series).context("Coercing dates")?;
        let unparseable = before.saturating_sub(coerced.len() - coerced.null_count());

        let mut df = table.frame().clone();
        df.replace(DATE_COLUMN, coerced)?;
        store.replace_frame(df);

        info!(
            "Coerced '{}' to datetimes ({} unparseable values)",
            DATE_COLUMN, unparseable
        );

        Ok(Some(DateCoercion {
            column: DATE_COLUMN.to_string(),
            unparseable,
        }))
    }
}
