//! Correlation analysis of numeric columns.

use crate::profiler::statistics::pearson;
use crate::table::{ColumnKind, Table};
use crate::types::{CorrelationMatrix, CorrelationOutcome};
use crate::utils::series_to_f64;
use tracing::debug;

/// Computes the Pearson correlation matrix of a snapshot.
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Pairwise-complete Pearson correlation over every numeric column.
    ///
    /// Each pair uses only the rows where both columns hold a value. With
    /// fewer than two numeric columns the outcome is
    /// [`CorrelationOutcome::Unavailable`]; a 1x1 matrix is never built.
    pub fn correlation_matrix(table: &Table) -> CorrelationOutcome {
        let columns = table.columns_of_kind(ColumnKind::Numeric);
        if columns.len() < 2 {
            debug!(
                "Correlation unavailable: {} numeric column(s)",
                columns.len()
            );
            return CorrelationOutcome::Unavailable;
        }

        let series_values: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|name| {
                table
                    .series(name)
                    .and_then(series_to_f64)
                    .unwrap_or_default()
            })
            .collect();

        let size = columns.len();
        let mut values = vec![vec![None; size]; size];

        for i in 0..size {
            for j in i..size {
                let (x, y): (Vec<f64>, Vec<f64>) = series_values[i]
                    .iter()
                    .zip(series_values[j].iter())
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();

                let r = pearson(&x, &y);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationOutcome::Matrix(CorrelationMatrix {
            table_version: table.version(),
            columns,
            values,
        })
    }
}
