//! Data profiling module for table analysis.
//!
//! This module provides the read-only analyses shown for the current
//! snapshot:
//! - Descriptive statistics of numeric columns
//! - IQR outlier counts
//! - Distribution shape (skewness and kurtosis)
//! - Most frequent values of categorical columns
//! - Missing-value and duplicate-row counts
//! - Histograms
//!
//! Every analysis takes a `&Table` and never mutates it, so any number of
//! them may run concurrently over the same snapshot.

mod categories;
mod histogram;
pub mod statistics;

use crate::error::Result;
use crate::table::{ColumnKind, Table};
use crate::types::{
    DescriptiveStatistics, DistributionShape, Histogram, MissingReport,
    NumericSummary, OutlierCount, OutlierReport, ShapeStatistics, TopCategories,
};
use crate::utils::{duplicate_row_count, non_missing_f64, series_to_text, sort_floats};
use tracing::debug;

pub use categories::value_counts;
pub use histogram::build_bins;

/// Data profiler for analyzing a table snapshot.
pub struct DataProfiler;

impl DataProfiler {
    /// Summarize every numeric column.
    ///
    /// A column without any value gets `count = 0` and every other field
    /// `None`.
    pub fn descriptive_statistics(table: &Table) -> DescriptiveStatistics {
        let columns = Self::numeric_samples(table)
            .into_iter()
            .map(|(column, sorted)| NumericSummary {
                column,
                count: sorted.len(),
                mean: statistics::mean(&sorted),
                std: statistics::sample_std(&sorted),
                min: sorted.first().copied(),
                q1: statistics::quantile_sorted(&sorted, 0.25),
                median: statistics::quantile_sorted(&sorted, 0.5),
                q3: statistics::quantile_sorted(&sorted, 0.75),
                max: sorted.last().copied(),
            })
            .collect();

        DescriptiveStatistics {
            table_version: table.version(),
            columns,
        }
    }

    /// Count IQR outliers in every numeric column.
    ///
    /// A value is an outlier when it lies strictly outside
    /// `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`. Columns without any value are
    /// omitted from the report.
    pub fn detect_outliers(table: &Table) -> OutlierReport {
        let mut columns = Vec::new();

        for (column, sorted) in Self::numeric_samples(table) {
            let (Some((lower, upper)), Some(count)) = (
                statistics::iqr_fences(&sorted),
                statistics::count_iqr_outliers(&sorted),
            ) else {
                debug!("Skipping outliers for '{}': no values", column);
                continue;
            };

            columns.push(OutlierCount {
                column,
                count,
                lower_fence: lower,
                upper_fence: upper,
            });
        }

        OutlierReport {
            table_version: table.version(),
            columns,
        }
    }

    /// Skewness and excess kurtosis of every numeric column.
    pub fn distribution_shape(table: &Table) -> DistributionShape {
        let columns = Self::numeric_samples(table)
            .into_iter()
            .map(|(column, values)| ShapeStatistics {
                skewness: statistics::skewness(&values),
                kurtosis: statistics::kurtosis(&values),
                column,
            })
            .collect();

        DistributionShape {
            table_version: table.version(),
            columns,
        }
    }

    /// The `limit` most frequent values of a categorical column.
    ///
    /// Fails with `InvalidColumn` if the column is absent or not categorical.
    pub fn top_categories(table: &Table, column: &str, limit: usize) -> Result<TopCategories> {
        let series = table.require_kind(column, ColumnKind::Categorical)?;
        let values = series_to_text(series).unwrap_or_default();

        let mut counts = value_counts(&values);
        counts.truncate(limit);

        Ok(TopCategories {
            table_version: table.version(),
            column: column.to_string(),
            values: counts,
        })
    }

    /// Top values of every categorical column, in table order.
    pub fn all_top_categories(table: &Table, limit: usize) -> Result<Vec<TopCategories>> {
        table
            .columns_of_kind(ColumnKind::Categorical)
            .iter()
            .map(|column| Self::top_categories(table, column, limit))
            .collect()
    }

    /// Missing-value count of every column.
    pub fn missing_counts(table: &Table) -> MissingReport {
        MissingReport::from_table(table)
    }

    /// Number of rows equal to an earlier row in every column.
    pub fn duplicate_rows(table: &Table) -> usize {
        duplicate_row_count(table.frame())
    }

    /// Equal-width histogram of a numeric column.
    ///
    /// Fails with `InvalidColumn` if the column is absent or not numeric.
    pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Histogram> {
        let series = table.require_kind(column, ColumnKind::Numeric)?;
        let mut values = non_missing_f64(series);
        sort_floats(&mut values);

        Ok(Histogram {
            table_version: table.version(),
            column: column.to_string(),
            bins: build_bins(&values, bins),
        })
    }

    /// Sorted non-missing values of every numeric column, in table order.
    fn numeric_samples(table: &Table) -> Vec<(String, Vec<f64>)> {
        table
            .columns_of_kind(ColumnKind::Numeric)
            .into_iter()
            .filter_map(|name| {
                let mut values = non_missing_f64(table.series(&name)?);
                sort_floats(&mut values);
                Some((name, values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VersionedReport;
    use polars::prelude::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    fn sample_table() -> Table {
        Table::new(
            df![
                "x" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(100.0)],
                "empty" => [None::<f64>, None, None, None, None, None],
                "city" => ["Paris", "Rome", "Paris", "Oslo", "Rome", "Paris"],
                "flag" => [true, false, true, true, false, true]
            ]
            .unwrap(),
        )
    }

    // ==================== statistics tests ====================

    #[test]
    fn test_descriptive_statistics_numeric_only() {
        let stats = DataProfiler::descriptive_statistics(&sample_table());

        let names: Vec<&str> = stats.columns.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(names, vec!["x", "empty"]);

        let x = stats.get("x").unwrap();
        assert_eq!(x.count, 6);
        assert!(approx(x.mean, 115.0 / 6.0));
        assert!(approx(x.q1, 2.25));
        assert!(approx(x.median, 3.5));
        assert!(approx(x.q3, 4.75));
        assert_eq!(x.min, Some(1.0));
        assert_eq!(x.max, Some(100.0));
    }

    #[test]
    fn test_descriptive_statistics_empty_column() {
        let stats = DataProfiler::descriptive_statistics(&sample_table());
        let empty = stats.get("empty").unwrap();

        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.std, None);
        assert_eq!(empty.max, None);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let table = Table::new(df!["v" => [7.0]].unwrap());
        let stats = DataProfiler::descriptive_statistics(&table);
        assert_eq!(stats.columns[0].std, None);
        assert_eq!(stats.columns[0].mean, Some(7.0));
    }

    // ==================== outlier tests ====================

    #[test]
    fn test_detect_outliers() {
        let report = DataProfiler::detect_outliers(&sample_table());

        assert_eq!(report.count("x"), Some(1));
        // No values, no entry
        assert_eq!(report.count("empty"), None);
    }

    // ==================== shape tests ====================

    #[test]
    fn test_distribution_shape() {
        let table = Table::new(
            df![
                "sym" => [1.0, 2.0, 3.0, 4.0, 5.0],
                "const" => [2.0, 2.0, 2.0, 2.0, 2.0]
            ]
            .unwrap(),
        );
        let shape = DataProfiler::distribution_shape(&table);

        assert!(approx(shape.get("sym").unwrap().skewness, 0.0));
        assert!(approx(shape.get("sym").unwrap().kurtosis, -1.2));
        assert_eq!(shape.get("const").unwrap().skewness, None);
        assert_eq!(shape.get("const").unwrap().kurtosis, None);
    }

    // ==================== category tests ====================

    #[test]
    fn test_top_categories() {
        let top = DataProfiler::top_categories(&sample_table(), "city", 2).unwrap();

        let pairs: Vec<(&str, usize)> =
            top.values.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Paris", 3), ("Rome", 2)]);
    }

    #[test]
    fn test_top_categories_rejects_numeric_column() {
        let err = DataProfiler::top_categories(&sample_table(), "x", 5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLUMN");

        let err = DataProfiler::top_categories(&sample_table(), "nope", 5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLUMN");
    }

    #[test]
    fn test_all_top_categories_skips_other_kinds() {
        let all = DataProfiler::all_top_categories(&sample_table(), 5).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].column, "city");
    }

    // ==================== missing / duplicate tests ====================

    #[test]
    fn test_missing_counts_every_column() {
        let table = Table::new(
            df![
                "a" => [Some(1.0), None, Some(f64::NAN)],
                "b" => [Some("x"), None, Some("y")]
            ]
            .unwrap(),
        );
        let report = DataProfiler::missing_counts(&table);

        assert_eq!(report.get("a"), Some(2));
        assert_eq!(report.get("b"), Some(1));
        assert_eq!(report.total(), 3);
        assert!(report.is_current(&table));
    }

    #[test]
    fn test_duplicate_rows() {
        let table = Table::new(df!["a" => [1, 2, 1], "b" => ["x", "y", "x"]].unwrap());
        assert_eq!(DataProfiler::duplicate_rows(&table), 1);
    }

    // ==================== histogram tests ====================

    #[test]
    fn test_histogram() {
        let hist = DataProfiler::histogram(&sample_table(), "x", 30).unwrap();
        assert_eq!(hist.bins.len(), 30);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 6);

        let err = DataProfiler::histogram(&sample_table(), "city", 30).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLUMN");
    }

    // ==================== concurrency tests ====================

    #[test]
    fn test_concurrent_reads_agree() {
        let table = sample_table();
        let expected = DataProfiler::descriptive_statistics(&table);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| DataProfiler::descriptive_statistics(&table)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
