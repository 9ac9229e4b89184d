//! Statistical imputation methods.
//!
//! Provides mean and median imputation for numeric columns.

use crate::error::{EdaError, Result};
use crate::profiler::statistics;
use crate::utils::{non_missing_f64, series_to_f64};
use polars::prelude::*;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the missing values of a numeric column with its mean.
    ///
    /// Returns the fill value, or `None` when the column had nothing to fill
    /// or no value to compute a mean from.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<f64>> {
        Self::apply_with(df, col_name, processing_steps, "mean", statistics::mean)
    }

    /// Fill the missing values of a numeric column with its median.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<f64>> {
        Self::apply_with(df, col_name, processing_steps, "median", statistics::median)
    }

    fn apply_with(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
        method: &str,
        statistic: fn(&[f64]) -> Option<f64>,
    ) -> Result<Option<f64>> {
        let series = df
            .column(col_name)
            .map_err(|_| EdaError::invalid_column(col_name, "column not found in table"))?
            .as_materialized_series()
            .clone();

        let Some(fill_value) = statistic(&non_missing_f64(&series)) else {
            return Ok(None);
        };

        let filled = Self::fill_with_value(&series, fill_value)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with {}: {:.4}",
            col_name, method, fill_value
        ));

        Ok(Some(fill_value))
    }

    /// Replace every missing position (null or NaN) with `fill_value`.
    ///
    /// The result is always a Float64 column.
    fn fill_with_value(series: &Series, fill_value: f64) -> Result<Series> {
        let values = series_to_f64(series).ok_or_else(|| {
            EdaError::invalid_column(series.name().as_str(), "column is not numeric")
        })?;

        let filled: Vec<f64> = values
            .into_iter()
            .map(|v| v.unwrap_or(fill_value))
            .collect();

        Ok(Series::new(series.name().clone(), filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_imputation() {
        let mut df = df!["x" => [Some(1.0), None, Some(3.0)]].unwrap();
        let mut steps = Vec::new();

        let value = StatisticalImputer::apply_numeric_mean(&mut df, "x", &mut steps).unwrap();

        assert_eq!(value, Some(2.0));
        let col = df.column("x").unwrap();
        assert_eq!(col.null_count(), 0);
        assert_eq!(col.f64().unwrap().get(1), Some(2.0));
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_median_imputation_integer_column() {
        let mut df = df!["n" => [Some(1i64), Some(2), Some(10), None]].unwrap();
        let mut steps = Vec::new();

        let value = StatisticalImputer::apply_numeric_median(&mut df, "n", &mut steps).unwrap();

        assert_eq!(value, Some(2.0));
        let col = df.column("n").unwrap();
        assert_eq!(col.dtype(), &DataType::Float64);
        assert_eq!(col.f64().unwrap().get(3), Some(2.0));
        assert_eq!(col.f64().unwrap().get(2), Some(10.0));
    }

    #[test]
    fn test_nan_is_filled() {
        let mut df = df!["x" => [1.0, f64::NAN, 5.0]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_numeric_mean(&mut df, "x", &mut steps).unwrap();
        assert_eq!(df.column("x").unwrap().f64().unwrap().get(1), Some(3.0));
    }

    #[test]
    fn test_no_values_leaves_column() {
        let mut df = df!["x" => [None::<f64>, None]].unwrap();
        let mut steps = Vec::new();

        let value = StatisticalImputer::apply_numeric_mean(&mut df, "x", &mut steps).unwrap();

        assert_eq!(value, None);
        assert_eq!(df.column("x").unwrap().null_count(), 2);
        assert!(steps.is_empty());
    }
}
