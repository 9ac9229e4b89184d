//! Standardization of numeric columns.

use crate::profiler::statistics;
use crate::utils::{non_missing_f64, series_to_f64};
use polars::prelude::*;
use serde::Serialize;

/// Mean and standard deviation a column was scaled with.
///
/// Both are `None` for a column without any value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalerParams {
    pub column: String,
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub std: Option<f64>,
}

/// Z-score scaler.
pub struct StandardScaler;

impl StandardScaler {
    /// Fit on the non-missing values of a column.
    pub fn fit(series: &Series) -> ScalerParams {
        let values = non_missing_f64(series);
        ScalerParams {
            column: series.name().to_string(),
            mean: statistics::mean(&values),
            std: statistics::population_std(&values),
        }
    }

    /// Apply `(value - mean) / std`, producing a Float64 column.
    ///
    /// Missing values stay missing. A zero standard deviation maps every
    /// value to 0.0.
    pub fn transform(params: &ScalerParams, series: &Series) -> Series {
        let values = series_to_f64(series).unwrap_or_else(|| vec![None; series.len()]);

        let scaled: Vec<Option<f64>> = match (params.mean, params.std) {
            (Some(mean), Some(std)) => values
                .into_iter()
                .map(|v| {
                    v.map(|x| {
                        if std == 0.0 {
                            0.0
                        } else {
                            (x - mean) / std
                        }
                    })
                })
                .collect(),
            _ => vec![None; series.len()],
        };

        Series::new(series.name().clone(), scaled)
    }
}
