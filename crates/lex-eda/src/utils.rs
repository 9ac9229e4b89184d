//! Shared utilities for the profiling and preprocessing engine.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for preprocessing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Tokens read as missing at ingestion, in addition to empty fields.
///
/// This is the marker set of the pandas CSV reader, so tables exported by
/// pandas-based tools load with the same missing cells.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Literal a missing value becomes when a column is coerced to text.
pub const MISSING_TEXT: &str = "nan";

/// Check if a raw field is read as missing.
pub fn is_missing_marker(s: &str) -> bool {
    s.is_empty() || MISSING_MARKERS.contains(&s)
}

// =============================================================================
// Series Extraction Utilities
// =============================================================================

/// Values of a numeric Series as `f64`, keeping positions (`None` = missing).
///
/// NaN is treated as missing. Returns `None` if the Series cannot be cast.
pub fn series_to_f64(series: &Series) -> Option<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64).ok()?;
    let values = casted
        .f64()
        .ok()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Some(values)
}

/// Non-missing values of a numeric Series as `f64`.
pub fn non_missing_f64(series: &Series) -> Vec<f64> {
    series_to_f64(series)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect()
}

/// Values of a Series rendered as text, keeping positions (`None` = missing).
pub fn series_to_text(series: &Series) -> Option<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String).ok()?;
    let values = casted
        .str()
        .ok()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Some(values)
}

/// Positions of missing values in a Series (nulls, plus NaN in float columns).
pub fn missing_mask(series: &Series) -> Vec<bool> {
    if series.dtype().is_float()
        && let Some(values) = series_to_f64(series)
    {
        return values.iter().map(Option::is_none).collect();
    }

    let nulls = series.is_null();
    nulls.into_iter().map(|v| v.unwrap_or(false)).collect()
}

/// Count missing values in a Series (nulls, plus NaN in float columns).
pub fn missing_count(series: &Series) -> usize {
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => missing_mask(series).iter().filter(|m| **m).count(),
        _ => series.null_count(),
    }
}

/// Sort a slice of floats in place (total order, NaN last).
pub fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

// =============================================================================
// Row Utilities
// =============================================================================

/// Mark the first occurrence of every distinct row.
///
/// Two rows are equal when every column holds the same value; two missing
/// cells compare equal. The returned mask is `true` for rows to keep.
pub fn first_occurrence_mask(df: &DataFrame) -> Vec<bool> {
    let height = df.height();
    let mut keys: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(df.width()); height];

    for col in df.get_columns() {
        let values = series_to_text(col.as_materialized_series())
            .unwrap_or_else(|| vec![None; height]);
        for (key, value) in keys.iter_mut().zip(values) {
            key.push(value);
        }
    }

    let mut seen = HashSet::with_capacity(height);
    keys.into_iter().map(|key| seen.insert(key)).collect()
}

/// Number of rows equal to an earlier row in every column.
pub fn duplicate_row_count(df: &DataFrame) -> usize {
    first_occurrence_mask(df).iter().filter(|keep| !**keep).count()
}

// =============================================================================
// Tests
// =============================================================================
