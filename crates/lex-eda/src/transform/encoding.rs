//! Label encoding of categorical columns.

use crate::utils::{MISSING_TEXT, series_to_text};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Suffix of the column holding the codes.
pub const ENCODED_SUFFIX: &str = "_encoded";

/// Name of the code column for a source column.
pub fn encoded_column_name(column: &str) -> String {
    format!("{}{}", column, ENCODED_SUFFIX)
}

/// Codes assigned to the distinct values of one column.
///
/// Values are sorted lexicographically (byte order) and numbered from 0.
/// A missing value is encoded as the literal `"nan"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingMap {
    pub column: String,
    codes: BTreeMap<String, i64>,
}

impl EncodingMap {
    /// Code of a value, if it was observed.
    pub fn code(&self, value: &str) -> Option<i64> {
        self.codes.get(value).copied()
    }

    /// `(value, code)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, i64)> {
        self.codes.iter().map(|(v, c)| (v.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Fits and applies label encodings.
pub struct LabelEncoder;

impl LabelEncoder {
    /// Build the encoding of a column's values.
    pub fn fit(series: &Series) -> EncodingMap {
        let mut codes: BTreeMap<String, i64> = Self::as_text(series)
            .into_iter()
            .map(|v| (v, 0))
            .collect();

        for (code, slot) in codes.values_mut().enumerate() {
            *slot = code as i64;
        }

        EncodingMap {
            column: series.name().to_string(),
            codes,
        }
    }

    /// Encode a column with a fitted map, producing an Int64 column.
    ///
    /// Values not present in the map become missing.
    pub fn transform(map: &EncodingMap, series: &Series, name: &str) -> Series {
        let codes: Vec<Option<i64>> = Self::as_text(series)
            .iter()
            .map(|v| map.code(v))
            .collect();
        Series::new(name.into(), codes)
    }

    fn as_text(series: &Series) -> Vec<String> {
        series_to_text(series)
            .unwrap_or_else(|| vec![None; series.len()])
            .into_iter()
            .map(|v| v.unwrap_or_else(|| MISSING_TEXT.to_string()))
            .collect()
    }
}
