//! Feature transformations of the session table.
//!
//! - Label encoding of one categorical column into a new `<column>_encoded`
//!   column
//! - Standardization of numeric columns in place
//!
//! Preconditions are checked against the current snapshot before anything is
//! computed; a rejected request leaves the store untouched.

mod encoding;
mod scaling;

pub use encoding::{ENCODED_SUFFIX, EncodingMap, LabelEncoder, encoded_column_name};
pub use scaling::{ScalerParams, StandardScaler};

use crate::error::Result;
use crate::table::{ColumnKind, TableStore};
use serde::Serialize;
use tracing::{debug, info};

/// Result of encoding a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingOutcome {
    /// Name of the added (or overwritten) code column.
    pub new_column: String,
    pub mapping: EncodingMap,
}

/// Applies encoding and scaling to the store.
pub struct DataTransformer;

impl DataTransformer {
    /// Label-encode a categorical column.
    ///
    /// The codes land in `<column>_encoded`, appended after the existing
    /// columns; the source column is kept. If a column of that name already
    /// exists it is overwritten in place. The mapping is fitted fresh on every
    /// call.
    ///
    /// Fails with `InvalidColumn` if the column is absent or not categorical.
    pub fn encode_column(store: &mut TableStore, column: &str) -> Result<EncodingOutcome> {
        let table = store.current_snapshot();
        let series = table.require_kind(column, ColumnKind::Categorical)?;

        let new_column = encoded_column_name(column);
        let mapping = LabelEncoder::fit(series);
        let encoded = LabelEncoder::transform(&mapping, series, &new_column);

        let mut df = table.frame().clone();
        df.with_column(encoded)?;
        store.replace_frame(df);

        info!(
            "Encoded '{}' into '{}' ({} distinct values)",
            column,
            new_column,
            mapping.len()
        );

        Ok(EncodingOutcome {
            new_column,
            mapping,
        })
    }

    /// Standardize numeric columns in place.
    ///
    /// Every name must be a numeric column of the current table; otherwise
    /// nothing is scaled. Repeated names are scaled once. An empty list is a
    /// no-op.
    pub fn scale_columns(store: &mut TableStore, columns: &[String]) -> Result<Vec<ScalerParams>> {
        let table = store.current_snapshot();

        let mut selected: Vec<&str> = Vec::with_capacity(columns.len());
        for name in columns {
            table.require_kind(name, ColumnKind::Numeric)?;
            if !selected.contains(&name.as_str()) {
                selected.push(name);
            }
        }

        if selected.is_empty() {
            debug!("No columns selected for scaling");
            return Ok(Vec::new());
        }

        let mut df = table.frame().clone();
        let mut params = Vec::with_capacity(selected.len());

        for name in selected {
            let series = table.require_kind(name, ColumnKind::Numeric)?;
            let fitted = StandardScaler::fit(series);
            let scaled = StandardScaler::transform(&fitted, series);
            df.replace(name, scaled)?;

            debug!(
                "Scaled '{}' (mean {:?}, std {:?})",
                name, fitted.mean, fitted.std
            );
            params.push(fitted);
        }

        store.replace_frame(df);
        info!("Standardized {} columns", params.len());

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    // ==================== encoding tests ====================

    #[test]
    fn test_encode_column_appends() {
        let mut store = TableStore::from_frame(df!["cat" => ["x", "y", "x"], "n" => [1, 2, 3]].unwrap());

        let outcome = DataTransformer::encode_column(&mut store, "cat").unwrap();
        assert_eq!(outcome.new_column, "cat_encoded");

        let table = store.current_snapshot();
        assert_eq!(table.column_names(), vec!["cat", "n", "cat_encoded"]);

        let codes: Vec<Option<i64>> = table
            .series("cat_encoded")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(codes, vec![Some(0), Some(1), Some(0)]);
        assert_eq!(table.classify("cat"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_encode_twice_overwrites() {
        let mut store = TableStore::from_frame(df!["cat" => ["b", "a"]].unwrap());

        let first = DataTransformer::encode_column(&mut store, "cat").unwrap();
        let second = DataTransformer::encode_column(&mut store, "cat").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.current_snapshot().width(), 2);
    }

    #[test]
    fn test_encode_rejects_numeric_column() {
        let mut store = TableStore::from_frame(df!["n" => [1, 2]].unwrap());

        let err = DataTransformer::encode_column(&mut store, "n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLUMN");
        assert_eq!(store.current_snapshot().version(), 0);
        assert_eq!(store.current_snapshot().width(), 1);
    }

    // ==================== scaling tests ====================

    #[test]
    fn test_scale_columns() {
        let mut store = TableStore::from_frame(df!["a" => [1.0, 3.0], "b" => [10, 30]].unwrap());

        let params =
            DataTransformer::scale_columns(&mut store, &["a".to_string(), "b".to_string()]).unwrap();

        assert_eq!(params.len(), 2);
        let b: Vec<Option<f64>> = store
            .current_snapshot()
            .series("b")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(b, vec![Some(-1.0), Some(1.0)]);
    }

    #[test]
    fn test_scale_rejects_whole_request() {
        let mut store = TableStore::from_frame(df!["a" => [1.0, 3.0], "s" => ["x", "y"]].unwrap());

        let err = DataTransformer::scale_columns(&mut store, &["a".to_string(), "s".to_string()])
            .unwrap_err();

        assert_eq!(err.error_code(), "INVALID_COLUMN");
        // The valid column was not scaled either
        let a = store.current_snapshot().series("a").unwrap().clone();
        assert_eq!(a.f64().unwrap().get(0), Some(1.0));
        assert_eq!(store.current_snapshot().version(), 0);
    }

    #[test]
    fn test_scale_empty_list_is_noop() {
        let mut store = TableStore::from_frame(df!["a" => [1.0]].unwrap());
        assert!(DataTransformer::scale_columns(&mut store, &[]).unwrap().is_empty());
        assert_eq!(store.current_snapshot().version(), 0);
    }
}
