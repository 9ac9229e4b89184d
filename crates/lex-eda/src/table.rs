//! The session table and its store.
//!
//! [`TableStore`] owns the single live [`Table`]. Every engine reads the
//! current snapshot through [`TableStore::current_snapshot`], and mutating
//! engines build a complete new frame before handing it to
//! [`TableStore::replace`], so readers never see a half-mutated table.
//!
//! Each replacement bumps the table `version`. Reports remember the version
//! they were computed from, which is how a caller tells a current report from
//! a stale one.
//!
//! # Column classification
//!
//! Classification is derived from the column contents every time it is asked
//! for; it is never stored next to the table. Ingestion infers dtypes by
//! scanning every row, so a column is numeric exactly when all of its
//! non-missing fields parsed as numbers.

use crate::error::{EdaError, Result};
use crate::utils::{DtypeCategory, MISSING_MARKERS, get_dtype_category, is_missing_marker};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use serde::Serialize;
use static_assertions::assert_impl_all;
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the only column that is ever coerced to datetimes.
pub const DATE_COLUMN: &str = "Date";

/// Logical kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing value is a number
    Numeric,
    /// Textual values
    Categorical,
    /// Dates, datetimes or times
    Datetime,
    /// Booleans and anything else; neither profiled as numeric nor categorical
    Other,
}

/// Derived classification of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub name: String,
    pub kind: ColumnKind,
    /// True when the column name marks it for date coercion.
    pub date_candidate: bool,
}

/// An immutable snapshot of the session table.
///
/// Cloning is cheap: polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    version: u64,
}

// Profiling may fan out across threads over one snapshot.
assert_impl_all!(Table: Send, Sync);

impl Table {
    /// Wrap a frame as a fresh (version 0) table.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame, version: 0 }
    }

    /// Parse a comma-separated, UTF-8 payload with a header row.
    ///
    /// Every row is scanned for dtype inference. Empty fields and the markers
    /// in [`MISSING_MARKERS`] are read as missing. A column with no
    /// non-missing value is typed as a float column, and an integer column
    /// holding a value outside the `i64` range is typed as a float column.
    ///
    /// Fails with [`EdaError::Parse`] when a row has more or fewer fields
    /// than the header, or when two header fields share a name.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| EdaError::Parse(format!("payload is not valid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Err(EdaError::Parse("payload is empty".to_string()));
        }

        let float_columns = scan_records(bytes)?;
        let null_values: Vec<PlSmallStr> = MISSING_MARKERS.iter().map(|m| (*m).into()).collect();

        let schema_overwrite = (!float_columns.is_empty()).then(|| {
            Arc::new(Schema::from_iter(
                float_columns
                    .into_iter()
                    .map(|name| (PlSmallStr::from(name), DataType::Float64)),
            ))
        });

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_schema_overwrite(schema_overwrite)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(b',')
                    .with_quote_char(Some(b'"'))
                    .with_missing_is_null(true)
                    .with_null_values(Some(NullValues::AllColumns(null_values))),
            )
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| EdaError::Parse(e.to_string()))?;

        let frame = Self::type_empty_columns(frame)?;
        info!("Loaded table: {} rows x {} columns", frame.height(), frame.width());

        Ok(Self::new(frame))
    }

    /// Cast columns without a single non-missing value to Float64.
    fn type_empty_columns(mut frame: DataFrame) -> Result<DataFrame> {
        if frame.height() == 0 {
            return Ok(frame);
        }

        let empty: Vec<String> = frame
            .get_columns()
            .iter()
            .filter(|col| col.null_count() == col.len() && !col.dtype().is_float())
            .map(|col| col.name().to_string())
            .collect();

        for name in empty {
            let series = frame
                .column(&name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            frame.replace(&name, series)?;
            debug!("Column '{}' has no values, typed as numeric", name);
        }

        Ok(frame)
    }

    /// The underlying polars frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning its frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Version stamp of this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Get a column as a Series.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.frame
            .column(name)
            .ok()
            .map(|col| col.as_materialized_series())
    }

    /// Classify a column from its current contents.
    pub fn classify(&self, name: &str) -> Option<ColumnKind> {
        self.series(name).map(|series| kind_of(series.dtype()))
    }

    /// Classify every column, in table order.
    pub fn classify_all(&self) -> Vec<ColumnClassification> {
        self.frame
            .get_columns()
            .iter()
            .map(|col| ColumnClassification {
                name: col.name().to_string(),
                kind: kind_of(col.dtype()),
                date_candidate: col.name().as_str() == DATE_COLUMN,
            })
            .collect()
    }

    /// Names of every column of the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.classify_all()
            .into_iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name)
            .collect()
    }

    /// Get a column, requiring it to be of the given kind.
    ///
    /// Fails with [`EdaError::InvalidColumn`] if the column is absent or of
    /// another kind.
    pub fn require_kind(&self, name: &str, kind: ColumnKind) -> Result<&Series> {
        let series = self
            .series(name)
            .ok_or_else(|| EdaError::invalid_column(name, "column not found in table"))?;

        let actual = kind_of(series.dtype());
        if actual != kind {
            return Err(EdaError::invalid_column(
                name,
                format!("expected a {:?} column, found {:?}", kind, actual).to_lowercase(),
            ));
        }

        Ok(series)
    }

    /// First `n` rows rendered as text, for a dataset preview.
    pub fn preview(&self, n: usize) -> Vec<Vec<Option<String>>> {
        let head = self.frame.head(Some(n));
        let columns: Vec<Vec<Option<String>>> = head
            .get_columns()
            .iter()
            .map(|col| {
                crate::utils::series_to_text(col.as_materialized_series())
                    .unwrap_or_else(|| vec![None; head.height()])
            })
            .collect();

        (0..head.height())
            .map(|row| columns.iter().map(|col| col[row].clone()).collect())
            .collect()
    }
}

/// Check the record structure of a payload before polars reads it.
///
/// Returns the columns that must be read as Float64: every non-missing field
/// parses as a float and at least one is an integer outside the `i64` range.
fn scan_records(bytes: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::with_capacity(headers.len());
    for name in &headers {
        if !seen.insert(name.as_str()) {
            return Err(EdaError::Parse(format!("duplicate column name '{}'", name)));
        }
    }

    let mut all_float = vec![true; headers.len()];
    let mut wide_int = vec![false; headers.len()];

    for record in reader.records() {
        let record = record.map_err(map_csv_error)?;
        for (idx, field) in record.iter().enumerate() {
            if is_missing_marker(field) {
                continue;
            }
            if field.parse::<f64>().is_err() {
                all_float[idx] = false;
            } else if is_integer_literal(field) && field.parse::<i64>().is_err() {
                wide_int[idx] = true;
            }
        }
    }

    let float_columns: Vec<String> = headers
        .into_iter()
        .zip(all_float.into_iter().zip(wide_int))
        .filter(|(_, (float, wide))| *float && *wide)
        .map(|(name, _)| name)
        .collect();

    for name in &float_columns {
        debug!("Column '{}' holds integers beyond i64, typed as float", name);
    }

    Ok(float_columns)
}

fn is_integer_literal(field: &str) -> bool {
    let digits = field.strip_prefix(['+', '-']).unwrap_or(field);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn map_csv_error(err: csv::Error) -> EdaError {
    EdaError::Parse(err.to_string())
}

fn kind_of(dtype: &DataType) -> ColumnKind {
    match get_dtype_category(dtype) {
        DtypeCategory::Numeric => ColumnKind::Numeric,
        DtypeCategory::String => ColumnKind::Categorical,
        DtypeCategory::Datetime => ColumnKind::Datetime,
        DtypeCategory::Boolean | DtypeCategory::Other => ColumnKind::Other,
    }
}

/// Owner of the single live table.
#[derive(Debug, Clone)]
pub struct TableStore {
    table: Table,
}

impl TableStore {
    /// Initialize the store from an ingestion payload.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_table(Table::from_csv_bytes(bytes)?))
    }

    /// Initialize the store from an existing table.
    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    /// Initialize the store from a polars frame.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self::from_table(Table::new(frame))
    }

    /// The live table. Read-only; no copy is made.
    pub fn current_snapshot(&self) -> &Table {
        &self.table
    }

    /// Swap in a new table image, stamping it with the next version.
    pub fn replace(&mut self, next: Table) {
        let version = self.table.version + 1;
        self.table = Table {
            frame: next.frame,
            version,
        };
        debug!(
            "Table replaced: version {} ({} rows x {} columns)",
            version,
            self.table.height(),
            self.table.width()
        );
    }

    /// Swap in a new frame; see [`TableStore::replace`].
    pub fn replace_frame(&mut self, frame: DataFrame) {
        self.replace(Table::new(frame));
    }

    /// Adopt the table of a store that was staged from a clone of this one.
    ///
    /// The staged version stamps are kept, so reports computed while staging
    /// stay current after the commit.
    pub fn commit(&mut self, staged: TableStore) {
        if staged.table.version == self.table.version {
            return;
        }
        debug!(
            "Committed staged table: version {} -> {}",
            self.table.version, staged.table.version
        );
        self.table = staged.table;
    }
}
