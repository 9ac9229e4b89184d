//! CSV export of the session table.
//!
//! The output uses the ingestion dialect: comma separated, double-quote
//! quoting, UTF-8, a header row and no index column. Missing values are
//! written as empty fields.

use crate::error::{Result, ResultExt};
use crate::table::Table;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "processed_data.csv";

/// Media type of the exported artifact.
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Serializes tables to CSV.
pub struct Exporter;

impl Exporter {
    /// Serialize a table to CSV bytes.
    pub fn export_csv(table: &Table) -> Result<Vec<u8>> {
        let mut df = table.frame().clone();
        let mut buffer = Vec::new();

        Self::writer(&mut buffer, &df)
            .finish(&mut df)
            .context("Writing CSV")?;

        Ok(buffer)
    }

    /// Write `processed_data.csv` into a directory, creating it if needed.
    pub fn write_to(table: &Table, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let output_path = output_dir.join(EXPORT_FILE_NAME);
        let mut file = File::create(&output_path)?;

        let mut df = table.frame().clone();
        Self::writer(&mut file, &df)
            .finish(&mut df)
            .context("Writing CSV")?;

        info!(
            "Exported {} rows x {} columns to {}",
            df.height(),
            df.width(),
            output_path.display()
        );
        Ok(output_path)
    }

    fn writer<W: std::io::Write>(sink: W, df: &DataFrame) -> CsvWriter<W> {
        CsvWriter::new(sink)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .with_datetime_format(Some(Self::datetime_format(df).to_string()))
    }

    /// Dates are written without a time part when every datetime value in
    /// the frame falls on midnight.
    fn datetime_format(df: &DataFrame) -> &'static str {
        let all_midnight = df
            .get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::Datetime(_, _)))
            .all(|col| {
                col.as_materialized_series()
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
                    .and_then(|s| s.cast(&DataType::Int64))
                    .ok()
                    .and_then(|s| {
                        s.i64().ok().map(|ca| {
                            ca.into_iter()
                                .flatten()
                                .all(|ms| ms.rem_euclid(MILLIS_PER_DAY) == 0)
                        })
                    })
                    .unwrap_or(false)
            });

        if all_midnight { DATE_FORMAT } else { DATETIME_FORMAT }
    }
}
