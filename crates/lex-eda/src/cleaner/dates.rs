//! Date parsing for the `Date` column.
//!
//! Values are matched against a small set of shape patterns first, and only
//! the chrono formats of the matching shape are tried. Anything that does not
//! parse becomes missing.

use crate::error::Result;
use crate::utils::{is_datetime_dtype, is_missing_marker, series_to_text};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Target representation of a coerced date column.
pub const DATE_DTYPE: DataType = DataType::Datetime(TimeUnit::Milliseconds, None);

struct DatePattern {
    shape: Regex,
    formats: &'static [&'static str],
    has_time: bool,
}

impl DatePattern {
    fn new(shape: &str, formats: &'static [&'static str], has_time: bool) -> Self {
        Self {
            shape: Regex::new(shape).expect("Invalid date shape regex"),
            formats,
            has_time,
        }
    }
}

static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern::new(r"^\d{4}-\d{1,2}-\d{1,2}$", &["%Y-%m-%d"], false),
        DatePattern::new(r"^\d{4}/\d{1,2}/\d{1,2}$", &["%Y/%m/%d"], false),
        // Month first
        DatePattern::new(r"^\d{1,2}/\d{1,2}/\d{4}$", &["%m/%d/%Y"], false),
        DatePattern::new(r"^\d{1,2}-\d{1,2}-\d{4}$", &["%m-%d-%Y"], false),
        DatePattern::new(r"^\d{8}$", &["%Y%m%d"], false),
        DatePattern::new(r"^\d{1,2} [A-Za-z]{3,9} \d{4}$", &["%d %b %Y", "%d %B %Y"], false),
        DatePattern::new(
            r"^[A-Za-z]{3,9} \d{1,2}, \d{4}$",
            &["%b %d, %Y", "%B %d, %Y"],
            false,
        ),
        DatePattern::new(
            r"^\d{4}-\d{1,2}-\d{1,2}[ T]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?$",
            &[
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M",
            ],
            true,
        ),
    ]
});

/// Parse one raw value. Returns `None` for missing markers and anything that
/// is not a recognized date.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if is_missing_marker(value) {
        return None;
    }

    // Offsets are normalized to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    let pattern = DATE_PATTERNS.iter().find(|p| p.shape.is_match(value))?;
    pattern.formats.iter().find_map(|fmt| {
        if pattern.has_time {
            NaiveDateTime::parse_from_str(value, fmt).ok()
        } else {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    })
}

/// Coerce a column to millisecond datetimes.
///
/// Temporal columns are cast; anything else is read as text and parsed
/// value by value. Never fails on content: unparseable values become missing.
pub fn coerce_series(series: &Series) -> Result<Series> {
    if is_datetime_dtype(series.dtype()) && series.dtype() != &DataType::Time {
        return Ok(series.cast(&DATE_DTYPE)?);
    }

    let values = series_to_text(series).unwrap_or_else(|| vec![None; series.len()]);
    let millis: Vec<Option<i64>> = values
        .iter()
        .map(|v| {
            v.as_deref()
                .and_then(parse_date)
                .map(|dt| dt.and_utc().timestamp_millis())
        })
        .collect();

    Ok(Series::new(series.name().clone(), millis).cast(&DATE_DTYPE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_and_slashed() {
        assert_eq!(parse_date("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("2024/3/5"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(" 20240305 "), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_month_first() {
        assert_eq!(parse_date("03/05/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("03-05-2024"), Some(ymd(2024, 3, 5)));
        // No 13th month
        assert_eq!(parse_date("13/05/2024"), None);
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_date("5 Mar 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("5 March 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Mar 5, 2024"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_date("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_date("2024-03-05T14:30"), Some(expected));
        assert_eq!(parse_date("2024-03-05T16:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("NA"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_coerce_series_marks_unparseable_missing() {
        let series = Series::new("Date".into(), &[Some("2024-01-01"), Some("soon"), None]);
        let coerced = coerce_series(&series).unwrap();

        assert_eq!(coerced.dtype(), &DATE_DTYPE);
        assert_eq!(coerced.null_count(), 2);
        assert_eq!(coerced.len(), 3);
    }
}
