//! Report types shared across the engine.
//!
//! All reports are plain serializable data. A statistic that is undefined for
//! a column (too few values, zero variance, no values at all) is `None`, which
//! serializes as `null`.
//!
//! Every report remembers the version of the table it was computed from; see
//! [`VersionedReport`].

use crate::table::{ColumnClassification, Table};
use crate::utils::missing_count;
use serde::Serialize;

/// A report computed from one table snapshot.
pub trait VersionedReport {
    /// Version of the table the report was computed from.
    fn table_version(&self) -> u64;

    /// Whether the report still describes the given table.
    ///
    /// Any mutation bumps the table version, so a report computed before it
    /// must be recomputed before being shown as current.
    fn is_current(&self, table: &Table) -> bool {
        self.table_version() == table.version()
    }
}

macro_rules! versioned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl VersionedReport for $ty {
                fn table_version(&self) -> u64 {
                    self.table_version
                }
            }
        )*
    };
}

// ============================================================================
// Descriptive statistics
// ============================================================================

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    pub min: Option<f64>,
    /// 25th percentile.
    pub q1: Option<f64>,
    /// 50th percentile.
    pub median: Option<f64>,
    /// 75th percentile.
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Per-numeric-column summaries, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStatistics {
    pub table_version: u64,
    pub columns: Vec<NumericSummary>,
}

impl DescriptiveStatistics {
    pub fn get(&self, column: &str) -> Option<&NumericSummary> {
        self.columns.iter().find(|s| s.column == column)
    }
}

// ============================================================================
// Outliers
// ============================================================================

/// IQR outlier count of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierCount {
    pub column: String,
    pub count: usize,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// IQR outlier counts. Columns without any value are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub table_version: u64,
    pub columns: Vec<OutlierCount>,
}

impl OutlierReport {
    /// Outlier count of a column, if it is part of the report.
    pub fn count(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|o| o.column == column)
            .map(|o| o.count)
    }
}

// ============================================================================
// Distribution shape
// ============================================================================

/// Skewness and excess kurtosis of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeStatistics {
    pub column: String,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionShape {
    pub table_version: u64,
    pub columns: Vec<ShapeStatistics>,
}

impl DistributionShape {
    pub fn get(&self, column: &str) -> Option<&ShapeStatistics> {
        self.columns.iter().find(|s| s.column == column)
    }
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent values of one categorical column.
///
/// Sorted by count descending; ties keep first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopCategories {
    pub table_version: u64,
    pub column: String,
    pub values: Vec<CategoryCount>,
}

// ============================================================================
// Missing values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Missing-value count of every column, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub table_version: u64,
    pub columns: Vec<MissingCount>,
}

impl MissingReport {
    /// Count the missing values of every column of a table.
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .frame()
            .get_columns()
            .iter()
            .map(|col| MissingCount {
                column: col.name().to_string(),
                missing: missing_count(col.as_materialized_series()),
            })
            .collect();

        Self {
            table_version: table.version(),
            columns,
        }
    }

    /// Missing count of a column, if it exists.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.missing)
    }

    /// Total number of missing cells.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|m| m.missing).sum()
    }
}

// ============================================================================
// Histogram
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of one numeric column's non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub table_version: u64,
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

// ============================================================================
// Correlation
// ============================================================================

/// Pearson correlation matrix over the numeric columns.
///
/// `values[i][j]` is `None` when the pair has fewer than two complete rows or
/// either side is constant over those rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub table_version: u64,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation of a pair of columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Result of a correlation request.
///
/// `Unavailable` is a normal outcome (fewer than two numeric columns), not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "matrix", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Matrix(CorrelationMatrix),
    Unavailable,
}

impl CorrelationOutcome {
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            CorrelationOutcome::Matrix(m) => Some(m),
            CorrelationOutcome::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CorrelationOutcome::Matrix(_))
    }
}

// ============================================================================
// Bundled profile
// ============================================================================

/// Everything the profiling view shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub table_version: u64,
    pub shape: (usize, usize),
    pub classifications: Vec<ColumnClassification>,
    /// First rows rendered as text.
    pub preview: Vec<Vec<Option<String>>>,
    /// Rows equal to an earlier row in every column.
    pub duplicate_rows: usize,
    pub statistics: DescriptiveStatistics,
    pub outliers: OutlierReport,
    pub distribution: DistributionShape,
    pub top_categories: Vec<TopCategories>,
    pub missing: MissingReport,
    pub correlation: CorrelationOutcome,
}

versioned!(
    DescriptiveStatistics,
    OutlierReport,
    DistributionShape,
    TopCategories,
    MissingReport,
    Histogram,
    CorrelationMatrix,
    TableProfile,
);
