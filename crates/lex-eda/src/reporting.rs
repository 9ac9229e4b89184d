//! Bundled profile of one snapshot.

use crate::config::PipelineConfig;
use crate::correlation::CorrelationEngine;
use crate::error::Result;
use crate::profiler::DataProfiler;
use crate::table::Table;
use crate::types::TableProfile;
use tracing::debug;

/// Number of rows in the profile preview.
pub const PREVIEW_ROWS: usize = 5;

/// Assembles the reports shown for a snapshot.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Compute every report for a snapshot.
    ///
    /// The bundle carries the snapshot version; check it with
    /// [`crate::types::VersionedReport::is_current`] before showing it after
    /// a mutation.
    pub fn profile(table: &Table, config: &PipelineConfig) -> Result<TableProfile> {
        config.validate()?;

        let profile = TableProfile {
            table_version: table.version(),
            shape: table.shape(),
            classifications: table.classify_all(),
            preview: table.preview(PREVIEW_ROWS),
            duplicate_rows: DataProfiler::duplicate_rows(table),
            statistics: DataProfiler::descriptive_statistics(table),
            outliers: DataProfiler::detect_outliers(table),
            distribution: DataProfiler::distribution_shape(table),
            top_categories: DataProfiler::all_top_categories(table, config.top_categories_limit)?,
            missing: DataProfiler::missing_counts(table),
            correlation: CorrelationEngine::correlation_matrix(table),
        };

        debug!(
            "Profiled table version {} ({} rows x {} columns)",
            profile.table_version, profile.shape.0, profile.shape.1
        );
        Ok(profile)
    }
}
