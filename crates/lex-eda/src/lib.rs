//! Exploratory Data Analysis and Preprocessing Library
//!
//! Profiling and preprocessing of a single in-memory table, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! - **Profiling**: Descriptive statistics, IQR outliers, skewness and
//!   kurtosis, top categories, missing values and duplicate rows
//! - **Correlation**: Pairwise-complete Pearson matrix over numeric columns
//! - **Cleaning**: Missing-value strategies, duplicate removal, `Date` coercion
//! - **Transformation**: Label encoding and standardization
//! - **Export**: CSV in the ingestion dialect
//!
//! The session table lives in a [`TableStore`]. Read-only engines take the
//! current [`Table`] snapshot; mutating engines take the store and replace the
//! table as a whole. Every replacement bumps the table version, and every
//! report carries the version it was computed from.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{Exporter, MissingStrategy, Pipeline, PipelineConfig, ReportGenerator, TableStore};
//!
//! let mut store = TableStore::load(&std::fs::read("data.csv")?)?;
//!
//! let config = PipelineConfig::builder()
//!     .missing_strategy(MissingStrategy::FillMedian)
//!     .remove_duplicates(true)
//!     .encode_column("city")
//!     .build()?;
//!
//! let before = ReportGenerator::profile(store.current_snapshot(), &config)?;
//! let outcome = Pipeline::from_config(&config)?.run(&mut store)?;
//!
//! // `before` describes the old table now; profile again
//! let after = ReportGenerator::profile(store.current_snapshot(), &config)?;
//!
//! let csv = Exporter::export_csv(store.current_snapshot())?;
//! ```
//!
//! # Single operations
//!
//! Each engine can also be called directly:
//!
//! ```rust,ignore
//! use lex_eda::{DataCleaner, DataProfiler, DataTransformer};
//!
//! let outliers = DataProfiler::detect_outliers(store.current_snapshot());
//! let removed = DataCleaner::remove_duplicates(&mut store)?;
//! let encoded = DataTransformer::encode_column(&mut store, "city")?;
//! ```

pub mod cleaner;
pub mod config;
pub mod controls;
pub mod correlation;
pub mod error;
pub mod export;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod table;
pub mod transform;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, DateCoercion, MissingResolution};
pub use config::{ConfigValidationError, MissingStrategy, PipelineConfig, PipelineConfigBuilder};
pub use controls::{ControlOptions, StrategyOption};
pub use correlation::CorrelationEngine;
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use export::{EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE, Exporter};
pub use imputers::StatisticalImputer;
pub use pipeline::{Command, Pipeline, PipelineBuilder, PipelineOutcome, StepResult};
pub use profiler::DataProfiler;
pub use reporting::ReportGenerator;
pub use table::{ColumnClassification, ColumnKind, DATE_COLUMN, Table, TableStore};
pub use transform::{DataTransformer, EncodingMap, EncodingOutcome, ScalerParams};
pub use types::{
    CategoryCount, CorrelationMatrix, CorrelationOutcome, DescriptiveStatistics,
    DistributionShape, Histogram, HistogramBin, MissingCount, MissingReport, NumericSummary,
    OutlierCount, OutlierReport, ShapeStatistics, TableProfile, TopCategories, VersionedReport,
};
