//! Ordered command pipeline.
//!
//! This module provides the `Pipeline` struct and builder for applying a
//! sequence of mutations to the session table.

use crate::config::{MissingStrategy, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::pipeline::command::{Command, StepResult};
use crate::table::TableStore;
use crate::types::MissingReport;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// An ordered list of mutating commands.
///
/// Use [`Pipeline::from_config`] for the standard ordering, or
/// [`Pipeline::builder()`] to assemble commands by hand.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::{MissingStrategy, Pipeline, TableStore};
///
/// let mut store = TableStore::load(bytes)?;
/// let outcome = Pipeline::builder()
///     .resolve_missing(MissingStrategy::FillMedian)
///     .remove_duplicates()
///     .encode_column("city")
///     .build()
///     .run(&mut store)?;
///
/// for step in &outcome.steps {
///     println!("{}", step);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    commands: Vec<Command>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutcome {
    /// One line per command, in order.
    pub steps: Vec<String>,
    pub results: Vec<StepResult>,
    /// Missing counts of the committed table.
    pub missing: MissingReport,
    pub duration_ms: u64,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Build the command list for a configuration.
    ///
    /// Commands run in the fixed order missing values, duplicates, dates,
    /// encoding, scaling. Steps the configuration does not ask for are left
    /// out.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::builder();
        if config.missing_strategy != MissingStrategy::DoNothing {
            builder = builder.resolve_missing(config.missing_strategy);
        }
        if config.remove_duplicates {
            builder = builder.remove_duplicates();
        }
        if config.coerce_dates {
            builder = builder.coerce_dates();
        }
        if let Some(column) = &config.encode_column {
            builder = builder.encode_column(column.clone());
        }
        if !config.scale_columns.is_empty() {
            builder = builder.scale_columns(config.scale_columns.clone());
        }

        Ok(builder.build())
    }

    /// The commands, in execution order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every command in order.
    ///
    /// Commands run against a staged copy of the store. The store only
    /// changes if every command succeeds; on the first rejected command the
    /// error is returned and the store is left as it was.
    pub fn run(&self, store: &mut TableStore) -> Result<PipelineOutcome> {
        let start = Instant::now();
        let mut staged = store.clone();
        let mut steps = Vec::with_capacity(self.commands.len());
        let mut results = Vec::with_capacity(self.commands.len());

        info!("Running pipeline with {} commands", self.commands.len());

        for (idx, command) in self.commands.iter().enumerate() {
            debug!("Step {}: {}", idx + 1, command.name());
            let result = command
                .apply(&mut staged)
                .context(format!("Step {} ({})", idx + 1, command.name()))?;

            steps.push(result.describe());
            results.push(result);
        }

        store.commit(staged);
        let missing = MissingReport::from_table(store.current_snapshot());

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Pipeline finished in {}ms (table version {})",
            duration_ms,
            store.current_snapshot().version()
        );

        Ok(PipelineOutcome {
            steps,
            results,
            missing,
            duration_ms,
        })
    }
}

/// Builder for [`Pipeline`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    commands: Vec<Command>,
}

impl PipelineBuilder {
    /// Append an arbitrary command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn resolve_missing(self, strategy: MissingStrategy) -> Self {
        self.command(Command::ResolveMissing(strategy))
    }

    pub fn remove_duplicates(self) -> Self {
        self.command(Command::RemoveDuplicates)
    }

    pub fn coerce_dates(self) -> Self {
        self.command(Command::CoerceDates)
    }

    pub fn encode_column(self, column: impl Into<String>) -> Self {
        self.command(Command::EncodeColumn(column.into()))
    }

    pub fn scale_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Command::ScaleColumns(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use crate::types::VersionedReport;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn sample_store() -> TableStore {
        TableStore::from_frame(
            df![
                "age" => [Some(20.0), None, Some(40.0), Some(20.0)],
                "city" => [Some("Oslo"), Some("Rome"), None, Some("Oslo")],
                "Date" => ["2024-01-01", "2024-01-02", "bad", "2024-01-01"]
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_from_config_order() {
        let config = PipelineConfig::builder()
            .scale_columns(["age"])
            .encode_column("city")
            .remove_duplicates(true)
            .missing_strategy(MissingStrategy::FillMean)
            .build()
            .unwrap();

        let pipeline = Pipeline::from_config(&config).unwrap();

        assert_eq!(
            pipeline.commands(),
            &[
                Command::ResolveMissing(MissingStrategy::FillMean),
                Command::RemoveDuplicates,
                Command::CoerceDates,
                Command::EncodeColumn("city".to_string()),
                Command::ScaleColumns(vec!["age".to_string()]),
            ]
        );
    }

    #[test]
    fn test_default_config_only_coerces_dates() {
        let pipeline = Pipeline::from_config(&PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.commands(), &[Command::CoerceDates]);
    }

    #[test]
    fn test_run_applies_in_order() {
        let mut store = sample_store();
        let pipeline = Pipeline::builder()
            .resolve_missing(MissingStrategy::FillMean)
            .remove_duplicates()
            .coerce_dates()
            .encode_column("city")
            .build();

        let outcome = pipeline.run(&mut store).unwrap();
        let table = store.current_snapshot();

        assert_eq!(outcome.steps.len(), 4);
        // Row 3 repeats row 0
        assert_eq!(table.height(), 3);
        assert_eq!(table.classify("Date"), Some(ColumnKind::Datetime));
        assert!(table.has_column("city_encoded"));
        assert_eq!(outcome.missing.get("age"), Some(0));
        assert!(outcome.missing.is_current(table));
    }

    #[test]
    fn test_rejected_command_leaves_store_unchanged() {
        let mut store = sample_store();
        let pipeline = Pipeline::builder()
            .remove_duplicates()
            .encode_column("age")
            .build();

        let err = pipeline.run(&mut store).unwrap_err();

        assert_eq!(err.error_code(), "INVALID_COLUMN");
        assert!(err.is_recoverable());
        assert_eq!(store.current_snapshot().version(), 0);
        assert_eq!(store.current_snapshot().height(), 4);
    }

    #[test]
    fn test_same_commands_same_table() {
        let pipeline = Pipeline::builder()
            .resolve_missing(MissingStrategy::FillMedian)
            .encode_column("city")
            .scale_columns(["age"])
            .build();

        let mut first = sample_store();
        let mut second = sample_store();
        pipeline.run(&mut first).unwrap();
        pipeline.run(&mut second).unwrap();

        assert!(
            first
                .current_snapshot()
                .frame()
                .equals_missing(second.current_snapshot().frame())
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            histogram_bins: 0,
            ..PipelineConfig::default()
        };
        let err = Pipeline::from_config(&config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
