//! Configuration types for the preprocessing pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};

/// Strategy for resolving missing values.
///
/// These are the only choices a presentation layer may offer; see
/// [`MissingStrategy::ALL`] and [`MissingStrategy::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MissingStrategy {
    /// Leave the table as it is
    #[default]
    DoNothing,
    /// Fill numeric columns with the mean of their non-missing values
    FillMean,
    /// Fill numeric columns with the median of their non-missing values
    FillMedian,
    /// Drop every row holding at least one missing value
    DropRows,
}

impl MissingStrategy {
    /// Every strategy, in selector order.
    pub const ALL: [MissingStrategy; 4] = [
        MissingStrategy::DoNothing,
        MissingStrategy::FillMean,
        MissingStrategy::FillMedian,
        MissingStrategy::DropRows,
    ];

    /// Display label shown in the strategy selector.
    pub fn label(&self) -> &'static str {
        match self {
            MissingStrategy::DoNothing => "Do Nothing",
            MissingStrategy::FillMean => "Fill with Mean",
            MissingStrategy::FillMedian => "Fill with Median",
            MissingStrategy::DropRows => "Drop Missing Values",
        }
    }

    /// Look a strategy up by its display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Default number of values listed per categorical column.
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// Default number of histogram bins for the distribution view.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Configuration for a preprocessing run.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::config::{MissingStrategy, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .missing_strategy(MissingStrategy::FillMedian)
///     .remove_duplicates(true)
///     .encode_column("city")
///     .scale_columns(["age", "income"])
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How missing values are resolved.
    /// Default: DoNothing
    pub missing_strategy: MissingStrategy,

    /// Whether to remove duplicate rows.
    /// Default: false
    pub remove_duplicates: bool,

    /// Whether to parse a column named exactly `Date` into datetimes.
    /// Default: true
    pub coerce_dates: bool,

    /// Categorical column to label-encode, if any.
    /// Default: None
    pub encode_column: Option<String>,

    /// Numeric columns to standardize.
    /// Default: empty
    pub scale_columns: Vec<String>,

    /// Number of values listed per categorical column in profiles.
    /// Default: 5
    pub top_categories_limit: usize,

    /// Number of bins in the distribution histogram.
    /// Default: 30
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            missing_strategy: MissingStrategy::default(),
            remove_duplicates: false,
            coerce_dates: true,
            encode_column: None,
            scale_columns: Vec::new(),
            top_categories_limit: DEFAULT_TOP_CATEGORIES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_categories_limit == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "top_categories_limit".to_string(),
            });
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "histogram_bins".to_string(),
            });
        }

        if let Some(column) = &self.encode_column
            && column.is_empty()
        {
            return Err(ConfigValidationError::EmptyColumnName(
                "encode_column".to_string(),
            ));
        }

        if self.scale_columns.iter().any(|c| c.is_empty()) {
            return Err(ConfigValidationError::EmptyColumnName(
                "scale_columns".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': must be at least 1")]
    InvalidLimit { field: String },

    #[error("Empty column name in '{0}'")]
    EmptyColumnName(String),
}

impl From<ConfigValidationError> for crate::error::EdaError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    missing_strategy: Option<MissingStrategy>,
    remove_duplicates: Option<bool>,
    coerce_dates: Option<bool>,
    encode_column: Option<String>,
    scale_columns: Vec<String>,
    top_categories_limit: Option<usize>,
    histogram_bins: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the missing-value strategy.
    pub fn missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = Some(strategy);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Enable or disable coercion of the `Date` column.
    pub fn coerce_dates(mut self, coerce: bool) -> Self {
        self.coerce_dates = Some(coerce);
        self
    }

    /// Select the categorical column to label-encode.
    pub fn encode_column(mut self, column: impl Into<String>) -> Self {
        self.encode_column = Some(column.into());
        self
    }

    /// Select the numeric columns to standardize.
    pub fn scale_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scale_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set how many values are listed per categorical column.
    pub fn top_categories_limit(mut self, limit: usize) -> Self {
        self.top_categories_limit = Some(limit);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            missing_strategy: self.missing_strategy.unwrap_or_default(),
            remove_duplicates: self.remove_duplicates.unwrap_or(false),
            coerce_dates: self.coerce_dates.unwrap_or(true),
            encode_column: self.encode_column,
            scale_columns: self.scale_columns,
            top_categories_limit: self.top_categories_limit.unwrap_or(DEFAULT_TOP_CATEGORIES),
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.missing_strategy, MissingStrategy::DoNothing);
        assert!(!config.remove_duplicates);
        assert!(config.coerce_dates);
        assert_eq!(config.top_categories_limit, 5);
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .missing_strategy(MissingStrategy::DropRows)
            .remove_duplicates(true)
            .encode_column("city")
            .scale_columns(["age", "income"])
            .build()
            .unwrap();

        assert_eq!(config.missing_strategy, MissingStrategy::DropRows);
        assert!(config.remove_duplicates);
        assert_eq!(config.encode_column.as_deref(), Some("city"));
        assert_eq!(config.scale_columns, vec!["age", "income"]);
    }

    #[test]
    fn test_validation_zero_limit() {
        let result = PipelineConfig::builder().top_categories_limit(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidLimit { .. }
        ));
    }

    #[test]
    fn test_validation_empty_encode_column() {
        let result = PipelineConfig::builder().encode_column("").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyColumnName(_)
        ));
    }

    #[test]
    fn test_strategy_labels_round_trip() {
        let labels: Vec<&str> = MissingStrategy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["Do Nothing", "Fill with Mean", "Fill with Median", "Drop Missing Values"]
        );
        for strategy in MissingStrategy::ALL {
            assert_eq!(MissingStrategy::from_label(strategy.label()), Some(strategy));
        }
        assert_eq!(MissingStrategy::from_label("Fill with Mode"), None);
    }

    #[test]
    fn test_pipeline_config_from_json() {
        // Simulate JSON that might come from a frontend
        let json = r#"{
            "missing_strategy": "FillMedian",
            "remove_duplicates": true,
            "coerce_dates": false,
            "encode_column": "city",
            "scale_columns": ["age"],
            "top_categories_limit": 3,
            "histogram_bins": 10
        }"#;

        let config: PipelineConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.missing_strategy, MissingStrategy::FillMedian);
        assert!(config.remove_duplicates);
        assert!(!config.coerce_dates);
        assert_eq!(config.encode_column, Some("city".to_string()));
        assert_eq!(config.scale_columns, vec!["age".to_string()]);
        assert_eq!(config.top_categories_limit, 3);
        assert_eq!(config.histogram_bins, 10);
    }
}
