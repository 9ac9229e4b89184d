//! Error types for the profiling and preprocessing engine.
//!
//! Only two failures are part of the session contract: a malformed ingestion
//! payload ([`EdaError::Parse`]) and a rejected column operation
//! ([`EdaError::InvalidColumn`]). Degenerate statistics are never errors; they
//! surface as `None` inside the reports.
//!
//! Errors are serializable so a presentation layer can show them directly.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the engine.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The ingestion payload is not well-formed delimited text.
    #[error("Failed to parse table: {0}")]
    Parse(String),

    /// A requested column does not exist or fails a type precondition.
    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Shorthand for [`EdaError::InvalidColumn`].
    pub fn invalid_column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        EdaError::InvalidColumn {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "PARSE_ERROR",
            Self::InvalidColumn { .. } => "INVALID_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the session can continue after this error.
    ///
    /// A rejected column operation leaves the table untouched, so the user can
    /// pick another column. A parse failure means there is no table at all.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidColumn { .. } | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(EdaError::Parse("bad".to_string()).error_code(), "PARSE_ERROR");
        assert_eq!(
            EdaError::invalid_column("age", "not categorical").error_code(),
            "INVALID_COLUMN"
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(EdaError::from(io).error_code(), "IO_ERROR");
        let polars = polars::error::PolarsError::NoData("empty".into());
        assert_eq!(EdaError::from(polars).error_code(), "POLARS_ERROR");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(EdaError::invalid_column("age", "missing").is_recoverable());
        assert!(!EdaError::Parse("bad".to_string()).is_recoverable());
        assert!(
            EdaError::invalid_column("age", "missing")
                .with_context("Encoding")
                .is_recoverable()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::invalid_column("Age", "not numeric");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_COLUMN"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::invalid_column("test", "missing").with_context("During scaling");
        assert!(error.to_string().contains("During scaling"));
        assert_eq!(error.error_code(), "INVALID_COLUMN");
    }
}
