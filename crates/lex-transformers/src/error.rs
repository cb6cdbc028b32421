//! Custom error types for the tabular transformers.
//!
//! Every failure is an explicit, checked variant of [`TransformError`] carrying
//! the offending column or value, so callers can tell a missing column apart
//! from malformed input or an unseen label.
//!
//! Errors are serializable as `{code, message}` so they can be forwarded to a
//! frontend or emitted by the CLI in JSON mode.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for transformer operations.
#[derive(Error, Debug)]
pub enum TransformError {
    /// A single column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// One or more configured columns were not found in the dataset.
    #[error("Columns not found in dataset: {}", .0.join(", "))]
    ColumnsNotFound(Vec<String>),

    /// The input is not table-shaped (rows x named columns).
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// A generated column name collides with an existing one.
    #[error("Duplicate column '{0}' in output")]
    DuplicateColumn(String),

    /// A label was not seen when the label encoder was fitted.
    #[error("Label '{label}' in column '{column}' was not seen during fit")]
    UnseenLabel { column: String, label: String },

    /// A category was not seen when the dummy encoder was fitted.
    #[error("Category '{category}' in column '{column}' was not seen during fit")]
    UnknownCategory { column: String, category: String },

    /// An encoded label is outside the range of fitted classes.
    #[error("Label code {code} is out of range for {n_classes} classes")]
    InvalidLabelCode { code: u64, n_classes: usize },

    /// Labels must not contain nulls.
    #[error("Column '{0}' contains null labels")]
    NullLabel(String),

    /// Empty data where non-empty data is required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TransformError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) | Self::ColumnsNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UnsupportedInput(_) => "UNSUPPORTED_INPUT",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::UnseenLabel { .. } => "UNSEEN_LABEL",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::InvalidLabelCode { .. } => "INVALID_LABEL_CODE",
            Self::NullLabel(_) => "NULL_LABEL",
            Self::EmptyData(_) => "EMPTY_DATA",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error reports absent columns, looking through context.
    pub fn is_missing_column(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::ColumnsNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_missing_column(),
            _ => false,
        }
    }

    /// The column names this error is about, if any.
    pub fn missing_columns(&self) -> Vec<&str> {
        match self {
            Self::ColumnNotFound(name) => vec![name.as_str()],
            Self::ColumnsNotFound(names) => names.iter().map(String::as_str).collect(),
            Self::WithContext { source, .. } => source.missing_columns(),
            _ => Vec::new(),
        }
    }
}

impl From<ConfigValidationError> for TransformError {
    fn from(err: ConfigValidationError) -> Self {
        TransformError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for TransformError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TransformError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for transformer operations.
pub type Result<T> = std::result::Result<T, TransformError>;

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
        self.map_err(|e| TransformError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            TransformError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            TransformError::ColumnsNotFound(vec!["a".to_string()]).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            TransformError::UnsupportedInput("scalar".to_string()).error_code(),
            "UNSUPPORTED_INPUT"
        );
    }

    #[test]
    fn test_columns_not_found_message_lists_all() {
        let error = TransformError::ColumnsNotFound(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(error.to_string(), "Columns not found in dataset: a, b");
        assert_eq!(error.missing_columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_is_missing_column() {
        assert!(TransformError::ColumnNotFound("x".to_string()).is_missing_column());
        assert!(
            TransformError::ColumnsNotFound(vec!["x".to_string()])
                .with_context("step 1")
                .is_missing_column()
        );
        assert!(!TransformError::EmptyData("no rows".to_string()).is_missing_column());
    }

    #[test]
    fn test_error_serialization() {
        let error = TransformError::UnseenLabel {
            column: "species".to_string(),
            label: "orca".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSEEN_LABEL"));
        assert!(json.contains("orca"));
    }

    #[test]
    fn test_with_context() {
        let error = TransformError::ColumnNotFound("test".to_string()).with_context("During select");
        assert!(error.to_string().contains("During select"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND"); // Preserves original code
    }

    #[test]
    fn test_from_config_validation_error() {
        let error: TransformError = ConfigValidationError::EmptyColumns.into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
