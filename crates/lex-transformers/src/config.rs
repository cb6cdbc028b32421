//! Configuration types for the transformers.
//!
//! Every transformer is driven by a plain configuration value. Values are
//! built with a fluent builder, validated once at `build()`, and never
//! mutated by a `fit` or `transform` call afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Strategy for handling categories a fitted encoder has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HandleUnknown {
    /// Fail with an unknown-category error
    #[default]
    Error,
    /// Emit 0 in every indicator of that column
    Ignore,
}

/// Configuration for the dummy (one-hot) encoder.
///
/// Use [`DummyEncoderConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_transformers::config::DummyEncoderConfig;
///
/// let config = DummyEncoderConfig::builder()
///     .columns(["color", "size"])
///     .drop_first(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyEncoderConfig {
    /// Columns to encode. When empty, every column of the input is encoded,
    /// resolved on each call from that call's input.
    /// Default: empty
    pub columns: Vec<String>,

    /// Whether to omit the indicator of the first category of each column.
    /// Default: false
    pub drop_first: bool,

    /// Prefix for generated column names. Defaults to the source column name.
    /// Default: None
    pub prefix: Option<String>,

    /// Separator between prefix and category.
    /// Default: "_"
    pub prefix_sep: String,

    /// How a fitted encoder treats categories it has not seen.
    /// Default: Error
    pub handle_unknown: HandleUnknown,
}

impl Default for DummyEncoderConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            drop_first: false,
            prefix: None,
            prefix_sep: "_".to_string(),
            handle_unknown: HandleUnknown::default(),
        }
    }
}

impl DummyEncoderConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DummyEncoderConfigBuilder {
        DummyEncoderConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_column_list(&self.columns)?;

        if let Some(prefix) = &self.prefix
            && prefix.is_empty()
        {
            return Err(ConfigValidationError::EmptyPrefix);
        }

        Ok(())
    }

    /// Prefix used for indicator columns generated from `column`.
    pub fn prefix_for<'a>(&'a self, column: &'a str) -> &'a str {
        self.prefix.as_deref().unwrap_or(column)
    }
}

/// Builder for [`DummyEncoderConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DummyEncoderConfigBuilder {
    columns: Option<Vec<String>>,
    drop_first: Option<bool>,
    prefix: Option<String>,
    prefix_sep: Option<String>,
    handle_unknown: Option<HandleUnknown>,
}

impl DummyEncoderConfigBuilder {
    /// Set the columns to encode.
    ///
    /// Leave unset (or pass an empty list) to encode every column.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Drop the first category's indicator of each encoded column.
    pub fn drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = Some(drop_first);
        self
    }

    /// Set the prefix for generated column names.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the separator between prefix and category.
    pub fn prefix_sep(mut self, sep: impl Into<String>) -> Self {
        self.prefix_sep = Some(sep.into());
        self
    }

    /// Set the unknown-category strategy for fitted encoders.
    pub fn handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = Some(strategy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DummyEncoderConfig` or an error if validation fails.
    pub fn build(self) -> Result<DummyEncoderConfig, ConfigValidationError> {
        let config = DummyEncoderConfig {
            columns: self.columns.unwrap_or_default(),
            drop_first: self.drop_first.unwrap_or(false),
            prefix: self.prefix,
            prefix_sep: self.prefix_sep.unwrap_or_else(|| "_".to_string()),
            handle_unknown: self.handle_unknown.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for the column selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelectorConfig {
    /// Columns to select (or to drop when `inverse` is set).
    pub columns: Vec<String>,

    /// Return every column except the listed ones.
    /// Default: false
    #[serde(default)]
    pub inverse: bool,
}

impl ColumnSelectorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ColumnSelectorConfigBuilder {
        ColumnSelectorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.columns.is_empty() {
            return Err(ConfigValidationError::EmptyColumns);
        }
        validate_column_list(&self.columns)
    }
}

/// Builder for [`ColumnSelectorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ColumnSelectorConfigBuilder {
    columns: Option<Vec<String>>,
    inverse: Option<bool>,
}

impl ColumnSelectorConfigBuilder {
    /// Set the columns to select.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Invert the selection: keep everything except the listed columns.
    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = Some(inverse);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ColumnSelectorConfig, ConfigValidationError> {
        let config = ColumnSelectorConfig {
            columns: self.columns.unwrap_or_default(),
            inverse: self.inverse.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Reject empty names and repeated names in a configured column list.
pub(crate) fn validate_column_list(columns: &[String]) -> Result<(), ConfigValidationError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if column.is_empty() {
            return Err(ConfigValidationError::EmptyColumnName);
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigValidationError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one column must be configured")]
    EmptyColumns,

    #[error("Column names must not be empty")]
    EmptyColumnName,

    #[error("Column '{0}' is listed more than once")]
    DuplicateColumn(String),

    #[error("Prefix must not be empty (leave it unset to use the column name)")]
    EmptyPrefix,
}
