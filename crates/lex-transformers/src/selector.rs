//! Column selection.
//!
//! Keeps the configured columns in the configured order, or with `inverse`
//! set, drops them and keeps everything else in table order.

use crate::config::ColumnSelectorConfig;
use crate::error::Result;
use crate::transformer::{FittedTransformer, Transformer};
use crate::utils::ensure_columns_exist;
use polars::prelude::*;
use tracing::debug;

/// Selects (or drops) a fixed list of columns.
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    config: ColumnSelectorConfig,
}

impl ColumnSelector {
    /// Create a selector from a configuration.
    pub fn new(config: ColumnSelectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Shorthand for a selector keeping `columns`.
    pub fn keep<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ColumnSelectorConfig::builder().columns(columns).build()?)
    }

    /// Shorthand for a selector dropping `columns`.
    pub fn drop<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ColumnSelectorConfig::builder()
                .columns(columns)
                .inverse(true)
                .build()?,
        )
    }

    /// The selector's configuration.
    pub fn config(&self) -> &ColumnSelectorConfig {
        &self.config
    }

    /// Apply the selection to `df`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TransformError::ColumnsNotFound`] listing every
    /// configured column absent from `df`, in both modes.
    pub fn select(&self, df: &DataFrame) -> Result<DataFrame> {
        ensure_columns_exist(df, &self.config.columns)?;

        if self.config.inverse {
            debug!("Dropping columns: {:?}", self.config.columns);
            let names: Vec<PlSmallStr> = self
                .config
                .columns
                .iter()
                .map(|s| s.as_str().into())
                .collect();
            Ok(df.drop_many(names))
        } else {
            debug!("Selecting columns: {:?}", self.config.columns);
            Ok(df.select(self.config.columns.iter().map(String::as_str))?)
        }
    }
}

impl Transformer for ColumnSelector {
    type Fitted = FittedColumnSelector;

    fn name(&self) -> &'static str {
        "column_selector"
    }

    fn fit(&self, _df: &DataFrame) -> Result<FittedColumnSelector> {
        Ok(FittedColumnSelector {
            selector: self.clone(),
        })
    }
}

/// A column selector after fit. Selection needs no learned state.
#[derive(Debug, Clone)]
pub struct FittedColumnSelector {
    selector: ColumnSelector,
}

impl FittedTransformer for FittedColumnSelector {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.selector.select(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::utils::column_names;
    use pretty_assertions::assert_eq;

    fn sample_df() -> DataFrame {
        df![
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"],
            "c" => [1.0, 2.0, 3.0],
            "d" => [true, false, true],
        ]
        .unwrap()
    }

    #[test]
    fn test_select_in_given_order() {
        let selector = ColumnSelector::keep(["c", "a"]).unwrap();
        let out = selector.select(&sample_df()).unwrap();

        assert_eq!(column_names(&out), vec!["c", "a"]);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_inverse_keeps_original_order() {
        let selector = ColumnSelector::drop(["c", "a"]).unwrap();
        let out = selector.select(&sample_df()).unwrap();

        assert_eq!(column_names(&out), vec!["b", "d"]);
    }

    #[test]
    fn test_select_nonexistent_column() {
        let selector = ColumnSelector::keep(["nonexistent"]).unwrap();
        let err = selector.select(&sample_df()).unwrap_err();

        assert!(matches!(
            err,
            TransformError::ColumnsNotFound(ref names) if names == &["nonexistent"]
        ));
    }

    #[test]
    fn test_inverse_nonexistent_column() {
        let selector = ColumnSelector::drop(["a", "ghost"]).unwrap();
        let err = selector.select(&sample_df()).unwrap_err();
        assert!(err.is_missing_column());
        assert_eq!(err.missing_columns(), vec!["ghost"]);
    }

    #[test]
    fn test_select_preserves_values() {
        let df = sample_df();
        let out = ColumnSelector::keep(["b"]).unwrap().select(&df).unwrap();
        assert!(out.equals(&df.select(["b"]).unwrap()));
    }

    #[test]
    fn test_fit_transform_is_select() {
        let selector = ColumnSelector::keep(["d"]).unwrap();
        let df = sample_df();
        let out = selector.fit_transform(&df).unwrap();
        assert_eq!(column_names(&out), vec!["d"]);
    }

    #[test]
    fn test_new_rejects_empty_columns() {
        let config = ColumnSelectorConfig {
            columns: Vec::new(),
            inverse: false,
        };
        assert!(matches!(
            ColumnSelector::new(config),
            Err(TransformError::InvalidConfig(_))
        ));
    }
}
