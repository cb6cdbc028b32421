//! Dummy (one-hot) encoding of categorical columns.
//!
//! Each encoded column is replaced by one `UInt8` indicator column per
//! observed category, named `{prefix}{prefix_sep}{category}`. Categories are
//! taken in first-seen order, so `drop_first` removes the indicator of the
//! value that appears first in the column.
//!
//! Output layout: every column that is not encoded keeps its place in the
//! original relative order, then the indicator groups follow in the order the
//! source columns were processed. Row order never changes.
//!
//! Two entry points exist:
//! - [`DummyEncoder::encode`] recomputes categories from every input.
//! - [`Transformer::fit`] freezes the columns and categories of one input into
//!   a [`FittedDummyEncoder`] that can be applied to later inputs.

use crate::config::{DummyEncoderConfig, HandleUnknown};
use crate::error::{Result, TransformError};
use crate::frame::frame_from_json;
use crate::transformer::{FittedTransformer, Transformer};
use crate::utils::{
    category_strings, column_names, column_series, ensure_columns_exist, first_seen_categories,
    indicator_series,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Categories learned for one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCategories {
    /// Source column name.
    pub column: String,
    /// Every distinct non-null value, in first-seen order.
    pub categories: Vec<String>,
}

impl ColumnCategories {
    /// Categories that get an indicator column.
    pub fn retained(&self, drop_first: bool) -> &[String] {
        if drop_first && !self.categories.is_empty() {
            &self.categories[1..]
        } else {
            &self.categories
        }
    }
}

/// One-hot encoder driven by a [`DummyEncoderConfig`].
#[derive(Debug, Clone, Default)]
pub struct DummyEncoder {
    config: DummyEncoderConfig,
}

static_assertions::assert_impl_all!(DummyEncoder: Send, Sync);

impl DummyEncoder {
    /// Create an encoder from a validated configuration.
    pub fn new(config: DummyEncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The encoder's configuration.
    pub fn config(&self) -> &DummyEncoderConfig {
        &self.config
    }

    /// Encode `df`, deriving categories from `df` itself.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ColumnsNotFound`] if a configured column is
    /// absent, and [`TransformError::DuplicateColumn`] if a generated name
    /// collides with another output column.
    pub fn encode(&self, df: &DataFrame) -> Result<DataFrame> {
        let learned = self.learn_categories(df)?;
        self.apply(df, &learned, HandleUnknown::Ignore)
    }

    /// Encode a JSON table (records, rows, or a column map).
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedInput`] if `value` is not
    /// table-shaped, plus everything [`DummyEncoder::encode`] can return.
    pub fn encode_value(&self, value: &serde_json::Value) -> Result<DataFrame> {
        let df = frame_from_json(value)?;
        self.encode(&df)
    }

    /// Working column set for `df`.
    ///
    /// Configured columns win; otherwise every column of this `df`.
    fn working_columns(&self, df: &DataFrame) -> Result<Vec<String>> {
        if self.config.columns.is_empty() {
            return Ok(column_names(df));
        }
        ensure_columns_exist(df, &self.config.columns)?;
        Ok(self.config.columns.clone())
    }

    fn learn_categories(&self, df: &DataFrame) -> Result<Vec<ColumnCategories>> {
        let columns = self.working_columns(df)?;
        let mut learned = Vec::with_capacity(columns.len());

        for column in columns {
            let values = category_strings(&column_series(df, &column)?)?;
            let categories = first_seen_categories(&values);
            debug!("Column '{}': {} categories", column, categories.len());
            learned.push(ColumnCategories { column, categories });
        }

        Ok(learned)
    }

    /// Build the output frame for a known set of categories.
    ///
    /// With `HandleUnknown::Error`, any non-null value outside the learned
    /// categories fails the whole call. With `HandleUnknown::Ignore` it is
    /// logged and encoded as all zeros.
    fn apply(
        &self,
        df: &DataFrame,
        learned: &[ColumnCategories],
        handle_unknown: HandleUnknown,
    ) -> Result<DataFrame> {
        let encoded: HashSet<&str> = learned.iter().map(|c| c.column.as_str()).collect();
        let missing: Vec<String> = learned
            .iter()
            .filter(|c| df.column(&c.column).is_err())
            .map(|c| c.column.clone())
            .collect();
        if !missing.is_empty() {
            return Err(TransformError::ColumnsNotFound(missing));
        }

        let mut output: Vec<Column> = df
            .get_columns()
            .iter()
            .filter(|col| !encoded.contains(col.name().as_str()))
            .cloned()
            .collect();
        let mut names: HashSet<String> = output.iter().map(|c| c.name().to_string()).collect();

        for group in learned {
            let values = category_strings(&column_series(df, &group.column)?)?;

            let known: HashSet<&str> = group.categories.iter().map(String::as_str).collect();
            if let Some(unknown) = values
                .iter()
                .flatten()
                .find(|value| !known.contains(value.as_str()))
            {
                match handle_unknown {
                    HandleUnknown::Error => {
                        return Err(TransformError::UnknownCategory {
                            column: group.column.clone(),
                            category: unknown.clone(),
                        });
                    }
                    HandleUnknown::Ignore => warn!(
                        "Column '{}': unseen category '{}' encoded as all zeros",
                        group.column, unknown
                    ),
                }
            }

            let prefix = self.config.prefix_for(&group.column);
            for category in group.retained(self.config.drop_first) {
                let name = format!("{}{}{}", prefix, self.config.prefix_sep, category);
                if !names.insert(name.clone()) {
                    return Err(TransformError::DuplicateColumn(name));
                }
                output.push(indicator_series(&name, &values, category).into_column());
            }
        }

        // Height comes from the input so a frame with no output columns keeps its rows
        Ok(DataFrame::new_with_height(df.height(), output)?)
    }
}

impl Transformer for DummyEncoder {
    type Fitted = FittedDummyEncoder;

    fn name(&self) -> &'static str {
        "dummy_encoder"
    }

    fn fit(&self, df: &DataFrame) -> Result<FittedDummyEncoder> {
        let learned = self.learn_categories(df)?;
        info!(
            "Fitted dummy encoder on {} columns ({} categories)",
            learned.len(),
            learned.iter().map(|c| c.categories.len()).sum::<usize>()
        );
        Ok(FittedDummyEncoder {
            encoder: self.clone(),
            learned,
        })
    }

    fn fit_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.encode(df)
    }
}

/// A dummy encoder with frozen columns and categories.
#[derive(Debug, Clone)]
pub struct FittedDummyEncoder {
    encoder: DummyEncoder,
    learned: Vec<ColumnCategories>,
}

impl FittedDummyEncoder {
    /// Columns and categories learned during fit, in processing order.
    pub fn categories(&self) -> &[ColumnCategories] {
        &self.learned
    }

    /// Names of the indicator columns this encoder produces.
    pub fn feature_names(&self) -> Vec<String> {
        let config = self.encoder.config();
        self.learned
            .iter()
            .flat_map(|group| {
                let prefix = config.prefix_for(&group.column);
                group
                    .retained(config.drop_first)
                    .iter()
                    .map(move |category| format!("{}{}{}", prefix, config.prefix_sep, category))
            })
            .collect()
    }
}

impl FittedTransformer for FittedDummyEncoder {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.encoder
            .apply(df, &self.learned, self.encoder.config().handle_unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn color_df() -> DataFrame {
        df![
            "id" => [1i64, 2, 3, 4],
            "color" => ["red", "blue", "red", "green"],
        ]
        .unwrap()
    }

    fn flags(df: &DataFrame, name: &str) -> Vec<u8> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .u8()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    fn encoder(builder: crate::config::DummyEncoderConfigBuilder) -> DummyEncoder {
        DummyEncoder::new(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_encode_first_seen_order() {
        let enc = encoder(DummyEncoderConfig::builder().columns(["color"]));
        let out = enc.encode(&color_df()).unwrap();

        assert_eq!(
            column_names(&out),
            vec!["id", "color_red", "color_blue", "color_green"]
        );
        assert_eq!(flags(&out, "color_red"), vec![1, 0, 1, 0]);
        assert_eq!(flags(&out, "color_blue"), vec![0, 1, 0, 0]);
        assert_eq!(flags(&out, "color_green"), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_drop_first() {
        let enc = encoder(
            DummyEncoderConfig::builder()
                .columns(["color"])
                .drop_first(true),
        );
        let out = enc.encode(&color_df()).unwrap();

        assert_eq!(column_names(&out), vec!["id", "color_blue", "color_green"]);
        assert_eq!(flags(&out, "color_blue"), vec![0, 1, 0, 0]);
        assert_eq!(flags(&out, "color_green"), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_all_columns_by_default() {
        let df = df![
            "a" => ["x", "y"],
            "b" => [true, false],
        ]
        .unwrap();
        let out = DummyEncoder::default().encode(&df).unwrap();

        assert_eq!(
            column_names(&out),
            vec!["a_x", "a_y", "b_true", "b_false"]
        );
    }

    #[test]
    fn test_encode_custom_prefix_and_separator() {
        let enc = encoder(
            DummyEncoderConfig::builder()
                .columns(["color"])
                .prefix("c")
                .prefix_sep("-"),
        );
        let out = enc.encode(&color_df()).unwrap();
        assert_eq!(column_names(&out), vec!["id", "c-red", "c-blue", "c-green"]);
    }

    #[test]
    fn test_encode_preserves_passthrough_order() {
        let df = df![
            "z" => [1i64, 2],
            "cat" => ["a", "b"],
            "y" => [3.0, 4.0],
            "x" => ["p", "q"],
        ]
        .unwrap();
        let enc = encoder(DummyEncoderConfig::builder().columns(["x", "cat"]));
        let out = enc.encode(&df).unwrap();

        // Groups follow the configured order, not the table order
        assert_eq!(
            column_names(&out),
            vec!["z", "y", "x_p", "x_q", "cat_a", "cat_b"]
        );
        assert!(
            out.column("y")
                .unwrap()
                .as_materialized_series()
                .equals(df.column("y").unwrap().as_materialized_series())
        );
    }

    #[test]
    fn test_encode_nulls_yield_all_zero_rows() {
        let df = df!["c" => [Some("a"), None, Some("b")]].unwrap();
        let out = DummyEncoder::default().encode(&df).unwrap();

        assert_eq!(column_names(&out), vec!["c_a", "c_b"]);
        assert_eq!(flags(&out, "c_a"), vec![1, 0, 0]);
        assert_eq!(flags(&out, "c_b"), vec![0, 0, 1]);
    }

    #[test]
    fn test_encode_numeric_categories() {
        let df = df!["n" => [3i64, 1, 3]].unwrap();
        let out = DummyEncoder::default().encode(&df).unwrap();
        assert_eq!(column_names(&out), vec!["n_3", "n_1"]);
    }

    #[test]
    fn test_encode_missing_column() {
        let enc = encoder(DummyEncoderConfig::builder().columns(["color", "shape", "size"]));
        let err = enc.encode(&color_df()).unwrap_err();

        assert!(matches!(
            err,
            TransformError::ColumnsNotFound(ref names) if names == &["shape", "size"]
        ));
    }

    #[test]
    fn test_encode_duplicate_generated_name() {
        // One prefix shared by two columns with an overlapping category
        let df = df!["a" => ["1", "2"], "b" => ["1", "3"]].unwrap();
        let enc = encoder(DummyEncoderConfig::builder().prefix("p"));
        let err = enc.encode(&df).unwrap_err();

        assert!(matches!(err, TransformError::DuplicateColumn(ref name) if name == "p_1"));
    }

    #[test]
    fn test_encode_name_collides_with_passthrough() {
        let df = df!["color_red" => [0i64, 1], "color" => ["red", "blue"]].unwrap();
        let enc = encoder(DummyEncoderConfig::builder().columns(["color"]));
        assert!(matches!(
            enc.encode(&df),
            Err(TransformError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_encode_does_not_persist_resolved_columns() {
        let enc = DummyEncoder::default();
        let first = df!["a" => ["x", "y"]].unwrap();
        let second = df!["b" => ["u", "v"]].unwrap();

        enc.encode(&first).unwrap();
        let out = enc.encode(&second).unwrap();

        assert!(enc.config().columns.is_empty());
        assert_eq!(column_names(&out), vec!["b_u", "b_v"]);
    }

    #[test]
    fn test_encode_empty_frame() {
        let df = df!["c" => Vec::<&str>::new()].unwrap();
        let out = DummyEncoder::default().encode(&df).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), 0);
    }

    #[test]
    fn test_encode_single_category_drop_first_keeps_rows() {
        let df = df!["c" => ["a", "a", "a"]].unwrap();
        let enc = encoder(DummyEncoderConfig::builder().drop_first(true));
        let out = enc.encode(&df).unwrap();

        assert_eq!(out.width(), 0);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_encode_all_null_column_keeps_rows() {
        let df = df!["c" => [None::<&str>, None, None]].unwrap();
        let out = DummyEncoder::default().encode(&df).unwrap();

        assert_eq!(out.width(), 0);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_fitted_without_indicators_keeps_rows() {
        let enc = encoder(DummyEncoderConfig::builder().drop_first(true));
        let fitted = enc.fit(&df!["c" => ["a", "a"]].unwrap()).unwrap();

        let later = df!["c" => ["a", "a", "a", "a"]].unwrap();
        let out = fitted.transform(&later).unwrap();
        assert_eq!(out.shape(), (4, 0));
    }

    #[test]
    fn test_encode_value_records() {
        let value = serde_json::json!([
            {"color": "red", "n": 1},
            {"color": "blue", "n": 2},
        ]);
        let enc = encoder(DummyEncoderConfig::builder().columns(["color"]));
        let out = enc.encode_value(&value).unwrap();
        assert_eq!(column_names(&out), vec!["n", "color_red", "color_blue"]);
    }

    #[test]
    fn test_encode_value_rejects_scalar() {
        let err = DummyEncoder::default()
            .encode_value(&serde_json::json!(42))
            .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedInput(_)));
    }

    #[test]
    fn test_fitted_reuses_categories() {
        let enc = encoder(DummyEncoderConfig::builder().columns(["color"]));
        let fitted = enc.fit(&color_df()).unwrap();

        let later = df!["id" => [9i64], "color" => ["green"]].unwrap();
        let out = fitted.transform(&later).unwrap();

        assert_eq!(
            column_names(&out),
            vec!["id", "color_red", "color_blue", "color_green"]
        );
        assert_eq!(flags(&out, "color_green"), vec![1]);
        assert_eq!(
            fitted.feature_names(),
            vec!["color_red", "color_blue", "color_green"]
        );
    }

    #[test]
    fn test_fitted_unknown_category_errors() {
        let enc = encoder(DummyEncoderConfig::builder().columns(["color"]));
        let fitted = enc.fit(&color_df()).unwrap();

        let later = df!["id" => [9i64], "color" => ["purple"]].unwrap();
        let err = fitted.transform(&later).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnknownCategory { ref column, ref category }
                if column == "color" && category == "purple"
        ));
    }

    #[test]
    fn test_fitted_unknown_category_ignored() {
        let enc = encoder(
            DummyEncoderConfig::builder()
                .columns(["color"])
                .handle_unknown(HandleUnknown::Ignore),
        );
        let fitted = enc.fit(&color_df()).unwrap();

        let later = df!["id" => [9i64], "color" => ["purple"]].unwrap();
        let out = fitted.transform(&later).unwrap();
        assert_eq!(flags(&out, "color_red"), vec![0]);
        assert_eq!(flags(&out, "color_blue"), vec![0]);
        assert_eq!(flags(&out, "color_green"), vec![0]);
    }

    #[test]
    fn test_fitted_requires_fit_columns() {
        let fitted = DummyEncoder::default().fit(&color_df()).unwrap();
        let later = df!["color" => ["red"]].unwrap();
        assert!(fitted.transform(&later).unwrap_err().is_missing_column());
    }

    #[test]
    fn test_fit_transform_matches_encode() {
        let enc = encoder(
            DummyEncoderConfig::builder()
                .columns(["color"])
                .drop_first(true),
        );
        let df = color_df();
        assert!(enc.fit_transform(&df).unwrap().equals(&enc.encode(&df).unwrap()));
    }
}
