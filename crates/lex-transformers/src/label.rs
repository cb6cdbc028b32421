//! Label encoding.
//!
//! Maps labels to `UInt32` codes `0..n_classes`, where the classes are the
//! distinct labels seen at fit time sorted ascending in their native order.
//! Works on a target `Series` directly, or as a frame step that rewrites one
//! named column in place.

use crate::error::{Result, TransformError};
use crate::transformer::{FittedTransformer, Transformer};
use crate::utils::{category_strings, column_series};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Label encoder for target labels.
///
/// # Example
///
/// ```rust,ignore
/// use lex_transformers::LabelEncoder;
///
/// let fitted = LabelEncoder::new().fit_series(&labels)?;
/// let codes = fitted.transform_series(&labels)?;
/// let back = fitted.inverse_transform(&codes)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    column: Option<String>,
}

impl LabelEncoder {
    /// Create an encoder for a standalone label Series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder that rewrites `column` when used as a frame step.
    pub fn for_column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
        }
    }

    /// Column this encoder rewrites in frame mode, if any.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Learn the sorted classes of `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::EmptyData`] for an empty Series and
    /// [`TransformError::NullLabel`] if any label is null.
    pub fn fit_series(&self, labels: &Series) -> Result<FittedLabelEncoder> {
        if labels.is_empty() {
            return Err(TransformError::EmptyData(format!(
                "Cannot fit label encoder on empty column '{}'",
                labels.name()
            )));
        }
        if labels.null_count() > 0 {
            return Err(TransformError::NullLabel(labels.name().to_string()));
        }

        let classes = labels.unique()?.sort(SortOptions::default())?;
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in category_strings(&classes)?.into_iter().flatten().enumerate() {
            index.insert(class, code as u32);
        }
        debug!(
            "Label encoder fitted on '{}': {} classes",
            labels.name(),
            classes.len()
        );

        Ok(FittedLabelEncoder {
            column: self.column.clone(),
            classes,
            index,
        })
    }

    /// Fit on `labels` and encode them.
    pub fn fit_transform_series(&self, labels: &Series) -> Result<Series> {
        self.fit_series(labels)?.transform_series(labels)
    }

    fn frame_column(&self) -> Result<&str> {
        self.column.as_deref().ok_or_else(|| {
            TransformError::InvalidConfig(
                "label encoder needs a column to run as a frame step".to_string(),
            )
        })
    }
}

impl Transformer for LabelEncoder {
    type Fitted = FittedLabelEncoder;

    fn name(&self) -> &'static str {
        "label_encoder"
    }

    fn fit(&self, df: &DataFrame) -> Result<FittedLabelEncoder> {
        let column = self.frame_column()?;
        self.fit_series(&column_series(df, column)?)
    }
}

/// A label encoder with learned classes.
#[derive(Debug, Clone)]
pub struct FittedLabelEncoder {
    column: Option<String>,
    classes: Series,
    index: HashMap<String, u32>,
}

impl FittedLabelEncoder {
    /// The learned classes, sorted ascending.
    pub fn classes(&self) -> &Series {
        &self.classes
    }

    /// Number of learned classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Encode `labels` as `UInt32` codes.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnseenLabel`] for the first label that was
    /// not present at fit time and [`TransformError::NullLabel`] for nulls.
    pub fn transform_series(&self, labels: &Series) -> Result<Series> {
        let mut codes = Vec::with_capacity(labels.len());
        for value in category_strings(labels)? {
            let label = value.ok_or_else(|| TransformError::NullLabel(labels.name().to_string()))?;
            match self.index.get(&label) {
                Some(code) => codes.push(*code),
                None => {
                    return Err(TransformError::UnseenLabel {
                        column: labels.name().to_string(),
                        label,
                    });
                }
            }
        }
        Ok(Series::new(labels.name().clone(), codes))
    }

    /// Map codes back to the original labels.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidLabelCode`] for a code outside
    /// `0..n_classes` and [`TransformError::NullLabel`] for null codes.
    pub fn inverse_transform(&self, codes: &Series) -> Result<Series> {
        let codes_u64 = codes.cast(&DataType::UInt64)?;
        let mut indices: Vec<IdxSize> = Vec::with_capacity(codes.len());
        for code in codes_u64.u64()?.into_iter() {
            let code = code.ok_or_else(|| TransformError::NullLabel(codes.name().to_string()))?;
            if code >= self.classes.len() as u64 {
                return Err(TransformError::InvalidLabelCode {
                    code,
                    n_classes: self.classes.len(),
                });
            }
            indices.push(code as IdxSize);
        }

        let idx = IdxCa::from_vec(codes.name().clone(), indices);
        let mut labels = self.classes.take(&idx)?;
        labels.rename(codes.name().clone());
        Ok(labels)
    }
}

impl FittedTransformer for FittedLabelEncoder {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let column = self.column.as_deref().ok_or_else(|| {
            TransformError::InvalidConfig(
                "label encoder needs a column to run as a frame step".to_string(),
            )
        })?;
        let codes = self.transform_series(&column_series(df, column)?)?;
        let mut out = df.clone();
        out.replace(column, codes)?;
        Ok(out)
    }
}
