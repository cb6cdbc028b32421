//! Core fit/transform traits.
//!
//! A transformer is split in two values:
//! - [`Transformer`]: the unfitted configuration. `fit` reads a table and
//!   returns a fitted value without touching `self`.
//! - [`FittedTransformer`]: what was learned from the table, ready to
//!   transform that table or any later one.
//!
//! [`crate::Pipeline`] composes transformers through these traits.

use crate::error::Result;
use polars::prelude::*;

/// An unfitted transformer over data frames.
///
/// # Example
///
/// ```rust,ignore
/// use lex_transformers::{DummyEncoder, FittedTransformer, Transformer};
///
/// let encoder = DummyEncoder::default();
/// let fitted = encoder.fit(&train)?;
/// let encoded = fitted.transform(&test)?;
/// ```
pub trait Transformer: Send + Sync {
    /// The fitted transformer type.
    type Fitted: FittedTransformer + 'static;

    /// Short name used in logs and error context.
    fn name(&self) -> &'static str;

    /// Learn whatever the transformer needs from `df`.
    fn fit(&self, df: &DataFrame) -> Result<Self::Fitted>;

    /// Fit on `df` and transform it in one step.
    fn fit_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }
}

/// A fitted transformer ready to transform data frames.
pub trait FittedTransformer: Send + Sync {
    /// Transform `df` using the fitted state.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;
}
