//! Pipeline-Ready Tabular Transformers
//!
//! Small fit/transform adapters over Polars data frames for the preprocessing
//! steps that sit in front of a model.
//!
//! # Overview
//!
//! - **Dummy Encoding**: replace categorical columns with 0/1 indicator columns
//! - **Column Selection**: keep a list of columns, or drop it
//! - **Label Encoding**: map target labels to integer codes and back
//! - **Frame Conversion**: build a DataFrame from JSON records, rows, or columns
//! - **Pipelines**: chain any of the above; fit once, transform many times
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_transformers::{DummyEncoder, DummyEncoderConfig};
//! use polars::prelude::*;
//!
//! let df = df!["color" => ["red", "blue", "red", "green"]]?;
//!
//! let encoder = DummyEncoder::new(
//!     DummyEncoderConfig::builder()
//!         .columns(["color"])
//!         .drop_first(true)
//!         .build()?,
//! )?;
//!
//! // color_blue, color_green
//! let encoded = encoder.encode(&df)?;
//! ```
//!
//! # Fit and Transform
//!
//! Every transformer implements [`Transformer`]. `fit` never changes the
//! transformer; it returns a separate [`FittedTransformer`] holding whatever
//! was learned, which is then applied to new frames:
//!
//! ```rust,ignore
//! use lex_transformers::{ColumnSelector, DummyEncoder, FittedTransformer, LabelEncoder, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .step(ColumnSelector::drop(["id"])?)
//!     .step(LabelEncoder::for_column("species"))
//!     .step(DummyEncoder::default())
//!     .build();
//!
//! let fitted = pipeline.fit(&train)?;
//! let features = fitted.transform(&test)?;
//! ```
//!
//! # Errors
//!
//! All operations return [`TransformError`]. Missing columns, non-tabular
//! input, and unseen labels are distinct variants:
//!
//! ```rust,ignore
//! match ColumnSelector::keep(["nonexistent"])?.select(&df) {
//!     Err(e) if e.is_missing_column() => println!("{}", e),
//!     other => { /* ... */ }
//! }
//! ```

pub mod config;
pub mod dummy;
pub mod error;
pub mod frame;
pub mod label;
pub mod pipeline;
pub mod selector;
pub mod transformer;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ColumnSelectorConfig, ColumnSelectorConfigBuilder, ConfigValidationError,
    DummyEncoderConfig, DummyEncoderConfigBuilder, HandleUnknown,
};
pub use dummy::{ColumnCategories, DummyEncoder, FittedDummyEncoder};
pub use error::{Result as TransformResult, ResultExt, TransformError};
pub use frame::{DataFrameConverter, frame_from_json};
pub use label::{FittedLabelEncoder, LabelEncoder};
pub use pipeline::{FittedPipeline, Pipeline, PipelineBuilder};
pub use selector::{ColumnSelector, FittedColumnSelector};
pub use transformer::{FittedTransformer, Transformer};
