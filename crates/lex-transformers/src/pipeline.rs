//! Sequential composition of transformers.
//!
//! [`Pipeline::fit`] fits every step on the output of the previously fitted
//! step and returns a [`FittedPipeline`] that replays the fitted steps in the
//! same order. Errors are wrapped with the failing step's position and name;
//! their error code is preserved.

use crate::error::{Result, ResultExt};
use crate::transformer::{FittedTransformer, Transformer};
use polars::prelude::*;
use tracing::{debug, info};

/// Object-safe view of a [`Transformer`], so steps of different types can
/// share one pipeline.
trait Step: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit_boxed(&self, df: &DataFrame) -> Result<Box<dyn FittedTransformer>>;
}

impl<T: Transformer> Step for T {
    fn name(&self) -> &'static str {
        Transformer::name(self)
    }

    fn fit_boxed(&self, df: &DataFrame) -> Result<Box<dyn FittedTransformer>> {
        Ok(Box::new(self.fit(df)?))
    }
}

/// An ordered list of unfitted steps.
///
/// # Example
///
/// ```rust,ignore
/// use lex_transformers::{ColumnSelector, DummyEncoder, LabelEncoder, Pipeline};
///
/// let pipeline = Pipeline::builder()
///     .step(ColumnSelector::drop(["id"])?)
///     .step(LabelEncoder::for_column("species"))
///     .step(DummyEncoder::new(config)?)
///     .build();
///
/// let fitted = pipeline.fit(&train)?;
/// let encoded = fitted.transform(&test)?;
/// ```
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Fit every step in order.
    ///
    /// Each step is fitted on the output of the steps before it.
    pub fn fit(&self, df: &DataFrame) -> Result<FittedPipeline> {
        info!("Fitting pipeline with {} steps", self.steps.len());
        let mut fitted = Vec::with_capacity(self.steps.len());
        let mut current = df.clone();

        for (i, step) in self.steps.iter().enumerate() {
            let context = format!("Step {} ({})", i + 1, step.name());
            debug!("{}: fitting on frame of shape {:?}", context, current.shape());

            let fitted_step = step.fit_boxed(&current).context(context.clone())?;
            current = fitted_step.transform(&current).context(context)?;
            fitted.push(NamedStep {
                name: step.name(),
                step: fitted_step,
            });
        }

        Ok(FittedPipeline { steps: fitted })
    }

    /// Fit on `df` and return the transformed `df`.
    pub fn fit_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Box<dyn Step>>,
}

impl PipelineBuilder {
    /// Append a step.
    pub fn step<T: Transformer + 'static>(mut self, step: T) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline { steps: self.steps }
    }
}

struct NamedStep {
    name: &'static str,
    step: Box<dyn FittedTransformer>,
}

/// A pipeline whose steps have all been fitted.
pub struct FittedPipeline {
    steps: Vec<NamedStep>,
}

static_assertions::assert_impl_all!(FittedPipeline: Send, Sync);

impl FittedPipeline {
    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name).collect()
    }
}

impl FittedTransformer for FittedPipeline {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for (i, step) in self.steps.iter().enumerate() {
            current = step
                .step
                .transform(&current)
                .context(format!("Step {} ({})", i + 1, step.name))?;
        }
        Ok(current)
    }
}

impl std::fmt::Debug for FittedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FittedPipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
