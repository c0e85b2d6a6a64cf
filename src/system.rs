//! Summarizer systems: an annotator composition plus a summary builder.
//!
//! A [`System`] owns its annotators until the pipeline is built, either
//! explicitly with [`System::build_pipeline`] or lazily on the first call to
//! [`System::summarize`] / [`System::annotate`]. The built pipeline is then
//! reused by every later call; a failed build is remembered and reported
//! again on each call.

use crate::annotators::{
    BinaryBow, Centroid, Lede, LexRank, Mmr, RawBow, SentenceTokenizer, TextRank, TfIdf,
    TfIdfCosineSimilarity, WordTokenizer,
};
use crate::errors::{Result, SummarizerError};
use crate::pipeline::{
    Annotator, Frame, Input, MatrixStore, NoopObserver, Pipeline, PipelineObserver,
};
use crate::summary::{FeatureRanker, Summary, SummaryBuilder};
use crate::types::{SummarizerConfig, F_CENTROID, F_LEDE, F_LEXRANK, F_MMR, F_TEXTRANK};

enum PipelineState {
    Pending(Vec<Box<dyn Annotator>>),
    Built(Pipeline),
    Failed(SummarizerError),
}

/// A named summarizer.
pub struct System {
    name: String,
    config: SummarizerConfig,
    state: PipelineState,
    builder: Box<dyn SummaryBuilder>,
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("name", &self.name)
            .field("built", &self.is_built())
            .field("summary_builder", &self.builder.name())
            .finish()
    }
}

impl System {
    /// Ranks sentences by position in their document.
    pub fn lede(config: SummarizerConfig) -> Result<Self> {
        SystemBuilder::new("LedeSummarizer")
            .with_config(config)
            .annotator(SentenceTokenizer::new())
            .annotator(Lede)
            .rank_by(F_LEDE)
            .build()
    }

    /// Ranks sentences by similarity to the TF-IDF centroid.
    pub fn centroid(config: SummarizerConfig) -> Result<Self> {
        SystemBuilder::new("CentroidSummarizer")
            .with_config(config)
            .annotator(SentenceTokenizer::new())
            .annotator(WordTokenizer::new())
            .annotator(RawBow)
            .annotator(TfIdf)
            .annotator(Centroid)
            .rank_by(F_CENTROID)
            .build()
    }

    /// Ranks sentences by LexRank centrality.
    pub fn lexrank(config: SummarizerConfig) -> Result<Self> {
        SystemBuilder::new("LexRankSummarizer")
            .with_config(config)
            .annotator(SentenceTokenizer::new())
            .annotator(WordTokenizer::new())
            .annotator(RawBow)
            .annotator(TfIdf)
            .annotator(TfIdfCosineSimilarity)
            .annotator(LexRank)
            .rank_by(F_LEXRANK)
            .build()
    }

    /// Ranks sentences by TextRank centrality.
    pub fn textrank(config: SummarizerConfig) -> Result<Self> {
        SystemBuilder::new("TextRankSummarizer")
            .with_config(config)
            .annotator(SentenceTokenizer::new())
            .annotator(WordTokenizer::new())
            .annotator(BinaryBow)
            .annotator(TextRank)
            .rank_by(F_TEXTRANK)
            .build()
    }

    /// Ranks sentences by maximal marginal relevance.
    pub fn mmr(config: SummarizerConfig) -> Result<Self> {
        SystemBuilder::new("MmrSummarizer")
            .with_config(config)
            .annotator(SentenceTokenizer::new())
            .annotator(WordTokenizer::new())
            .annotator(RawBow)
            .annotator(TfIdf)
            .annotator(TfIdfCosineSimilarity)
            .annotator(Centroid)
            .annotator(Mmr)
            .rank_by(F_MMR)
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, PipelineState::Built(_))
    }

    /// The built pipeline, if any.
    pub fn pipeline(&self) -> Option<&Pipeline> {
        match &self.state {
            PipelineState::Built(pipeline) => Some(pipeline),
            _ => None,
        }
    }

    /// Build the pipeline now. A no-op once built.
    pub fn build_pipeline(&mut self) -> Result<&Pipeline> {
        self.build_pipeline_with(&mut NoopObserver)
    }

    /// Build the pipeline now, reporting each build step to `observer`.
    pub fn build_pipeline_with(
        &mut self,
        observer: &mut impl PipelineObserver,
    ) -> Result<&Pipeline> {
        if let PipelineState::Pending(_) = self.state {
            let state = std::mem::replace(&mut self.state, PipelineState::Pending(Vec::new()));
            if let PipelineState::Pending(annotators) = state {
                let built = Pipeline::build(&self.name, annotators, &self.config, observer)
                    .and_then(|pipeline| {
                        check_summary_inputs(self.builder.as_ref(), &pipeline)?;
                        Ok(pipeline)
                    });
                self.state = match built {
                    Ok(pipeline) => PipelineState::Built(pipeline),
                    Err(err) => PipelineState::Failed(err),
                };
            }
        }

        match &self.state {
            PipelineState::Built(pipeline) => Ok(pipeline),
            PipelineState::Failed(err) => Err(err.clone()),
            PipelineState::Pending(_) => Err(SummarizerError::invalid_config(format!(
                "{}: pipeline was not built",
                self.name
            ))),
        }
    }

    /// Run every annotator over `input`, returning the filled stores.
    pub fn annotate(
        &mut self,
        input: impl Into<Input>,
        matrices: Option<MatrixStore>,
    ) -> Result<(Frame, MatrixStore)> {
        self.annotate_with(input, matrices, &mut NoopObserver)
    }

    /// [`annotate`](Self::annotate) with build and stage hooks.
    pub fn annotate_with(
        &mut self,
        input: impl Into<Input>,
        matrices: Option<MatrixStore>,
        observer: &mut impl PipelineObserver,
    ) -> Result<(Frame, MatrixStore)> {
        self.build_pipeline_with(observer)?;
        let Self { config, state, .. } = &*self;
        match state {
            PipelineState::Built(pipeline) => {
                pipeline.run(input.into(), matrices, config, observer)
            }
            PipelineState::Failed(err) => Err(err.clone()),
            PipelineState::Pending(_) => {
                Err(SummarizerError::invalid_config("pipeline was not built"))
            }
        }
    }

    /// Summarize `input`.
    pub fn summarize(&mut self, input: impl Into<Input>) -> Result<Summary> {
        self.summarize_with(input, None)
    }

    /// Summarize `input`, seeding the matrix store with `matrices`.
    ///
    /// Any supplied matrix (or any field already present in a frame input)
    /// counts as known, so its producer is skipped.
    pub fn summarize_with(
        &mut self,
        input: impl Into<Input>,
        matrices: Option<MatrixStore>,
    ) -> Result<Summary> {
        let (frame, matrices) = self.annotate(input, matrices)?;
        self.builder.summarize(&frame, &matrices, &self.config)
    }
}

/// Every field the summary builder reads must be declared by some annotator.
fn check_summary_inputs(builder: &dyn SummaryBuilder, pipeline: &Pipeline) -> Result<()> {
    match builder
        .requires()
        .into_iter()
        .find(|field| !pipeline.fields().iter().any(|f| f == field))
    {
        Some(field) => Err(SummarizerError::schema_mismatch(builder.name(), field)),
        None => Ok(()),
    }
}

// ============================================================================
// SystemBuilder
// ============================================================================

/// Builder for custom compositions.
pub struct SystemBuilder {
    name: String,
    config: SummarizerConfig,
    annotators: Vec<Box<dyn Annotator>>,
    builder: Option<Box<dyn SummaryBuilder>>,
}

impl SystemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: SummarizerConfig::default(),
            annotators: Vec::new(),
            builder: None,
        }
    }

    pub fn with_config(mut self, config: SummarizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Register one annotator. Registration order breaks ordering ties.
    pub fn annotator(mut self, annotator: impl Annotator + 'static) -> Self {
        self.annotators.push(Box::new(annotator));
        self
    }

    pub fn boxed_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotators.push(annotator);
        self
    }

    /// Rank sentences by the score column `feature`.
    pub fn rank_by(self, feature: impl Into<String>) -> Self {
        self.summary_builder(FeatureRanker::new(feature))
    }

    pub fn summary_builder(mut self, builder: impl SummaryBuilder + 'static) -> Self {
        self.builder = Some(Box::new(builder));
        self
    }

    /// Validate the config and create the (unbuilt) system.
    pub fn build(self) -> Result<System> {
        self.config.validate()?;
        let builder = self.builder.ok_or_else(|| {
            SummarizerError::invalid_config(format!("{}: no summary builder set", self.name))
        })?;
        Ok(System {
            name: self.name,
            config: self.config,
            state: PipelineState::Pending(self.annotators),
            builder,
        })
    }
}
