//! Pipeline runner — builds the stage order and executes it.
//!
//! [`Pipeline::build`] turns an explicit list of annotators into an ordered,
//! built pipeline:
//!
//! 1. snapshot each annotator's contract,
//! 2. validate the composition (names, self-dependencies, producers),
//! 3. build the dependency graph and sort it topologically,
//! 4. call every annotator's `build` once, in that order.
//!
//! A built pipeline is immutable. [`Pipeline::run`] allocates fresh stores
//! for each call and threads them through every stage whose outputs are not
//! yet known, so one pipeline can serve any number of calls, concurrently if
//! shared behind an `Arc`.

use rustc_hash::FxHashMap;

use crate::errors::{Result, SummarizerError};
use crate::pipeline::graph::DependencyGraph;
use crate::pipeline::observer::{PipelineObserver, StageClock, StageReport};
use crate::pipeline::store::{Frame, Input, MatrixStore};
use crate::pipeline::traits::{Annotator, AnnotatorDescriptor};
use crate::pipeline::validation::ValidationEngine;
use crate::types::SummarizerConfig;

/// Emit a build/process line: INFO in verbose mode, DEBUG otherwise.
macro_rules! trace_line {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

// ============================================================================
// Stage
// ============================================================================

/// One built annotator together with its contract snapshot.
#[derive(Debug)]
pub struct Stage {
    descriptor: AnnotatorDescriptor,
    annotator: Box<dyn Annotator>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &AnnotatorDescriptor {
        &self.descriptor
    }

    /// Returns `true` if any declared output is unknown anywhere.
    ///
    /// Memoization is whole-output: a single unknown cell in any declared
    /// column reruns the entire stage.
    pub fn needs_run(&self, frame: &Frame, matrices: &MatrixStore) -> bool {
        self.descriptor
            .returns
            .iter()
            .any(|f| !frame.is_complete(f))
            || self
                .descriptor
                .ndarray_returns
                .iter()
                .any(|k| !matrices.is_known(k))
    }

    /// Every declared name must have a slot in the stores.
    fn check_schema(&self, frame: &Frame, matrices: &MatrixStore) -> Result<()> {
        if let Some(field) = self.descriptor.fields().find(|f| !frame.has_column(f)) {
            return Err(SummarizerError::schema_mismatch(self.name(), field));
        }
        if let Some(key) = self
            .descriptor
            .matrix_keys()
            .find(|k| !matrices.contains(k))
        {
            return Err(SummarizerError::schema_mismatch(self.name(), key));
        }
        Ok(())
    }

    /// Declared outputs still unknown after `process`.
    fn unfilled_outputs(&self, frame: &Frame, matrices: &MatrixStore) -> Vec<String> {
        let fields = self
            .descriptor
            .returns
            .iter()
            .filter(|f| !frame.is_complete(f));
        let keys = self
            .descriptor
            .ndarray_returns
            .iter()
            .filter(|k| !matrices.is_known(k));
        fields.chain(keys).cloned().collect()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An ordered, built, immutable sequence of annotators.
#[derive(Debug)]
pub struct Pipeline {
    system: String,
    stages: Vec<Stage>,
    graph: DependencyGraph,
    fields: Vec<String>,
    matrix_keys: Vec<String>,
}

impl Pipeline {
    /// Order and build `annotators` for the system named `system`.
    ///
    /// Fails with `Composition` when validation finds errors and with
    /// `CyclicDependency` when no order exists; in both cases no annotator
    /// has been built.
    pub fn build(
        system: impl Into<String>,
        annotators: Vec<Box<dyn Annotator>>,
        cfg: &SummarizerConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<Self> {
        let system = system.into();
        let descriptors: Vec<AnnotatorDescriptor> = annotators
            .iter()
            .map(|a| AnnotatorDescriptor::of(a.as_ref()))
            .collect();

        let report = ValidationEngine::with_defaults().validate(&descriptors);
        for warning in report.warnings() {
            tracing::warn!(system = %system, "{}", warning);
        }
        report.into_result()?;

        let graph = DependencyGraph::from_descriptors(&descriptors);
        let order: Vec<String> = graph
            .annotator_order()?
            .into_iter()
            .map(str::to_string)
            .collect();

        // Names are unique after validation.
        let mut pending: FxHashMap<String, Stage> = descriptors
            .into_iter()
            .zip(annotators)
            .map(|(descriptor, annotator)| {
                (
                    descriptor.name.clone(),
                    Stage {
                        descriptor,
                        annotator,
                    },
                )
            })
            .collect();

        let mut stages = Vec::with_capacity(order.len());
        for name in &order {
            let mut stage = pending.remove(name).ok_or_else(|| {
                SummarizerError::schema_mismatch(name.as_str(), name.as_str())
            })?;
            trace_line!(cfg.verbose, "{} ({}) build", system, name);
            observer.on_build(&system, name);
            stage.annotator.build(cfg)?;
            stages.push(stage);
        }

        let mut fields: Vec<String> = Vec::new();
        let mut matrix_keys: Vec<String> = Vec::new();
        for stage in &stages {
            for f in stage.descriptor.fields() {
                if !fields.iter().any(|x| x == f) {
                    fields.push(f.to_string());
                }
            }
            for k in stage.descriptor.matrix_keys() {
                if !matrix_keys.iter().any(|x| x == k) {
                    matrix_keys.push(k.to_string());
                }
            }
        }

        Ok(Self {
            system,
            stages,
            graph,
            fields,
            matrix_keys,
        })
    }

    /// Name of the owning system.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Annotator names in execution order.
    pub fn annotator_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Union of every declared field, in first-use order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Union of every declared matrix key, in first-use order.
    pub fn matrix_keys(&self) -> &[String] {
        &self.matrix_keys
    }

    /// Allocate the stores for one run.
    ///
    /// Input shape is validated before anything is allocated. Existing
    /// columns and matrix slots (caller-supplied data) are kept; every other
    /// declared name gets an all-unknown column or slot.
    pub fn allocate(
        &self,
        input: Input,
        matrices: Option<MatrixStore>,
    ) -> Result<(Frame, MatrixStore)> {
        let mut frame = match input {
            Input::Texts(texts) => {
                if texts.is_empty() {
                    return Err(SummarizerError::bad_input("no input items"));
                }
                Frame::from_texts(texts)
            }
            Input::Frame(mut frame) => {
                if frame.is_empty() {
                    return Err(SummarizerError::bad_input("input frame has no rows"));
                }
                frame.check_shape()?;
                frame.fill_doc_ids();
                frame
            }
        };
        let mut matrices = matrices.unwrap_or_default();

        for field in &self.fields {
            frame.ensure_column(field);
        }
        for key in &self.matrix_keys {
            matrices.allocate(key);
        }

        Ok((frame, matrices))
    }

    /// Walk the stages once, running each one whose outputs are unknown.
    ///
    /// Both stores are moved into every processed stage and replaced by the
    /// ones it returns. After each processed stage every declared output
    /// must be known, otherwise the run fails with `ContractViolation`.
    pub fn execute(
        &self,
        mut frame: Frame,
        mut matrices: MatrixStore,
        cfg: &SummarizerConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<(Frame, MatrixStore)> {
        for stage in &self.stages {
            stage.check_schema(&frame, &matrices)?;

            let _span = tracing::debug_span!(
                "pipeline_stage",
                system = %self.system,
                annotator = %stage.name()
            )
            .entered();

            if !stage.needs_run(&frame, &matrices) {
                tracing::debug!("{} ({}) skip", self.system, stage.name());
                observer.on_stage_skip(&self.system, stage.name());
                observer.on_stage_end(&self.system, stage.name(), &StageReport::skipped());
                continue;
            }

            trace_line!(cfg.verbose, "{} ({}) process", self.system, stage.name());
            observer.on_stage_start(&self.system, stage.name());
            let clock = StageClock::start();

            let (next_frame, next_matrices) = stage.annotator.process(frame, matrices, cfg)?;
            frame = next_frame;
            matrices = next_matrices;

            let missing = stage.unfilled_outputs(&frame, &matrices);
            if !missing.is_empty() {
                return Err(SummarizerError::contract_violation(stage.name(), missing));
            }

            observer.on_stage_end(
                &self.system,
                stage.name(),
                &StageReport::processed(clock.elapsed()),
            );
        }

        Ok((frame, matrices))
    }

    /// Allocate fresh stores for `input` and execute every stage.
    pub fn run(
        &self,
        input: Input,
        matrices: Option<MatrixStore>,
        cfg: &SummarizerConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<(Frame, MatrixStore)> {
        let (frame, matrices) = self.allocate(input, matrices)?;
        self.execute(frame, matrices, cfg, observer)
    }
}
