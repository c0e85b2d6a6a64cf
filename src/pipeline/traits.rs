//! The annotator contract.
//!
//! An [`Annotator`] is one stage of a pipeline. It declares which frame
//! fields and matrix keys it reads and which it fills, and the pipeline
//! derives the execution order from those declarations alone. Annotators are
//! registered explicitly when a system is assembled; nothing is discovered
//! by introspection.

use crate::errors::Result;
use crate::pipeline::store::{Frame, MatrixStore};
use crate::types::SummarizerConfig;

// ============================================================================
// Annotator — a declared unit of computation
// ============================================================================

/// A pipeline stage with a declared data contract.
///
/// # Contract
///
/// - **Name**: unique among the annotators of one system.
/// - **Requires / returns**: frame columns read and filled. The two sets
///   must be disjoint; the same holds for the matrix-key pair.
/// - **Build**: called exactly once per pipeline build, after every
///   annotator earlier in the topological order has been built.
/// - **Process**: receives both stores by value and hands them back. On
///   return every declared output must be known for every row; the engine
///   checks this and raises `ContractViolation` otherwise. Fields outside
///   `returns` must not be modified.
///
/// `Send + Sync` lets a built pipeline be shared read-only between threads.
pub trait Annotator: Send + Sync {
    /// Stable identifier, used as graph node and registry key.
    fn name(&self) -> &str;

    /// Frame fields that must be populated before [`process`](Self::process).
    fn requires(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Frame fields filled by [`process`](Self::process).
    fn returns(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Matrix keys that must be populated before [`process`](Self::process).
    fn ndarray_requires(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Matrix keys filled by [`process`](Self::process).
    fn ndarray_returns(&self) -> Vec<&str> {
        Vec::new()
    }

    /// One-time setup, invoked in topological order while the pipeline is
    /// built.
    fn build(&mut self, _cfg: &SummarizerConfig) -> Result<()> {
        Ok(())
    }

    /// Run the stage, taking ownership of both stores and returning them.
    fn process(
        &self,
        frame: Frame,
        matrices: MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)>;
}

impl std::fmt::Debug for dyn Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("name", &self.name())
            .finish()
    }
}

// ============================================================================
// AnnotatorDescriptor — snapshot of a declared contract
// ============================================================================

/// Owned snapshot of an annotator's declared contract.
///
/// Taken once at registration so that graph construction, allocation and the
/// per-stage schema checks all see the same declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatorDescriptor {
    pub name: String,
    pub requires: Vec<String>,
    pub returns: Vec<String>,
    pub ndarray_requires: Vec<String>,
    pub ndarray_returns: Vec<String>,
}

impl AnnotatorDescriptor {
    /// Create a descriptor with an empty contract.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Snapshot the contract declared by `annotator`.
    ///
    /// Duplicates inside one list are dropped; first occurrence wins.
    pub fn of(annotator: &dyn Annotator) -> Self {
        Self {
            name: annotator.name().to_string(),
            requires: dedup(annotator.requires()),
            returns: dedup(annotator.returns()),
            ndarray_requires: dedup(annotator.ndarray_requires()),
            ndarray_returns: dedup(annotator.ndarray_returns()),
        }
    }

    pub fn with_requires<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_returns<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returns = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ndarray_requires<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ndarray_requires = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ndarray_returns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ndarray_returns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// All frame fields this annotator touches (requires, then returns).
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.requires
            .iter()
            .chain(self.returns.iter())
            .map(String::as_str)
    }

    /// All matrix keys this annotator touches (requires, then returns).
    pub fn matrix_keys(&self) -> impl Iterator<Item = &str> {
        self.ndarray_requires
            .iter()
            .chain(self.ndarray_returns.iter())
            .map(String::as_str)
    }
}

fn dedup(names: Vec<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    impl Annotator for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }

        fn requires(&self) -> Vec<&str> {
            vec!["x", "x"]
        }

        fn returns(&self) -> Vec<&str> {
            vec!["y"]
        }

        fn ndarray_returns(&self) -> Vec<&str> {
            vec!["m"]
        }

        fn process(
            &self,
            frame: Frame,
            matrices: MatrixStore,
            _cfg: &SummarizerConfig,
        ) -> Result<(Frame, MatrixStore)> {
            Ok((frame, matrices))
        }
    }

    #[test]
    fn test_descriptor_snapshots_contract() {
        let desc = AnnotatorDescriptor::of(&Doubler);
        assert_eq!(desc.name, "doubler");
        assert_eq!(desc.requires, vec!["x"]);
        assert_eq!(desc.returns, vec!["y"]);
        assert!(desc.ndarray_requires.is_empty());
        assert_eq!(desc.ndarray_returns, vec!["m"]);
    }

    #[test]
    fn test_descriptor_builder_and_iterators() {
        let desc = AnnotatorDescriptor::new("b")
            .with_requires(["x"])
            .with_returns(["y", "z"])
            .with_ndarray_requires(["m"]);
        assert_eq!(desc.fields().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(desc.matrix_keys().collect::<Vec<_>>(), vec!["m"]);
    }

    #[test]
    fn test_default_build_is_noop() {
        let mut d = Doubler;
        assert!(d.build(&SummarizerConfig::default()).is_ok());
    }

    #[test]
    fn test_debug_for_trait_object() {
        let boxed: Box<dyn Annotator> = Box::new(Doubler);
        assert!(format!("{:?}", boxed).contains("doubler"));
    }
}
