//! Property-based tests using proptest

use proptest::prelude::*;
use rapid_summarizer::*;

/// Annotator whose outputs are filled with a constant.
struct Stub {
    name: String,
    requires: Vec<String>,
    returns: Vec<String>,
}

impl Annotator for Stub {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> Vec<&str> {
        self.requires.iter().map(String::as_str).collect()
    }

    fn returns(&self) -> Vec<&str> {
        self.returns.iter().map(String::as_str).collect()
    }

    fn build(&mut self, _cfg: &SummarizerConfig) -> Result<()> {
        panic!("{} must not be built", self.name);
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        for field in &self.returns {
            for row in 0..frame.len() {
                frame.set(row, field, Value::Integer(1))?;
            }
        }
        Ok((frame, matrices))
    }
}

/// Same contract as [`Stub`] but buildable.
struct Buildable(Stub);

impl Annotator for Buildable {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn requires(&self) -> Vec<&str> {
        self.0.requires()
    }

    fn returns(&self) -> Vec<&str> {
        self.0.returns()
    }

    fn process(
        &self,
        frame: Frame,
        matrices: MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        self.0.process(frame, matrices, cfg)
    }
}

/// A random DAG: annotator `i` returns `f{i}` and may require any `f{j}`
/// with `j < i`. Returned in a shuffled registration order.
fn dag() -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
    (2usize..10)
        .prop_flat_map(|n| {
            let deps: Vec<_> = (0..n)
                .map(|i| proptest::collection::vec(0..i.max(1), 0..=i.min(3)))
                .collect();
            (deps, Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        })
        .prop_map(|(deps, order)| {
            order
                .into_iter()
                .map(|i| {
                    let mut reqs: Vec<usize> = deps[i].iter().copied().filter(|&j| j < i).collect();
                    reqs.sort_unstable();
                    reqs.dedup();
                    (i, reqs)
                })
                .collect()
        })
}

fn node(i: usize, reqs: &[usize]) -> Stub {
    Stub {
        name: format!("a{i}"),
        requires: reqs.iter().map(|j| format!("f{j}")).collect(),
        returns: vec![format!("f{i}")],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn test_producers_precede_consumers(layout in dag()) {
        let annotators: Vec<Box<dyn Annotator>> = layout
            .iter()
            .map(|(i, reqs)| Box::new(Buildable(node(*i, reqs))) as Box<dyn Annotator>)
            .collect();

        let pipeline = Pipeline::build(
            "dag",
            annotators,
            &SummarizerConfig::default(),
            &mut NoopObserver,
        )
        .unwrap();
        let order = pipeline.annotator_names();
        prop_assert_eq!(order.len(), layout.len());

        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        for (i, reqs) in &layout {
            let consumer = position(&format!("a{}", i));
            for j in reqs {
                let producer = position(&format!("a{}", j));
                prop_assert!(producer < consumer, "a{} ran after a{}", j, i);
            }
        }

        let (frame, _) = pipeline
            .run(Input::from(["x", "y"]), None, &SummarizerConfig::default(), &mut NoopObserver)
            .unwrap();
        for (i, _) in &layout {
            let field = format!("f{}", i);
            prop_assert!(frame.is_complete(&field), "{} left unknown", field);
        }
    }

    #[test]
    fn test_order_is_deterministic(layout in dag()) {
        let build = || {
            let annotators: Vec<Box<dyn Annotator>> = layout
                .iter()
                .map(|(i, reqs)| Box::new(Buildable(node(*i, reqs))) as Box<dyn Annotator>)
                .collect();
            Pipeline::build("dag", annotators, &SummarizerConfig::default(), &mut NoopObserver)
                .unwrap()
                .annotator_names()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(build(), build());
    }

    #[test]
    fn test_rings_are_cyclic(k in 2usize..8) {
        // a{i} requires f{i} and returns f{i+1 mod k}.
        let annotators: Vec<Box<dyn Annotator>> = (0..k)
            .map(|i| {
                Box::new(Stub {
                    name: format!("a{i}"),
                    requires: vec![format!("f{i}")],
                    returns: vec![format!("f{}", (i + 1) % k)],
                }) as Box<dyn Annotator>
            })
            .collect();

        // `Stub::build` panics, so reaching the assertion proves no build ran.
        let err = Pipeline::build("ring", annotators, &SummarizerConfig::default(), &mut NoopObserver)
            .unwrap_err();
        match err {
            SummarizerError::CyclicDependency { cycle } => {
                prop_assert_eq!(cycle.first(), cycle.last());
                prop_assert_eq!(cycle.len(), 2 * k + 1);
            }
            other => prop_assert!(false, "expected cycle, got {}", other),
        }
    }

    #[test]
    fn test_pagerank_scores_sum_to_one(
        weights in proptest::collection::vec(0.0f64..1.0, 1..64)
    ) {
        let n = (weights.len() as f64).sqrt() as usize;
        let matrix = ndarray::Array2::from_shape_fn((n, n), |(i, j)| weights[i * n + j]);
        let result = PageRank::new().with_max_iterations(200).run(&matrix);

        let sum: f64 = result.scores.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-6, "Scores sum to {} instead of 1", sum);
    }

    #[test]
    fn test_summary_respects_limits(
        sentences in 0usize..6,
        words in proptest::option::of(5usize..40)
    ) {
        let text = "Rust makes systems programming safe. Ownership tracks every value. \
                    Borrowing lets code share data without copies. The compiler checks lifetimes. \
                    Cargo builds and tests crates. Traits describe shared behavior.";
        let mut config = SummarizerConfig::default().with_summary_sentences(sentences);
        config.summary_words = words;

        let mut system = System::lexrank(config).unwrap();
        let summary = system.summarize([text]).unwrap();

        if sentences > 0 {
            prop_assert!(summary.len() <= sentences);
        }
        if let Some(budget) = words {
            prop_assert!(summary.word_count() <= budget);
        }
    }

    #[test]
    fn test_config_validation_properties(
        damping in 0.0f64..=1.0,
        lambda in 0.0f64..=1.0,
        threshold in 0.0f64..1.0
    ) {
        let config = SummarizerConfig::default()
            .with_damping(damping)
            .with_mmr_lambda(lambda)
            .with_lexrank_threshold(threshold);
        prop_assert!(config.validate().is_ok());
    }
}
