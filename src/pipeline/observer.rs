//! Pipeline observation hooks.
//!
//! A [`PipelineObserver`] is notified at every build step and stage boundary.
//! The engine also emits `tracing` events for the same points; observers are
//! for callers who want the information as data (timings in a benchmark, an
//! audit of which stages were skipped).

use std::time::{Duration, Instant};

/// Outcome of one stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// `process` ran.
    Processed,
    /// Every declared output was already known.
    Skipped,
}

/// Timing and outcome of one stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub outcome: StageOutcome,
    pub elapsed: Duration,
}

impl StageReport {
    pub fn processed(elapsed: Duration) -> Self {
        Self {
            outcome: StageOutcome::Processed,
            elapsed,
        }
    }

    pub fn skipped() -> Self {
        Self {
            outcome: StageOutcome::Skipped,
            elapsed: Duration::ZERO,
        }
    }

    pub fn was_processed(&self) -> bool {
        self.outcome == StageOutcome::Processed
    }
}

/// Wall-clock timer for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Callbacks at build steps and stage boundaries.
///
/// All methods default to no-ops.
pub trait PipelineObserver {
    /// An annotator's `build` step is about to run.
    fn on_build(&mut self, _system: &str, _annotator: &str) {}

    /// An annotator's `process` step is about to run.
    fn on_stage_start(&mut self, _system: &str, _annotator: &str) {}

    /// Every declared output of a stage was already known.
    fn on_stage_skip(&mut self, _system: &str, _annotator: &str) {}

    /// A stage finished, either processed or skipped.
    fn on_stage_end(&mut self, _system: &str, _annotator: &str, _report: &StageReport) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records builds and stage reports in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    builds: Vec<String>,
    reports: Vec<(String, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotators built, in build order.
    pub fn builds(&self) -> &[String] {
        &self.builds
    }

    /// Every stage report, in pipeline order.
    pub fn reports(&self) -> &[(String, StageReport)] {
        &self.reports
    }

    /// Names of the stages whose `process` ran.
    pub fn processed(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|(_, r)| r.was_processed())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of the stages that were skipped.
    pub fn skipped(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|(_, r)| !r.was_processed())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Sum of all stage durations.
    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed).sum()
    }

    pub fn clear(&mut self) {
        self.builds.clear();
        self.reports.clear();
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_build(&mut self, _system: &str, annotator: &str) {
        self.builds.push(annotator.to_string());
    }

    fn on_stage_end(&mut self, _system: &str, annotator: &str, report: &StageReport) {
        self.reports.push((annotator.to_string(), report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_observer_records_in_order() {
        let mut obs = StageTimingObserver::new();
        obs.on_build("sys", "a");
        obs.on_build("sys", "b");
        obs.on_stage_end("sys", "a", &StageReport::skipped());
        obs.on_stage_end("sys", "b", &StageReport::processed(Duration::from_millis(2)));

        assert_eq!(obs.builds(), &["a".to_string(), "b".to_string()]);
        assert_eq!(obs.processed(), vec!["b"]);
        assert_eq!(obs.skipped(), vec!["a"]);
        assert_eq!(obs.total(), Duration::from_millis(2));

        obs.clear();
        assert!(obs.reports().is_empty());
        assert!(obs.builds().is_empty());
    }

    #[test]
    fn test_noop_observer_accepts_everything() {
        let mut obs = NoopObserver;
        obs.on_build("sys", "a");
        obs.on_stage_start("sys", "a");
        obs.on_stage_skip("sys", "a");
        obs.on_stage_end("sys", "a", &StageReport::skipped());
    }

    #[test]
    fn test_stage_clock_is_monotonic() {
        let clock = StageClock::start();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(second >= first);
    }
}
