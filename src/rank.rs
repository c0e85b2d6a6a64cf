//! Power-iteration PageRank over a dense weighted adjacency matrix.
//!
//! Used by the graph-based sentence features (LexRank, TextRank). Edge
//! weights are normalized per row; rows with no outgoing weight spread their
//! mass uniformly so scores always sum to 1.

use ndarray::{Array1, Array2, Axis};

use crate::types::SummarizerConfig;

/// Result of a PageRank run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Score per node, summing to 1.
    pub scores: Vec<f64>,
    /// Whether the L1 delta dropped below the threshold.
    pub converged: bool,
    /// Iterations performed.
    pub iterations: usize,
    /// L1 delta between the last two iterations.
    pub delta: f64,
}

/// PageRank with damping and uniform teleport.
#[derive(Debug, Clone)]
pub struct PageRank {
    damping: f64,
    max_iterations: usize,
    threshold: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRank {
    pub fn new() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }

    /// Damping, iteration cap and threshold taken from `cfg`.
    pub fn from_config(cfg: &SummarizerConfig) -> Self {
        Self::new()
            .with_damping(cfg.damping)
            .with_max_iterations(cfg.max_iterations)
            .with_threshold(cfg.convergence_threshold)
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rank the nodes of a square, non-negative weight matrix.
    ///
    /// `weights[[i, j]]` is the weight of the edge `i -> j`.
    pub fn run(&self, weights: &Array2<f64>) -> PageRankResult {
        let n = weights.nrows();
        if n == 0 {
            return PageRankResult {
                scores: Vec::new(),
                converged: true,
                iterations: 0,
                delta: 0.0,
            };
        }

        let out_weight: Array1<f64> = weights.sum_axis(Axis(1));
        let uniform = 1.0 / n as f64;
        let mut scores = Array1::from_elem(n, uniform);
        let mut converged = false;
        let mut iterations = 0;
        let mut delta = 0.0;

        while iterations < self.max_iterations {
            iterations += 1;

            // Mass held by dangling rows is redistributed uniformly.
            let dangling: f64 = scores
                .iter()
                .zip(out_weight.iter())
                .filter(|&(_, &w)| w <= 0.0)
                .map(|(s, _)| s)
                .sum();

            let share: Array1<f64> = scores
                .iter()
                .zip(out_weight.iter())
                .map(|(&s, &w)| if w > 0.0 { s / w } else { 0.0 })
                .collect();

            let flow = weights.t().dot(&share);
            let base = (1.0 - self.damping) * uniform + self.damping * dangling * uniform;
            let next = flow.mapv(|f| base + self.damping * f);

            delta = (&next - &scores).mapv(f64::abs).sum();
            scores = next;

            if delta < self.threshold {
                converged = true;
                break;
            }
        }

        PageRankResult {
            scores: scores.to_vec(),
            converged,
            iterations,
            delta,
        }
    }
}
