//! Dependency graph over fields, matrix keys and annotators.
//!
//! Nodes live in three tagged namespaces ([`Node`]), so a field and an
//! annotator that happen to share a name never collide. Edges run from each
//! input to the annotator that requires it and from the annotator to each of
//! its outputs. The graph is small (tens of nodes) and built once per
//! system, so it is stored as adjacency lists indexed by insertion order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::errors::{Result, SummarizerError};
use crate::pipeline::traits::AnnotatorDescriptor;

// ============================================================================
// Node
// ============================================================================

/// A vertex of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// A frame column.
    Field(String),
    /// A matrix-store slot.
    Matrix(String),
    /// An annotator.
    Annotator(String),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Field(n) | Node::Matrix(n) | Node::Annotator(n) => n,
        }
    }

    pub fn is_annotator(&self) -> bool {
        matches!(self, Node::Annotator(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Field(n) => write!(f, "field:{n}"),
            Node::Matrix(n) => write!(f, "matrix:{n}"),
            Node::Annotator(n) => write!(f, "annotator:{n}"),
        }
    }
}

// ============================================================================
// DependencyGraph
// ============================================================================

/// Directed graph with deterministic, insertion-ordered node ids.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    ids: FxHashMap<Node, usize>,
    successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of registered contracts.
    ///
    /// Annotators are visited in registration order; for each one its own
    /// node is added first, then its inputs and outputs. This insertion
    /// order is the tie-break used by [`topological_order`](Self::topological_order).
    pub fn from_descriptors<'a>(
        descriptors: impl IntoIterator<Item = &'a AnnotatorDescriptor>,
    ) -> Self {
        let mut graph = Self::new();
        for desc in descriptors {
            let ann = graph.add_node(Node::Annotator(desc.name.clone()));
            for req in &desc.requires {
                let id = graph.add_node(Node::Field(req.clone()));
                graph.add_edge(id, ann);
            }
            for req in &desc.ndarray_requires {
                let id = graph.add_node(Node::Matrix(req.clone()));
                graph.add_edge(id, ann);
            }
            for ret in &desc.returns {
                let id = graph.add_node(Node::Field(ret.clone()));
                graph.add_edge(ann, id);
            }
            for ret in &desc.ndarray_returns {
                let id = graph.add_node(Node::Matrix(ret.clone()));
                graph.add_edge(ann, id);
            }
        }
        graph
    }

    /// Add a node if absent, returning its id.
    pub fn add_node(&mut self, node: Node) -> usize {
        if let Some(&id) = self.ids.get(&node) {
            return id;
        }
        let id = self.nodes.len();
        self.ids.insert(node.clone(), id);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        id
    }

    /// Add a directed edge; repeated edges are stored once.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        if let Some(out) = self.successors.get_mut(from) {
            if !out.contains(&to) {
                out.push(to);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.ids.contains_key(node)
    }

    /// Returns `true` if the edge `from -> to` exists.
    pub fn has_edge(&self, from: &Node, to: &Node) -> bool {
        match (self.ids.get(from), self.ids.get(to)) {
            (Some(&f), Some(&t)) => self.successors[f].contains(&t),
            _ => false,
        }
    }

    /// Direct successors of a node.
    pub fn successors(&self, node: &Node) -> impl Iterator<Item = &Node> {
        self.ids
            .get(node)
            .map(|&id| self.successors[id].as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&s| &self.nodes[s])
    }

    /// One topological order of all nodes.
    ///
    /// Kahn's algorithm; among ready nodes the lowest insertion id goes
    /// first, so the order is a pure function of the graph. Fails with
    /// `CyclicDependency` naming one cycle when no order exists.
    pub fn topological_order(&self) -> Result<Vec<&Node>> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        for out in &self.successors {
            for &t in out {
                in_degree[t] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(id)) = ready.pop() {
            order.push(&self.nodes[id]);
            for &t in &self.successors[id] {
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    ready.push(Reverse(t));
                }
            }
        }

        if order.len() < n {
            let cycle = self
                .find_cycle(&in_degree)
                .into_iter()
                .map(|id| self.nodes[id].to_string())
                .collect();
            return Err(SummarizerError::cyclic_dependency(cycle));
        }

        Ok(order)
    }

    /// Annotator names in topological order.
    pub fn annotator_order(&self) -> Result<Vec<&str>> {
        Ok(self
            .topological_order()?
            .into_iter()
            .filter(|n| n.is_annotator())
            .map(Node::name)
            .collect())
    }

    /// Extract one cycle from the nodes Kahn's algorithm could not release.
    ///
    /// Every cycle lies entirely inside the residual set, so a DFS restricted
    /// to residual nodes reaches a back edge. The returned path starts and
    /// ends at the node that edge points to.
    fn find_cycle(&self, in_degree: &[usize]) -> Vec<usize> {
        let residual = |id: usize| in_degree[id] > 0;

        // Iterative DFS over residual nodes.
        let n = self.nodes.len();
        let mut state = vec![0u8; n]; // 0 = unvisited, 1 = on stack, 2 = done
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut path: Vec<usize> = Vec::new();

        for start in (0..n).filter(|&i| residual(i)) {
            if state[start] != 0 {
                continue;
            }
            stack.push((start, 0));
            path.push(start);
            state[start] = 1;

            while let Some(&mut (node, ref mut next)) = stack.last_mut() {
                let succ = &self.successors[node];
                if *next < succ.len() {
                    let t = succ[*next];
                    *next += 1;
                    if !residual(t) {
                        continue;
                    }
                    match state[t] {
                        0 => {
                            state[t] = 1;
                            stack.push((t, 0));
                            path.push(t);
                        }
                        1 => {
                            let pos = path.iter().position(|&p| p == t).unwrap_or(0);
                            let mut cycle = path[pos..].to_vec();
                            cycle.push(t);
                            return cycle;
                        }
                        _ => {}
                    }
                } else {
                    state[node] = 2;
                    stack.pop();
                    path.pop();
                }
            }
        }

        Vec::new()
    }
}
