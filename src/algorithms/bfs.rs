//! Breadth-first search on the frontier engine
//!
//! Each superstep advances the frontier one hop. A destination is claimed by a
//! compare-and-swap on its label (or, with predecessor tracking, on its
//! predecessor slot), so every reached vertex enters exactly one frontier and
//! gets the depth of the first step that reached it.
//!
//! # Example
//!
//! ```
//! use frontier_graph::algorithms::{bfs, BfsConfig};
//! use frontier_graph::CsrGraph;
//!
//! let graph: CsrGraph =
//!     CsrGraph::from_tuples(&[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]).unwrap();
//!
//! let result = bfs(&graph, &BfsConfig::new(0)).unwrap();
//! assert_eq!(result.labels, vec![0, 1, 1, 2]);
//! ```

use crate::atomic::AtomicArray;
use crate::config::{ParameterFlags, Parameters};
use crate::enactor::{Enactor, EnactorConfig, EnactorStats};
use crate::error::{GraphError, Result};
use crate::frontier::Frontier;
use crate::functor::Functor;
use crate::storage::Adjacency;
use crate::types::{GraphValue, Index, ValueType};
use tracing::info;

/// BFS settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BfsConfig {
    /// Source vertex
    pub source: usize,
    /// Record the vertex each vertex was reached from
    pub mark_predecessors: bool,
    /// Iteration cap and operator tuning
    pub enactor: EnactorConfig,
}

impl BfsConfig {
    /// Plain BFS from `source`
    #[must_use]
    pub fn new(source: usize) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Also record predecessors
    #[must_use]
    pub const fn with_predecessors(mut self) -> Self {
        self.mark_predecessors = true;
        self
    }

    /// Declare `src`, `mark-pred` and the enactor parameters
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDefinition` if any name is already declared
    pub fn declare(params: &mut Parameters) -> Result<()> {
        params.declare(
            "src",
            ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::SINGLE_VALUE,
            0,
            "source vertex of the traversal",
            ValueType::Usize,
        )?;
        params.declare(
            "mark-pred",
            ParameterFlags::DEFAULT,
            false,
            "record the predecessor of every reached vertex",
            ValueType::Bool,
        )?;
        EnactorConfig::declare(params)
    }

    /// Read the settings declared by [`BfsConfig::declare`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a parameter is undeclared or malformed
    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Ok(Self {
            source: params.get("src")?,
            mark_predecessors: params.get("mark-pred")?,
            enactor: EnactorConfig::from_parameters(params)?,
        })
    }
}

/// Per-traversal state shared by all workers
#[derive(Debug)]
pub struct BfsProblem<V: Index> {
    labels: AtomicArray<V>,
    predecessors: Option<AtomicArray<V>>,
}

impl<V: Index> BfsProblem<V> {
    /// Allocate state for `nodes` vertices
    ///
    /// # Errors
    ///
    /// Returns `Allocation` if the arrays cannot be reserved
    pub fn new(nodes: usize, mark_predecessors: bool) -> Result<Self> {
        let mut labels = AtomicArray::new("labels");
        labels.allocate(nodes, V::INVALID)?;
        let predecessors = if mark_predecessors {
            let mut predecessors = AtomicArray::new("predecessors");
            predecessors.allocate(nodes, V::INVALID)?;
            Some(predecessors)
        } else {
            None
        };
        Ok(Self {
            labels,
            predecessors,
        })
    }

    /// Number of vertices covered
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Clear all state and label `source` with depth 0
    ///
    /// Returns the seed frontier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `source` is not a vertex
    pub fn reset(&self, source: usize) -> Result<Frontier<V>> {
        let id = V::from_usize(source)
            .filter(|_| source < self.num_nodes())
            .ok_or_else(|| {
                GraphError::invalid(format!(
                    "source vertex {source} out of range for {} vertices",
                    self.num_nodes()
                ))
            })?;

        self.labels.fill(V::INVALID);
        if let Some(predecessors) = &self.predecessors {
            predecessors.fill(V::INVALID);
        }
        self.labels.store(source, V::ALL_ZEROS);
        Ok(Frontier::seed(id))
    }

    /// Edge/vertex callbacks over this state
    #[must_use]
    pub fn functor(&self) -> BfsFunctor<'_, V> {
        BfsFunctor {
            labels: &self.labels,
            predecessors: self.predecessors.as_ref(),
        }
    }

    /// Current labels (invalid sentinel for unreached vertices)
    #[must_use]
    pub fn labels(&self) -> Vec<V> {
        self.labels.snapshot()
    }

    /// Current predecessors, if tracked
    #[must_use]
    pub fn predecessors(&self) -> Option<Vec<V>> {
        self.predecessors.as_ref().map(AtomicArray::snapshot)
    }

    /// Free all state
    pub fn release(&mut self) {
        self.labels.release();
        if let Some(predecessors) = &mut self.predecessors {
            predecessors.release();
        }
    }
}

/// BFS claim logic
#[derive(Debug, Clone, Copy)]
pub struct BfsFunctor<'a, V: Index> {
    labels: &'a AtomicArray<V>,
    predecessors: Option<&'a AtomicArray<V>>,
}

impl<V: Index> BfsFunctor<'_, V> {
    fn next_label(&self, src: usize) -> V {
        self.labels
            .load(src)
            .map_or(V::INVALID, Index::successor)
    }
}

impl<V: Index> Functor<V> for BfsFunctor<'_, V> {
    fn cond_edge(&self, src: V, dst: V, _edge: usize) -> bool {
        let (Some(s), Some(d)) = (src.to_usize(), dst.to_usize()) else {
            return false;
        };
        match self.predecessors {
            // The label check keeps the source (labelled but without a
            // predecessor) from being claimed; the swap decides the winner.
            Some(predecessors) => {
                self.labels.load(d).is_some_and(GraphValue::is_invalid)
                    && predecessors.compare_and_swap(d, V::INVALID, src)
            }
            None => self
                .labels
                .compare_and_swap(d, V::INVALID, self.next_label(s)),
        }
    }

    fn apply_edge(&self, src: V, dst: V, _edge: usize) {
        if self.predecessors.is_some() {
            if let (Some(s), Some(d)) = (src.to_usize(), dst.to_usize()) {
                self.labels.store(d, self.next_label(s));
            }
        }
    }
}

/// Labels (and predecessors) of a finished BFS
#[derive(Debug, Clone)]
pub struct BfsResult<V: Index> {
    /// Hop count from the source; invalid sentinel if unreached
    pub labels: Vec<V>,
    /// Vertex each vertex was first reached from, if tracked
    pub predecessors: Option<Vec<V>>,
    /// Enactor counters
    pub stats: EnactorStats,
}

impl<V: Index> BfsResult<V> {
    /// Hop count to `node`; `None` if unreached or out of range
    #[must_use]
    pub fn distance(&self, node: usize) -> Option<V> {
        self.labels.get(node).copied().filter(|l| !l.is_invalid())
    }

    /// Whether `node` was reached
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.distance(node).is_some()
    }

    /// Number of reached vertices (source included)
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.labels.iter().filter(|l| !l.is_invalid()).count()
    }

    /// Reached vertex ids, ascending
    #[must_use]
    pub fn reachable(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_invalid())
            .map(|(v, _)| v)
            .collect()
    }
}

/// Run BFS on any traversable graph form
///
/// # Errors
///
/// - `InvalidArgument` if the source is not a vertex or the graph is not
///   host-readable
/// - `Allocation` if the per-vertex state cannot be reserved
pub fn bfs<V, S, G>(graph: &G, config: &BfsConfig) -> Result<BfsResult<V>>
where
    V: Index,
    S: Index,
    G: Adjacency<V, S> + ?Sized,
{
    let nodes = graph.view()?.num_nodes();
    let problem = BfsProblem::<V>::new(nodes, config.mark_predecessors)?;
    let seed = problem.reset(config.source)?;

    let stats = Enactor::new(config.enactor).enact(graph, &problem.functor(), seed)?;

    let result = BfsResult {
        labels: problem.labels(),
        predecessors: problem.predecessors(),
        stats,
    };
    info!(
        source = config.source,
        visited = result.visited_count(),
        depth = result.stats.iterations,
        "bfs complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::OperatorConfig;
    use crate::storage::{CscGraph, CsrGraph, EdgeList};

    fn diamond() -> CsrGraph {
        CsrGraph::from_tuples(&[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]).unwrap()
    }

    #[test]
    fn test_bfs_diamond_labels() {
        let result = bfs(&diamond(), &BfsConfig::new(0)).unwrap();

        assert_eq!(result.labels, vec![0, 1, 1, 2]);
        assert_eq!(result.predecessors, None);
        assert_eq!(result.stats.frontier_sizes, vec![2, 1, 0]);
        assert_eq!(result.visited_count(), 4);
    }

    #[test]
    fn test_bfs_diamond_predecessors() {
        let result = bfs(&diamond(), &BfsConfig::new(0).with_predecessors()).unwrap();

        assert_eq!(result.labels, vec![0, 1, 1, 2]);
        let preds = result.predecessors.unwrap();
        assert_eq!(preds[0], u32::MAX);
        assert_eq!(preds[1], 0);
        assert_eq!(preds[2], 0);
        assert!(preds[3] == 1 || preds[3] == 2);
    }

    #[test]
    fn test_bfs_back_edge_does_not_relabel_source() {
        let graph: CsrGraph = CsrGraph::from_tuples(&[(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
        let result = bfs(&graph, &BfsConfig::new(0).with_predecessors()).unwrap();

        assert_eq!(result.labels, vec![0, 1]);
        assert_eq!(result.predecessors.unwrap(), vec![u32::MAX, 0]);
    }

    #[test]
    fn test_bfs_source_without_out_edges() {
        let graph: CsrGraph = CsrGraph::from_tuples(&[(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        let result = bfs(&graph, &BfsConfig::new(2)).unwrap();

        assert_eq!(result.labels, vec![u32::MAX, u32::MAX, 0]);
        assert_eq!(result.stats.iterations, 1);
        assert_eq!(result.stats.frontier_sizes, vec![0]);
        assert!(!result.is_reachable(0));
        assert_eq!(result.distance(2), Some(0));
    }

    #[test]
    fn test_bfs_invalid_source() {
        assert!(bfs::<u32, u32, _>(&diamond(), &BfsConfig::new(4)).is_err());
    }

    #[test]
    fn test_bfs_unreachable_component() {
        let list: EdgeList =
            EdgeList::from_pairs(6, true, vec![(0, 1), (1, 2), (3, 4), (4, 5)], None).unwrap();
        let graph: CsrGraph = CsrGraph::from_edge_list(&list).unwrap();

        let result = bfs(&graph, &BfsConfig::new(3)).unwrap();
        assert_eq!(result.reachable(), vec![3, 4, 5]);
        assert_eq!(result.distance(5), Some(2));
    }

    #[test]
    fn test_bfs_wide_graph_parallel() {
        // 0 -> 1..=2000, each of those -> 2001
        let mut tuples: Vec<(u32, u32, f32)> = (1..=2000).map(|v| (0, v, 1.0)).collect();
        tuples.extend((1..=2000).map(|v| (v, 2001, 1.0)));
        let graph: CsrGraph = CsrGraph::from_tuples(&tuples).unwrap();

        let mut config = BfsConfig::new(0).with_predecessors();
        config.enactor.operator = OperatorConfig::parallel();
        let result = bfs(&graph, &config).unwrap();

        assert_eq!(result.distance(2001), Some(2));
        assert_eq!(result.stats.frontier_sizes, vec![2000, 1, 0]);
        let pred = result.predecessors.unwrap()[2001];
        assert!((1..=2000).contains(&pred));
    }

    #[test]
    fn test_bfs_over_csc_follows_incoming_edges() {
        let graph: CscGraph = CscGraph::from_csr(&diamond()).unwrap();
        let result = bfs(&graph, &BfsConfig::new(3)).unwrap();
        assert_eq!(result.labels, vec![2, 1, 1, 0]);
    }

    #[test]
    fn test_problem_reset_reuses_state() {
        let graph = diamond();
        let problem: BfsProblem<u32> = BfsProblem::new(4, false).unwrap();

        let seed = problem.reset(0).unwrap();
        Enactor::default().enact(&graph, &problem.functor(), seed).unwrap();
        assert_eq!(problem.labels(), vec![0, 1, 1, 2]);

        let seed = problem.reset(2).unwrap();
        Enactor::default().enact(&graph, &problem.functor(), seed).unwrap();
        assert_eq!(problem.labels(), vec![u32::MAX, u32::MAX, 0, 1]);
    }

    #[test]
    fn test_config_from_parameters() {
        let mut params = Parameters::new("bfs");
        BfsConfig::declare(&mut params).unwrap();
        params
            .parse_command_line(["--src=3", "--mark-pred", "--max-iter", "5"])
            .unwrap();

        let config = BfsConfig::from_parameters(&params).unwrap();
        assert_eq!(config.source, 3);
        assert!(config.mark_predecessors);
        assert_eq!(config.enactor.max_iterations, Some(5));
    }

    #[test]
    fn test_signed_vertex_ids() {
        let list: EdgeList<i64, f32> =
            EdgeList::from_pairs(3, true, vec![(0, 1), (1, 2)], None).unwrap();
        let graph: CsrGraph<i64, i64, f32> = CsrGraph::from_edge_list(&list).unwrap();

        let result = bfs(&graph, &BfsConfig::new(0)).unwrap();
        assert_eq!(result.labels, vec![0, 1, 2]);
        assert_eq!(result.distance(2), Some(2));
    }
}
