//! Advance: frontier vertices to admitted neighbors
//!
//! Every edge of every input vertex is offered to the functor exactly once.
//! Input ids that are not vertices of the graph (out of range or the invalid
//! sentinel) contribute nothing. Output order across workers is unspecified.

use super::OperatorConfig;
use crate::error::{GraphError, Result};
use crate::frontier::{Frontier, FrontierKind};
use crate::functor::Functor;
use crate::storage::{Adjacency, AdjacencyView};
use crate::types::Index;
use rayon::prelude::*;
use tracing::trace;

/// Output of one advance step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advanced<T> {
    /// Admitted ids
    pub frontier: Frontier<T>,
    /// Edges offered to the functor
    pub edges_visited: usize,
}

fn check_input<V: Index>(input: &Frontier<V>) -> Result<()> {
    if input.kind() == FrontierKind::Vertex {
        Ok(())
    } else {
        Err(GraphError::invalid("advance expects a vertex frontier"))
    }
}

fn edges_offered<V: Index, S: Index>(view: AdjacencyView<'_, V, S>, input: &[V]) -> usize {
    input
        .iter()
        .filter_map(|&v| view.edge_range(v))
        .map(|range| range.len())
        .sum()
}

/// Expand `input` to the destinations of admitted edges
///
/// # Errors
///
/// Returns `InvalidArgument` if `input` is not a vertex frontier or the graph
/// is not host-readable
pub fn advance<V, S, G, F>(
    graph: &G,
    input: &Frontier<V>,
    functor: &F,
    config: &OperatorConfig,
) -> Result<Advanced<V>>
where
    V: Index,
    S: Index,
    G: Adjacency<V, S> + ?Sized,
    F: Functor<V>,
{
    check_input(input)?;
    let view = graph.view()?;

    let expand = |&src: &V| {
        view.edge_range(src)
            .into_iter()
            .flatten()
            .filter_map(move |e| {
                let dst = view.neighbor(e);
                functor.cond_edge(src, dst, e).then(|| {
                    functor.apply_edge(src, dst, e);
                    dst
                })
            })
    };

    let items: Vec<V> = if config.use_parallel(input.len()) {
        input.as_slice().par_iter().flat_map_iter(expand).collect()
    } else {
        input.as_slice().iter().flat_map(expand).collect()
    };

    let edges_visited = edges_offered(view, input.as_slice());
    trace!(input = input.len(), output = items.len(), edges_visited, "advance");
    Ok(Advanced {
        frontier: Frontier::vertices(items),
        edges_visited,
    })
}

/// Expand `input` to the ids of admitted edges
///
/// # Errors
///
/// Returns `InvalidArgument` if `input` is not a vertex frontier or the graph
/// is not host-readable
pub fn advance_edges<V, S, G, F>(
    graph: &G,
    input: &Frontier<V>,
    functor: &F,
    config: &OperatorConfig,
) -> Result<Advanced<S>>
where
    V: Index,
    S: Index,
    G: Adjacency<V, S> + ?Sized,
    F: Functor<V>,
{
    check_input(input)?;
    let view = graph.view()?;

    let expand = |&src: &V| {
        view.edge_range(src)
            .into_iter()
            .flatten()
            .filter_map(move |e| {
                let dst = view.neighbor(e);
                if functor.cond_edge(src, dst, e) {
                    functor.apply_edge(src, dst, e);
                    S::from_usize(e)
                } else {
                    None
                }
            })
    };

    let items: Vec<S> = if config.use_parallel(input.len()) {
        input.as_slice().par_iter().flat_map_iter(expand).collect()
    } else {
        input.as_slice().iter().flat_map(expand).collect()
    };

    let edges_visited = edges_offered(view, input.as_slice());
    trace!(input = input.len(), output = items.len(), edges_visited, "advance_edges");
    Ok(Advanced {
        frontier: Frontier::edges(items),
        edges_visited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::AtomicArray;
    use crate::functor::AcceptAll;
    use crate::storage::{CscGraph, CsrGraph, EdgeList};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn diamond() -> CsrGraph {
        CsrGraph::from_tuples(&[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]).unwrap()
    }

    /// Claims each destination once through a compare-and-swap
    struct ClaimOnce {
        owner: AtomicArray<u32>,
        applied: Vec<AtomicUsize>,
    }

    impl ClaimOnce {
        fn new(nodes: usize) -> Self {
            let mut owner = AtomicArray::new("owner");
            owner.allocate(nodes, u32::MAX).unwrap();
            Self {
                owner,
                applied: (0..nodes).map(|_| AtomicUsize::new(0)).collect(),
            }
        }
    }

    impl Functor<u32> for ClaimOnce {
        fn cond_edge(&self, src: u32, dst: u32, _edge: usize) -> bool {
            self.owner.compare_and_swap(dst as usize, u32::MAX, src)
        }

        fn apply_edge(&self, _src: u32, dst: u32, _edge: usize) {
            self.applied[dst as usize].fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_advance_accept_all() {
        let graph = diamond();
        let out = advance(&graph, &Frontier::seed(0), &AcceptAll, &OperatorConfig::default()).unwrap();

        assert_eq!(out.frontier.as_slice(), &[1, 2]);
        assert_eq!(out.edges_visited, 2);
    }

    #[test]
    fn test_advance_duplicates_without_claim() {
        let graph = diamond();
        let out = advance(
            &graph,
            &Frontier::vertices(vec![1, 2]),
            &AcceptAll,
            &OperatorConfig::sequential(),
        )
        .unwrap();
        assert_eq!(out.frontier.as_slice(), &[3, 3]);
    }

    #[test]
    fn test_advance_claim_admits_once() {
        let graph = diamond();
        let functor = ClaimOnce::new(4);
        let out = advance(
            &graph,
            &Frontier::vertices(vec![1, 2]),
            &functor,
            &OperatorConfig::parallel(),
        )
        .unwrap();

        assert_eq!(out.frontier.as_slice(), &[3]);
        assert_eq!(out.edges_visited, 2);
        assert_eq!(functor.applied[3].load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_advance_contention_single_winner() {
        // 5000 sources all pointing at vertex 0
        let sources: Vec<u32> = (1..=5000).collect();
        let tuples: Vec<(u32, u32, f32)> = sources.iter().map(|&s| (s, 0, 1.0)).collect();
        let graph: CsrGraph = CsrGraph::from_tuples(&tuples).unwrap();
        let functor = ClaimOnce::new(graph.num_nodes());

        let out = advance(
            &graph,
            &Frontier::vertices(sources),
            &functor,
            &OperatorConfig::parallel(),
        )
        .unwrap();

        assert_eq!(out.frontier.as_slice(), &[0]);
        assert_eq!(out.edges_visited, 5000);
        assert_eq!(functor.applied[0].load(Ordering::Relaxed), 1);
        assert_ne!(functor.owner.load(0), Some(u32::MAX));
    }

    #[test]
    fn test_advance_skips_invalid_and_out_of_range() {
        let graph = diamond();
        let out = advance(
            &graph,
            &Frontier::vertices(vec![u32::MAX, 99, 0]),
            &AcceptAll,
            &OperatorConfig::default(),
        )
        .unwrap();
        assert_eq!(out.frontier.as_slice(), &[1, 2]);
        assert_eq!(out.edges_visited, 2);
    }

    #[test]
    fn test_advance_empty_frontier() {
        let graph = diamond();
        let out = advance(
            &graph,
            &Frontier::new(FrontierKind::Vertex),
            &AcceptAll,
            &OperatorConfig::default(),
        )
        .unwrap();
        assert!(out.frontier.is_empty());
        assert_eq!(out.edges_visited, 0);
    }

    #[test]
    fn test_advance_rejects_edge_frontier() {
        let graph = diamond();
        let err = advance(
            &graph,
            &Frontier::edges(vec![0]),
            &AcceptAll,
            &OperatorConfig::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_advance_edges_emits_edge_ids() {
        let graph = diamond();
        let out: Advanced<u32> = advance_edges(
            &graph,
            &Frontier::vertices(vec![0, 2]),
            &AcceptAll,
            &OperatorConfig::default(),
        )
        .unwrap();
        assert_eq!(out.frontier.kind(), FrontierKind::Edge);
        assert_eq!(out.frontier.as_slice(), &[0, 1, 3]);
    }

    #[test]
    fn test_advance_over_csc_walks_backwards() {
        let list = EdgeList::from_tuples(&[(0, 1, 1.0), (0, 2, 1.0), (1, 2, 1.0)], true).unwrap();
        let graph: CscGraph = CscGraph::from_edge_list(&list).unwrap();

        let out = advance(&graph, &Frontier::seed(2), &AcceptAll, &OperatorConfig::default()).unwrap();
        assert_eq!(out.frontier.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_advance_released_graph_is_error() {
        let mut graph = diamond();
        graph.release();
        let result = advance(&graph, &Frontier::seed(0), &AcceptAll, &OperatorConfig::default());
        assert!(result.is_err());
    }
}
