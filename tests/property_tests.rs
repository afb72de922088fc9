//! Property-based tests for frontier-graph
//!
//! Verifies storage invariants and traversal results for arbitrary graphs

use frontier_graph::algorithms::{bfs, BfsConfig};
use frontier_graph::operators::{filter, OperatorConfig};
use frontier_graph::functor::AcceptAll;
use frontier_graph::{CscGraph, CsrGraph, EdgeList, Frontier};
use proptest::prelude::*;
use std::collections::VecDeque;

type Edges = (usize, Vec<(u32, u32, f32)>);

fn edge_list((nodes, edges): &Edges) -> EdgeList {
    let pairs = edges.iter().map(|&(s, d, _)| (s, d)).collect();
    let values = edges.iter().map(|&(_, _, w)| w).collect();
    EdgeList::from_pairs(*nodes, true, pairs, Some(values)).unwrap()
}

fn sorted_triples(edges: impl Iterator<Item = (u32, u32, Option<f32>)>) -> Vec<(u32, u32, u32)> {
    let mut triples: Vec<_> = edges
        .map(|(s, d, w)| (s, d, w.map_or(0, f32::to_bits)))
        .collect();
    triples.sort_unstable();
    triples
}

fn reference_bfs(nodes: usize, edges: &[(u32, u32, f32)], source: usize) -> Vec<u32> {
    let mut adjacency = vec![Vec::new(); nodes];
    for &(s, d, _) in edges {
        adjacency[s as usize].push(d as usize);
    }
    let mut labels = vec![u32::MAX; nodes];
    labels[source] = 0;
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        for &n in &adjacency[v] {
            if labels[n] == u32::MAX {
                labels[n] = labels[v] + 1;
                queue.push_back(n);
            }
        }
    }
    labels
}

// Property: compression produces a valid CSR structure
proptest! {
    #[test]
    fn prop_from_edge_list_valid_csr(input in prop_edges(0usize..100usize, 1u32..50u32)) {
        let graph: CsrGraph = CsrGraph::from_edge_list(&edge_list(&input)).unwrap();
        let (row_offsets, col_indices, edge_values) = graph.csr_components().unwrap();

        // Invariant 1: offsets start at 0 and never decrease
        prop_assert_eq!(row_offsets.len(), input.0 + 1);
        prop_assert_eq!(row_offsets[0], 0);
        for window in row_offsets.windows(2) {
            prop_assert!(window[0] <= window[1]);
        }

        // Invariant 2: last offset == num_edges
        prop_assert_eq!(*row_offsets.last().unwrap() as usize, col_indices.len());
        prop_assert_eq!(graph.num_edges(), input.1.len());

        // Invariant 3: every neighbor is a vertex, values travel with edges
        prop_assert!(col_indices.iter().all(|&n| (n as usize) < input.0));
        prop_assert_eq!(edge_values.unwrap().len(), col_indices.len());
    }
}

// Property: out-degree and in-degree match the edge list
proptest! {
    #[test]
    fn prop_degrees_correct(input in prop_edges(0usize..100usize, 1u32..20u32)) {
        let list = edge_list(&input);
        let csr: CsrGraph = CsrGraph::from_edge_list(&list).unwrap();
        let csc: CscGraph = CscGraph::from_edge_list(&list).unwrap();

        for node in 0..input.0 as u32 {
            let out = input.1.iter().filter(|(s, _, _)| *s == node).count();
            let incoming = input.1.iter().filter(|(_, d, _)| *d == node).count();
            prop_assert_eq!(csr.out_degree(node).unwrap(), out);
            prop_assert_eq!(csc.in_degree(node).unwrap(), incoming);
        }
    }
}

// Property: edge list -> CSR/CSC -> edge list keeps the multiset of edges
proptest! {
    #[test]
    fn prop_round_trip_preserves_edges(input in prop_edges(0usize..100usize, 1u32..30u32)) {
        let list = edge_list(&input);
        let expected = sorted_triples(list.tuples().unwrap());

        let csr: CsrGraph = CsrGraph::from_edge_list(&list).unwrap();
        let from_csr = csr.to_edge_list().unwrap();
        prop_assert_eq!(from_csr.nodes(), input.0);
        prop_assert_eq!(sorted_triples(from_csr.tuples().unwrap()), expected.clone());

        let csc = CscGraph::from_csr(&csr).unwrap();
        prop_assert_eq!(sorted_triples(csc.to_edge_list().unwrap().tuples().unwrap()), expected.clone());

        let back = CsrGraph::from_csc(&csc).unwrap();
        prop_assert_eq!(sorted_triples(back.to_edge_list().unwrap().tuples().unwrap()), expected);
    }
}

// Property: parallel BFS matches a sequential queue-based BFS
proptest! {
    #[test]
    fn prop_bfs_matches_reference(
        input in prop_edges(0usize..200usize, 1u32..60u32),
        parallel in any::<bool>(),
    ) {
        let graph: CsrGraph = CsrGraph::from_edge_list(&edge_list(&input)).unwrap();
        let mut config = BfsConfig::new(0);
        config.enactor.operator = if parallel {
            OperatorConfig::parallel()
        } else {
            OperatorConfig::sequential()
        };

        let result = bfs(&graph, &config).unwrap();
        prop_assert_eq!(result.labels, reference_bfs(input.0, &input.1, 0));
    }
}

// Property: every recorded predecessor is one hop closer along a real edge
proptest! {
    #[test]
    fn prop_bfs_predecessors_consistent(input in prop_edges(0usize..200usize, 1u32..60u32)) {
        let graph: CsrGraph = CsrGraph::from_edge_list(&edge_list(&input)).unwrap();
        let mut config = BfsConfig::new(0).with_predecessors();
        config.enactor.operator = OperatorConfig::parallel();

        let result = bfs(&graph, &config).unwrap();
        let preds = result.predecessors.clone().unwrap();

        prop_assert_eq!(result.labels.clone(), reference_bfs(input.0, &input.1, 0));
        prop_assert_eq!(preds[0], u32::MAX);
        for v in 1..input.0 {
            if result.labels[v] == u32::MAX {
                prop_assert_eq!(preds[v], u32::MAX);
                continue;
            }
            let p = preds[v];
            prop_assert_eq!(result.labels[p as usize] + 1, result.labels[v]);
            prop_assert!(graph.outgoing_neighbors(p).unwrap().contains(&(v as u32)));
        }
    }
}

// Property: filtering twice changes nothing
proptest! {
    #[test]
    fn prop_filter_idempotent(items in prop::collection::vec(prop_oneof![0u32..100, Just(u32::MAX)], 0..300)) {
        let config = OperatorConfig::parallel();
        let once = filter(&Frontier::vertices(items), &AcceptAll, &config).unwrap();
        let twice = filter(&once, &AcceptAll, &config).unwrap();
        prop_assert_eq!(once, twice);
    }
}

/// Strategy: vertex count plus up to `num_edges` random weighted edges
fn prop_edges(
    num_edges: impl Strategy<Value = usize>,
    max_node: impl Strategy<Value = u32>,
) -> impl Strategy<Value = Edges> {
    (num_edges, max_node).prop_flat_map(|(n, max_node)| {
        // Ensure max_node is at least 1 to avoid empty range
        let max_node = max_node.max(1);
        prop::collection::vec((0..max_node, 0..max_node, 0.0..100.0f32), 0..=n)
            .prop_map(move |edges| (max_node as usize, edges))
    })
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_graph_invariants() {
        let graph: CsrGraph = CsrGraph::from_edge_list(&edge_list(&(3, Vec::new()))).unwrap();
        assert_eq!(graph.row_offsets().unwrap(), &[0, 0, 0, 0]);
        assert!(graph.col_indices().unwrap().is_empty());
    }

    #[test]
    fn test_reference_bfs_diamond() {
        let edges = [(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)];
        assert_eq!(reference_bfs(4, &edges, 0), vec![0, 1, 1, 2]);
    }
}
