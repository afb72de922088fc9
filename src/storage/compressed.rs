//! Shared machinery for the row- and column-compressed forms
//!
//! Both forms are built the same way from an edge list:
//!
//! 1. order the edges ascending on the compression dimension
//! 2. copy the paired endpoint (and the edge value) of each edge in that order
//! 3. `offsets[k]` = first ordered position whose key is `>= k`, found by
//!    binary search; `offsets[nodes] = edges`
//!
//! A vertex that never appears as a key gets `offsets[k] == offsets[k + 1]`.

use super::array::{Array1D, Placement};
use super::coo::{EdgeList, EdgeOrder};
use crate::error::{GraphError, Result};
use crate::types::{GraphValue, Index};
use std::fmt::Write as _;
use std::ops::Range;
use tracing::debug;

/// Maximum neighbors printed per vertex by `display`
pub const DISPLAY_NEIGHBOR_CAP: usize = 40;

/// Default number of vertices printed by `display`
pub const DISPLAY_VERTEX_LIMIT: usize = 40;

/// Compression dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    /// Indexed by source (CSR)
    Row,
    /// Indexed by destination (CSC)
    Column,
}

impl Axis {
    const fn format(self) -> &'static str {
        match self {
            Self::Row => "CSR",
            Self::Column => "CSC",
        }
    }

    const fn offsets_name(self) -> &'static str {
        match self {
            Self::Row => "row_offsets",
            Self::Column => "column_offsets",
        }
    }

    const fn indices_name(self) -> &'static str {
        match self {
            Self::Row => "col_indices",
            Self::Column => "row_indices",
        }
    }

    pub(crate) const fn order(self) -> EdgeOrder {
        match self {
            Self::Row => EdgeOrder::BySource,
            Self::Column => EdgeOrder::ByDestination,
        }
    }

    fn key<V: Copy>(self, (src, dst): (V, V)) -> V {
        match self {
            Self::Row => src,
            Self::Column => dst,
        }
    }

    fn paired<V: Copy>(self, (src, dst): (V, V)) -> V {
        match self {
            Self::Row => dst,
            Self::Column => src,
        }
    }

    fn pair<V: Copy>(self, key: V, paired: V) -> (V, V) {
        match self {
            Self::Row => (key, paired),
            Self::Column => (paired, key),
        }
    }
}

/// Read-only offsets/indices view shared by all operator workers
#[derive(Debug)]
pub struct AdjacencyView<'a, V, S> {
    offsets: &'a [S],
    indices: &'a [V],
}

impl<V, S> Clone for AdjacencyView<'_, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, S> Copy for AdjacencyView<'_, V, S> {}

impl<'a, V: Index, S: Index> AdjacencyView<'a, V, S> {
    /// Number of vertices
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Number of edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.indices.len()
    }

    /// Edge-id range of `v`'s neighbor list; `None` if `v` is not a vertex
    ///
    /// Offsets that decrease or point past the index array give an empty
    /// range.
    #[must_use]
    pub fn edge_range(&self, v: V) -> Option<Range<usize>> {
        let idx = v.to_usize()?;
        if idx >= self.num_nodes() {
            return None;
        }
        let end = self.offsets[idx + 1].to_usize()?.min(self.indices.len());
        let start = self.offsets[idx].to_usize()?.min(end);
        Some(start..end)
    }

    /// Neighbor list of `v` (empty if `v` is not a vertex)
    #[must_use]
    pub fn neighbors(&self, v: V) -> &'a [V] {
        self.edge_range(v).map_or(&[], |range| &self.indices[range])
    }

    /// Endpoint stored at edge id `e`
    #[must_use]
    pub fn neighbor(&self, e: usize) -> V {
        self.indices[e]
    }
}

/// A graph form the operators can traverse
pub trait Adjacency<V: Index, S: Index>: Sync {
    /// Host view of offsets and neighbor indices
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are released or device-only
    fn view(&self) -> Result<AdjacencyView<'_, V, S>>;
}

/// Arrays of one compressed form
#[derive(Debug, Clone)]
pub(crate) struct Compressed<V, S, W> {
    axis: Axis,
    nodes: usize,
    edges: usize,
    directed: bool,
    pub(crate) offsets: Array1D<S>,
    pub(crate) indices: Array1D<V>,
    pub(crate) edge_values: Option<Array1D<W>>,
    pub(crate) node_values: Option<Array1D<W>>,
}

impl<V: Index, S: Index, W: GraphValue> Compressed<V, S, W> {
    pub(crate) const fn new(axis: Axis, with_edge_values: bool) -> Self {
        Self {
            axis,
            nodes: 0,
            edges: 0,
            directed: true,
            offsets: Array1D::new(axis.offsets_name()),
            indices: Array1D::new(axis.indices_name()),
            edge_values: if with_edge_values {
                Some(Array1D::new("edge_values"))
            } else {
                None
            },
            node_values: None,
        }
    }

    pub(crate) fn allocate(&mut self, nodes: usize, edges: usize) -> Result<()> {
        let offsets_len = nodes
            .checked_add(1)
            .ok_or_else(|| GraphError::invalid(format!("{nodes} nodes overflows offsets")))?;
        if S::from_usize(edges).is_none() {
            return Err(GraphError::invalid(format!(
                "{edges} edges do not fit the offset type {}",
                S::TYPE_NAME
            )));
        }

        self.nodes = nodes;
        self.edges = edges;
        self.offsets.allocate(offsets_len, S::ALL_ZEROS)?;
        self.indices.allocate(edges, V::INVALID)?;
        if let Some(values) = &mut self.edge_values {
            values.allocate(edges, W::ALL_ZEROS)?;
        }
        if let Some(values) = &mut self.node_values {
            values.allocate(nodes, W::ALL_ZEROS)?;
        }
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.offsets.release();
        self.indices.release();
        if let Some(values) = &mut self.edge_values {
            values.release();
        }
        if let Some(values) = &mut self.node_values {
            values.release();
        }
    }

    pub(crate) fn from_edge_list(axis: Axis, source: &EdgeList<V, W>) -> Result<Self> {
        let nodes = source.nodes();
        let edges = source.edges();
        let pairs = source.pairs()?;
        let source_values = source.edge_values()?;
        let source_node_values = source.node_values()?;

        for (i, &pair) in pairs.iter().enumerate() {
            for id in [pair.0, pair.1] {
                if id.to_usize().map_or(true, |idx| idx >= nodes) {
                    return Err(GraphError::invalid(format!(
                        "edge {i}: vertex {id} out of range for {nodes} nodes"
                    )));
                }
            }
        }

        let mut graph = Self::new(axis, source_values.is_some());
        graph.directed = source.directed();
        if source_node_values.is_some() {
            graph.node_values = Some(Array1D::new("node_values"));
        }
        graph.allocate(nodes, edges)?;

        let permutation = source.sorted_permutation(axis.order())?;

        let indices = graph.indices.as_mut_slice()?;
        for (slot, &i) in indices.iter_mut().zip(&permutation) {
            *slot = axis.paired(pairs[i]);
        }

        if let (Some(dst), Some(src)) = (graph.edge_values.as_mut(), source_values) {
            let dst = dst.as_mut_slice()?;
            for (slot, &i) in dst.iter_mut().zip(&permutation) {
                *slot = src[i];
            }
        }

        if let (Some(dst), Some(src)) = (graph.node_values.as_mut(), source_node_values) {
            dst.as_mut_slice()?.copy_from_slice(src);
        }

        let offsets = graph.offsets.as_mut_slice()?;
        for (k, slot) in offsets.iter_mut().enumerate().take(nodes) {
            let position = permutation.partition_point(|&i| {
                axis.key(pairs[i]).to_usize().unwrap_or(usize::MAX) < k
            });
            *slot = to_offset(position)?;
        }
        offsets[nodes] = to_offset(edges)?;

        debug!(
            format = axis.format(),
            nodes,
            edges,
            directed = graph.directed,
            "built compressed graph"
        );
        Ok(graph)
    }

    pub(crate) fn to_edge_list(&self) -> Result<EdgeList<V, W>> {
        let offsets = self.offsets.as_slice()?;
        let indices = self.indices.as_slice()?;
        let values = self
            .edge_values
            .as_ref()
            .map(Array1D::as_slice)
            .transpose()?;

        let mut pairs = Vec::new();
        pairs
            .try_reserve_exact(self.edges)
            .map_err(|_| GraphError::allocation("edge_pairs", self.edges))?;

        for k in 0..self.nodes {
            let key = V::from_usize(k)
                .ok_or_else(|| GraphError::invalid(format!("vertex {k} does not fit the id type")))?;
            let start = offset_at(offsets, k)?;
            let end = offset_at(offsets, k + 1)?;
            for &paired in &indices[start..end] {
                pairs.push(self.axis.pair(key, paired));
            }
        }

        let node_values = self
            .node_values
            .as_ref()
            .map(|v| v.as_slice().map(<[W]>::to_vec))
            .transpose()?;

        Ok(EdgeList::assemble(
            self.nodes,
            self.directed,
            self.axis.order(),
            pairs,
            values.map(<[W]>::to_vec),
            node_values,
        ))
    }

    pub(crate) fn view(&self) -> Result<AdjacencyView<'_, V, S>> {
        Ok(AdjacencyView {
            offsets: self.offsets.as_slice()?,
            indices: self.indices.as_slice()?,
        })
    }

    pub(crate) const fn nodes(&self) -> usize {
        self.nodes
    }

    pub(crate) const fn edges(&self) -> usize {
        self.edges
    }

    pub(crate) const fn directed(&self) -> bool {
        self.directed
    }

    pub(crate) fn edge_values(&self) -> Result<Option<&[W]>> {
        self.edge_values.as_ref().map(Array1D::as_slice).transpose()
    }

    pub(crate) fn node_values(&self) -> Result<Option<&[W]>> {
        self.node_values.as_ref().map(Array1D::as_slice).transpose()
    }

    pub(crate) fn components_mut(&mut self) -> Result<(&mut [S], &mut [V], Option<&mut [W]>)> {
        Ok((
            self.offsets.as_mut_slice()?,
            self.indices.as_mut_slice()?,
            self.edge_values
                .as_mut()
                .map(Array1D::as_mut_slice)
                .transpose()?,
        ))
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.offsets.set_placement(placement);
        self.indices.set_placement(placement);
        if let Some(values) = &mut self.edge_values {
            values.set_placement(placement);
        }
        if let Some(values) = &mut self.node_values {
            values.set_placement(placement);
        }
    }

    pub(crate) fn display(&self, prefix: &str, limit: usize, with_values: bool) -> Result<String> {
        let offsets = self.offsets.as_slice()?;
        let indices = self.indices.as_slice()?;
        let values = if with_values { self.edge_values()? } else { None };
        let shown = limit.min(self.nodes);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{prefix}Graph containing {} vertices, {} edges, in {} format. {}. Neighbor list of first {shown} nodes :",
            self.nodes,
            self.edges,
            self.axis.format(),
            if self.directed { "Directed" } else { "Undirected" },
        );

        for v in 0..shown {
            let start = offset_at(offsets, v)?;
            let end = offset_at(offsets, v + 1)?;
            let cap = end.min(start + DISPLAY_NEIGHBOR_CAP);

            let mut entries: Vec<String> = (start..cap)
                .map(|e| match values {
                    Some(values) => format!("[{},{}]", indices[e], values[e]),
                    None => format!("[{}]", indices[e]),
                })
                .collect();
            if end > cap {
                entries.push("...".to_string());
            }

            let _ = writeln!(out, "{} : v {v} {start}", entries.join(", "));
        }

        Ok(out)
    }
}

fn to_offset<S: Index>(position: usize) -> Result<S> {
    S::from_usize(position).ok_or_else(|| {
        GraphError::invalid(format!(
            "offset {position} does not fit the offset type {}",
            S::TYPE_NAME
        ))
    })
}

fn offset_at<S: Index>(offsets: &[S], k: usize) -> Result<usize> {
    offsets[k]
        .to_usize()
        .ok_or_else(|| GraphError::invalid(format!("corrupt offset at vertex {k}")))
}
