//! CSR (Compressed Sparse Row) graph representation
//!
//! Based on `GraphBLAST` (Yang et al., ACM `ToMS` 2022) for GPU-optimized sparse matrix operations.
//!
//! # CSR Format
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! CSR:
//!   row_offsets: [0, 2, 3, 3]  // Node 0: edges [0..2), Node 1: [2..3), Node 2: [3..3)
//!   col_indices: [1, 2, 2]      // Edge 0 → node 1, edge 1 → node 2, edge 2 → node 2
//!   edge_values: [1.0, 1.0, 1.0]
//! ```

use super::array::Placement;
use super::compressed::{Adjacency, AdjacencyView, Axis, Compressed, DISPLAY_VERTEX_LIMIT};
use super::coo::EdgeList;
use super::csc::CscGraph;
use crate::error::{GraphError, Result};
use crate::types::{GraphValue, Index};

/// CSR (Compressed Sparse Row) graph
///
/// Optimized for:
/// - O(1) access to outgoing edges
/// - Push-style Advance (frontier vertex → its out-neighbors)
/// - GPU-friendly memory layout
///
/// # Example
///
/// ```
/// use frontier_graph::CsrGraph;
///
/// let graph: CsrGraph = CsrGraph::from_tuples(&[(0, 1, 1.0), (0, 2, 1.0)]).unwrap();
///
/// let neighbors = graph.outgoing_neighbors(0).unwrap();
/// assert_eq!(neighbors, &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CsrGraph<V: Index = u32, S: Index = u32, W: GraphValue = f32> {
    inner: Compressed<V, S, W>,
}

impl<V: Index, S: Index, W: GraphValue> CsrGraph<V, S, W> {
    /// Create an empty, unallocated graph without edge values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Compressed::new(Axis::Row, false),
        }
    }

    /// Create an empty, unallocated graph that carries edge values
    #[must_use]
    pub const fn with_edge_values() -> Self {
        Self {
            inner: Compressed::new(Axis::Row, true),
        }
    }

    /// Build from an edge list
    ///
    /// `nodes`, `edges` and `directed` are copied; edge and node values travel
    /// with their edge/node. The source is not modified.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if an endpoint is out of range or `edges` does not
    ///   fit the offset type
    /// - `Allocation` if an array cannot be reserved
    pub fn from_edge_list(source: &EdgeList<V, W>) -> Result<Self> {
        Ok(Self {
            inner: Compressed::from_edge_list(Axis::Row, source)?,
        })
    }

    /// Build a directed graph from weighted tuples (`max id + 1` vertices)
    ///
    /// # Errors
    ///
    /// Same as [`CsrGraph::from_edge_list`]
    pub fn from_tuples(edges: &[(V, V, W)]) -> Result<Self> {
        Self::from_edge_list(&EdgeList::from_tuples(edges, true)?)
    }

    /// Convert from the column-compressed form (via an edge list)
    ///
    /// # Errors
    ///
    /// Same as [`CsrGraph::from_edge_list`]
    pub fn from_csc(source: &CscGraph<V, S, W>) -> Result<Self> {
        Self::from_edge_list(&source.to_edge_list()?)
    }

    /// Expand back into an edge list ordered by source
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn to_edge_list(&self) -> Result<EdgeList<V, W>> {
        self.inner.to_edge_list()
    }

    /// Reserve storage for `nodes` vertices and `edges` edges
    ///
    /// # Errors
    ///
    /// Returns the first failure; already-allocated arrays stay releasable
    pub fn allocate(&mut self, nodes: usize, edges: usize) -> Result<()> {
        self.inner.allocate(nodes, edges)
    }

    /// Free all arrays; safe to call repeatedly
    pub fn release(&mut self) {
        self.inner.release();
    }

    /// Get outgoing neighbors of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn outgoing_neighbors(&self, node: V) -> Result<&[V]> {
        let view = self.inner.view()?;
        if view.edge_range(node).is_none() {
            return Err(GraphError::invalid(format!("Node ID {node} out of bounds")));
        }
        Ok(view.neighbors(node))
    }

    /// Number of outgoing edges of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn out_degree(&self, node: V) -> Result<usize> {
        self.outgoing_neighbors(node).map(<[V]>::len)
    }

    /// Get number of nodes
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.inner.nodes()
    }

    /// Get number of edges
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.inner.edges()
    }

    /// Whether the graph is directed
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.inner.directed()
    }

    /// Row offsets (length `num_nodes + 1`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn row_offsets(&self) -> Result<&[S]> {
        self.inner.offsets.as_slice()
    }

    /// Column indices (length `num_edges`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn col_indices(&self) -> Result<&[V]> {
        self.inner.indices.as_slice()
    }

    /// Edge values in `col_indices` order, if the graph carries them
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn edge_values(&self) -> Result<Option<&[W]>> {
        self.inner.edge_values()
    }

    /// Node values, if the graph carries them
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn node_values(&self) -> Result<Option<&[W]>> {
        self.inner.node_values()
    }

    /// Get CSR components (`row_offsets`, `col_indices`, `edge_values`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an array is released or device-only
    pub fn csr_components(&self) -> Result<(&[S], &[V], Option<&[W]>)> {
        Ok((self.row_offsets()?, self.col_indices()?, self.edge_values()?))
    }

    /// Writable CSR components of an allocated graph
    ///
    /// Fill path for a graph built with [`CsrGraph::allocate`]. Offsets must be
    /// non-decreasing with `row_offsets[num_nodes] == num_edges`; neighbor
    /// lookups clamp offsets that are not.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an array is released or device-only
    pub fn csr_components_mut(&mut self) -> Result<(&mut [S], &mut [V], Option<&mut [W]>)> {
        self.inner.components_mut()
    }

    /// Apply a placement directive to every array
    pub fn set_placement(&mut self, placement: Placement) {
        self.inner.set_placement(placement);
    }

    /// Current placement of the offsets/indices arrays
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.inner.offsets.placement()
    }

    /// Bounded neighbor listing of the first `limit` vertices
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn display(&self, prefix: &str, limit: usize, with_values: bool) -> Result<String> {
        self.inner.display(prefix, limit, with_values)
    }

    /// [`CsrGraph::display`] with the default vertex limit
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn display_default(&self, prefix: &str) -> Result<String> {
        self.display(prefix, DISPLAY_VERTEX_LIMIT, false)
    }

    #[cfg(feature = "gpu")]
    pub(crate) const fn arrays(&self) -> &Compressed<V, S, W> {
        &self.inner
    }
}

impl<V: Index, S: Index, W: GraphValue> Default for CsrGraph<V, S, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Index, S: Index, W: GraphValue> Adjacency<V, S> for CsrGraph<V, S, W> {
    fn view(&self) -> Result<AdjacencyView<'_, V, S>> {
        self.inner.view()
    }
}
