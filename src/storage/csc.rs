//! CSC (Compressed Sparse Column) graph representation
//!
//! The transpose of CSR: edges grouped by destination, giving O(1) access to
//! incoming edges. Advance over a CSC graph walks edges backwards.
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! CSC:
//!   column_offsets: [0, 0, 1, 3]  // Node 0: no in-edges, Node 1: [0..1), Node 2: [1..3)
//!   row_indices:    [0, 0, 1]     // sources of each incoming edge
//! ```

use super::array::Placement;
use super::compressed::{Adjacency, AdjacencyView, Axis, Compressed, DISPLAY_VERTEX_LIMIT};
use super::coo::EdgeList;
use super::csr::CsrGraph;
use crate::error::{GraphError, Result};
use crate::types::{GraphValue, Index};

/// CSC (Compressed Sparse Column) graph
#[derive(Debug, Clone)]
pub struct CscGraph<V: Index = u32, S: Index = u32, W: GraphValue = f32> {
    inner: Compressed<V, S, W>,
}

impl<V: Index, S: Index, W: GraphValue> CscGraph<V, S, W> {
    /// Create an empty, unallocated graph without edge values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Compressed::new(Axis::Column, false),
        }
    }

    /// Create an empty, unallocated graph that carries edge values
    #[must_use]
    pub const fn with_edge_values() -> Self {
        Self {
            inner: Compressed::new(Axis::Column, true),
        }
    }

    /// Build from an edge list, compressing on the destination vertex
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if an endpoint is out of range or `edges` does not
    ///   fit the offset type
    /// - `Allocation` if an array cannot be reserved
    pub fn from_edge_list(source: &EdgeList<V, W>) -> Result<Self> {
        Ok(Self {
            inner: Compressed::from_edge_list(Axis::Column, source)?,
        })
    }

    /// Convert from the row-compressed form (via an edge list)
    ///
    /// # Errors
    ///
    /// Same as [`CscGraph::from_edge_list`]
    pub fn from_csr(source: &CsrGraph<V, S, W>) -> Result<Self> {
        Self::from_edge_list(&source.to_edge_list()?)
    }

    /// Expand back into an edge list ordered by destination
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

    /// Get incoming neighbors of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn incoming_neighbors(&self, node: V) -> Result<&[V]> {
        let view = self.inner.view()?;
        if view.edge_range(node).is_none() {
            return Err(GraphError::invalid(format!("Node ID {node} out of bounds")));
        }
        Ok(view.neighbors(node))
    }

    /// Number of incoming edges of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn in_degree(&self, node: V) -> Result<usize> {
        self.incoming_neighbors(node).map(<[V]>::len)
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

    /// Column offsets (length `num_nodes + 1`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn column_offsets(&self) -> Result<&[S]> {
        self.inner.offsets.as_slice()
    }

    /// Row indices (length `num_edges`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn row_indices(&self) -> Result<&[V]> {
        self.inner.indices.as_slice()
    }

    /// Edge values in `row_indices` order, if the graph carries them
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

    /// Writable CSC components (`column_offsets`, `row_indices`,
    /// `edge_values`) of an allocated graph
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an array is released or device-only
    pub fn csc_components_mut(&mut self) -> Result<(&mut [S], &mut [V], Option<&mut [W]>)> {
        self.inner.components_mut()
    }

    /// Apply a placement directive to every array
    pub fn set_placement(&mut self, placement: Placement) {
        self.inner.set_placement(placement);
    }

    /// Bounded neighbor listing of the first `limit` vertices
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn display(&self, prefix: &str, limit: usize, with_values: bool) -> Result<String> {
        self.inner.display(prefix, limit, with_values)
    }

    /// [`CscGraph::display`] with the default vertex limit
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn display_default(&self, prefix: &str) -> Result<String> {
        self.display(prefix, DISPLAY_VERTEX_LIMIT, false)
    }
}

impl<V: Index, S: Index, W: GraphValue> Default for CscGraph<V, S, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Index, S: Index, W: GraphValue> Adjacency<V, S> for CscGraph<V, S, W> {
    fn view(&self) -> Result<AdjacencyView<'_, V, S>> {
        self.inner.view()
    }
}
