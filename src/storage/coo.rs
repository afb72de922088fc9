//! Edge-list (coordinate) form of a graph
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! edge_pairs:  [(0, 1), (0, 2), (1, 2)]
//! edge_values: [1.0, 1.0, 1.0]          // optional
//! order:       BySource
//! ```

use super::array::Array1D;
use crate::error::{GraphError, Result};
use crate::types::{GraphValue, Index};

/// Known ordering of an edge list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrder {
    /// Ascending by source vertex
    BySource,
    /// Ascending by destination vertex
    ByDestination,
    /// No known order
    Unordered,
}

/// Edge-list form: `(source, destination)` pairs with optional values
#[derive(Debug, Clone)]
pub struct EdgeList<V: Index = u32, W: GraphValue = f32> {
    nodes: usize,
    directed: bool,
    order: EdgeOrder,
    edge_pairs: Array1D<(V, V)>,
    edge_values: Option<Array1D<W>>,
    node_values: Option<Array1D<W>>,
}

impl<V: Index, W: GraphValue> EdgeList<V, W> {
    /// Create an empty, unallocated edge list
    #[must_use]
    pub const fn new(directed: bool) -> Self {
        Self {
            nodes: 0,
            directed,
            order: EdgeOrder::Unordered,
            edge_pairs: Array1D::new("edge_pairs"),
            edge_values: None,
            node_values: None,
        }
    }

    /// Build from explicit pairs over `nodes` vertices
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an endpoint is `>= nodes` or `values` does
    /// not have one entry per edge
    pub fn from_pairs(
        nodes: usize,
        directed: bool,
        pairs: Vec<(V, V)>,
        values: Option<Vec<W>>,
    ) -> Result<Self> {
        if let Some(values) = &values {
            if values.len() != pairs.len() {
                return Err(GraphError::invalid(format!(
                    "{} edge values for {} edges",
                    values.len(),
                    pairs.len()
                )));
            }
        }
        for (i, &(src, dst)) in pairs.iter().enumerate() {
            check_endpoint(src, nodes, i)?;
            check_endpoint(dst, nodes, i)?;
        }

        Ok(Self {
            nodes,
            directed,
            order: EdgeOrder::Unordered,
            edge_pairs: Array1D::from_vec("edge_pairs", pairs),
            edge_values: values.map(|v| Array1D::from_vec("edge_values", v)),
            node_values: None,
        })
    }

    /// Build from weighted tuples; the vertex count is `max id + 1`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an id cannot be used as an array index
    pub fn from_tuples(edges: &[(V, V, W)], directed: bool) -> Result<Self> {
        let mut nodes = 0;
        for (i, &(src, dst, _)) in edges.iter().enumerate() {
            for id in [src, dst] {
                let idx = id
                    .to_usize()
                    .ok_or_else(|| GraphError::invalid(format!("edge {i}: invalid vertex id {id}")))?;
                nodes = nodes.max(idx.saturating_add(1));
            }
        }

        let pairs = edges.iter().map(|&(s, d, _)| (s, d)).collect();
        let values = edges.iter().map(|&(_, _, w)| w).collect();
        Self::from_pairs(nodes, directed, pairs, Some(values))
    }

    /// Reserve storage for `nodes` vertices and `edges` edges
    ///
    /// Pairs are initialized to `(INVALID, INVALID)`. Edge values are allocated
    /// only if this list already carries values.
    ///
    /// # Errors
    ///
    /// Returns the first allocation error; arrays allocated before it stay
    /// allocated and can be released
    pub fn allocate(&mut self, nodes: usize, edges: usize) -> Result<()> {
        self.nodes = nodes;
        self.edge_pairs.allocate(edges, (V::INVALID, V::INVALID))?;
        if let Some(values) = &mut self.edge_values {
            values.allocate(edges, W::ALL_ZEROS)?;
        }
        if let Some(values) = &mut self.node_values {
            values.allocate(nodes, W::ALL_ZEROS)?;
        }
        Ok(())
    }

    /// Free all arrays; safe to call repeatedly
    pub fn release(&mut self) {
        self.edge_pairs.release();
        if let Some(values) = &mut self.edge_values {
            values.release();
        }
        if let Some(values) = &mut self.node_values {
            values.release();
        }
    }

    /// Number of vertices
    #[must_use]
    pub const fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of edges
    #[must_use]
    pub fn edges(&self) -> usize {
        self.edge_pairs.len()
    }

    /// Whether the graph is directed
    #[must_use]
    pub const fn directed(&self) -> bool {
        self.directed
    }

    /// Known edge order
    #[must_use]
    pub const fn order(&self) -> EdgeOrder {
        self.order
    }

    /// `(source, destination)` pairs
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pairs are released or device-only
    pub fn pairs(&self) -> Result<&[(V, V)]> {
        self.edge_pairs.as_slice()
    }

    /// Writable pairs, e.g. to fill a list built with [`EdgeList::allocate`]
    ///
    /// The recorded order becomes `Unordered`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pairs are released or device-only
    pub fn pairs_mut(&mut self) -> Result<&mut [(V, V)]> {
        let pairs = self.edge_pairs.as_mut_slice()?;
        self.order = EdgeOrder::Unordered;
        Ok(pairs)
    }

    /// Writable per-edge values, if present
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the values are released or device-only
    pub fn edge_values_mut(&mut self) -> Result<Option<&mut [W]>> {
        self.edge_values
            .as_mut()
            .map(Array1D::as_mut_slice)
            .transpose()
    }

    /// Per-edge values, if present
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the values are released or device-only
    pub fn edge_values(&self) -> Result<Option<&[W]>> {
        self.edge_values.as_ref().map(Array1D::as_slice).transpose()
    }

    /// Per-node values, if present
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the values are released or device-only
    pub fn node_values(&self) -> Result<Option<&[W]>> {
        self.node_values.as_ref().map(Array1D::as_slice).transpose()
    }

    /// Attach one value per vertex
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `values.len() != nodes`
    pub fn set_node_values(&mut self, values: Vec<W>) -> Result<()> {
        if values.len() != self.nodes {
            return Err(GraphError::invalid(format!(
                "{} node values for {} nodes",
                values.len(),
                self.nodes
            )));
        }
        self.node_values = Some(Array1D::from_vec("node_values", values));
        Ok(())
    }

    /// Iterate `(source, destination, value)` tuples in storage order
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn tuples(&self) -> Result<impl Iterator<Item = (V, V, Option<W>)> + '_> {
        let pairs = self.pairs()?;
        let values = self.edge_values()?;
        Ok(pairs
            .iter()
            .enumerate()
            .map(move |(i, &(s, d))| (s, d, values.map(|v| v[i]))))
    }

    /// Sort edges ascending on the given dimension; values move with their edge
    ///
    /// Ties on the sort dimension are broken by the other endpoint. Sorting with
    /// [`EdgeOrder::Unordered`] is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arrays are not host-readable
    pub fn sort(&mut self, order: EdgeOrder) -> Result<()> {
        if order == EdgeOrder::Unordered || order == self.order {
            return Ok(());
        }

        let permutation = self.sorted_permutation(order)?;
        let pairs = self.edge_pairs.as_mut_slice()?;
        let sorted: Vec<(V, V)> = permutation.iter().map(|&i| pairs[i]).collect();
        pairs.copy_from_slice(&sorted);

        if let Some(values) = &mut self.edge_values {
            let values = values.as_mut_slice()?;
            let sorted: Vec<W> = permutation.iter().map(|&i| values[i]).collect();
            values.copy_from_slice(&sorted);
        }

        self.order = order;
        Ok(())
    }

    /// Positions of the edges in ascending `order`, without moving them
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pairs are not host-readable
    pub fn sorted_permutation(&self, order: EdgeOrder) -> Result<Vec<usize>> {
        let pairs = self.pairs()?;
        let mut permutation: Vec<usize> = (0..pairs.len()).collect();
        if order == self.order || order == EdgeOrder::Unordered {
            return Ok(permutation);
        }
        match order {
            EdgeOrder::BySource => permutation.sort_unstable_by_key(|&i| pairs[i]),
            EdgeOrder::ByDestination => {
                permutation.sort_unstable_by_key(|&i| (pairs[i].1, pairs[i].0));
            }
            EdgeOrder::Unordered => {}
        }
        Ok(permutation)
    }

    /// Add the reverse of every non-loop edge (for undirected input)
    ///
    /// # Errors
    ///
    /// Returns `Allocation` if the doubled arrays cannot be reserved
    pub fn symmetrize(&mut self) -> Result<()> {
        let pairs = self.pairs()?;
        let values = self.edge_values()?;

        let extra = pairs.iter().filter(|(s, d)| s != d).count();
        let total = pairs.len() + extra;

        let mut new_pairs = Vec::new();
        new_pairs
            .try_reserve_exact(total)
            .map_err(|_| GraphError::allocation("edge_pairs", total))?;
        let mut new_values = Vec::new();
        if values.is_some() {
            new_values
                .try_reserve_exact(total)
                .map_err(|_| GraphError::allocation("edge_values", total))?;
        }

        new_pairs.extend_from_slice(pairs);
        if let Some(values) = values {
            new_values.extend_from_slice(values);
        }
        for (i, &(s, d)) in pairs.iter().enumerate() {
            if s != d {
                new_pairs.push((d, s));
                if let Some(values) = values {
                    new_values.push(values[i]);
                }
            }
        }

        let has_values = values.is_some();
        self.edge_pairs = Array1D::from_vec("edge_pairs", new_pairs);
        if has_values {
            self.edge_values = Some(Array1D::from_vec("edge_values", new_values));
        }
        self.directed = false;
        self.order = EdgeOrder::Unordered;
        Ok(())
    }

    pub(crate) fn assemble(
        nodes: usize,
        directed: bool,
        order: EdgeOrder,
        pairs: Vec<(V, V)>,
        edge_values: Option<Vec<W>>,
        node_values: Option<Vec<W>>,
    ) -> Self {
        Self {
            nodes,
            directed,
            order,
            edge_pairs: Array1D::from_vec("edge_pairs", pairs),
            edge_values: edge_values.map(|v| Array1D::from_vec("edge_values", v)),
            node_values: node_values.map(|v| Array1D::from_vec("node_values", v)),
        }
    }
}

fn check_endpoint<V: Index>(id: V, nodes: usize, edge: usize) -> Result<()> {
    match id.to_usize() {
        Some(idx) if idx < nodes => Ok(()),
        _ => Err(GraphError::invalid(format!(
            "edge {edge}: vertex {id} out of range for {nodes} nodes"
        ))),
    }
}
