//! Frontiers: the active set of a traversal step
//!
//! A frontier is either a list of vertex ids or a list of edge ids. Duplicates
//! are allowed in general; an operator whose functor claims slots atomically
//! produces none.

use crate::types::Index;

/// What the ids in a frontier refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierKind {
    /// Vertex ids
    Vertex,
    /// Edge ids (positions in a compressed graph's index array)
    Edge,
}

/// Ordered list of vertex or edge ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier<T> {
    kind: FrontierKind,
    items: Vec<T>,
}

impl<T: Index> Frontier<T> {
    /// Empty frontier of the given kind
    #[must_use]
    pub const fn new(kind: FrontierKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Vertex frontier holding `items`
    #[must_use]
    pub const fn vertices(items: Vec<T>) -> Self {
        Self {
            kind: FrontierKind::Vertex,
            items,
        }
    }

    /// Edge frontier holding `items`
    #[must_use]
    pub const fn edges(items: Vec<T>) -> Self {
        Self {
            kind: FrontierKind::Edge,
            items,
        }
    }

    /// Vertex frontier containing only `source`
    #[must_use]
    pub fn seed(source: T) -> Self {
        Self::vertices(vec![source])
    }

    /// Kind of ids held
    #[must_use]
    pub const fn kind(&self) -> FrontierKind {
        self.kind
    }

    /// Number of ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the frontier is empty (traversal has converged)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in order
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the ids
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Drop all ids, keeping the kind and capacity
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
