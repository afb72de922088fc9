//! Per-element callbacks plugged into the operators
//!
//! Advance calls `cond_edge` for every edge leaving a frontier vertex and
//! `apply_edge` for each edge it admits; Filter does the same per vertex with
//! `cond_vertex`/`apply_vertex`. All four run concurrently across workers, so
//! any shared state a functor touches must be atomic. A condition that claims a
//! destination must do so with a compare-and-swap so that exactly one incoming
//! edge wins.

use crate::types::Index;

/// Algorithm-specific edge and vertex callbacks
pub trait Functor<V: Index>: Sync {
    /// Whether edge `edge` from `src` to `dst` should be admitted
    fn cond_edge(&self, src: V, dst: V, edge: usize) -> bool;

    /// Side effect for an admitted edge
    fn apply_edge(&self, _src: V, _dst: V, _edge: usize) {}

    /// Whether vertex `v` stays in the frontier
    ///
    /// Defaults to dropping the invalid sentinel.
    fn cond_vertex(&self, v: V) -> bool {
        !v.is_invalid()
    }

    /// Side effect for a kept vertex
    fn apply_vertex(&self, _v: V) {}
}

/// Admits every edge and keeps every valid vertex
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<V: Index> Functor<V> for AcceptAll {
    fn cond_edge(&self, _src: V, _dst: V, _edge: usize) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vertex_condition_drops_invalid() {
        assert!(Functor::<u32>::cond_vertex(&AcceptAll, 7));
        assert!(!Functor::<u32>::cond_vertex(&AcceptAll, u32::MAX));
        assert!(!Functor::<i32>::cond_vertex(&AcceptAll, -1));
    }
}
