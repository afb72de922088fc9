//! Arrays of atomic cells for per-vertex traversal state
//!
//! The only synchronization primitive operators rely on is
//! [`AtomicArray::compare_and_swap`]: under any number of concurrent callers
//! targeting the same slot with the same expected value, exactly one succeeds.

use crate::error::{GraphError, Result};
use crate::storage::Placement;
use crate::types::{AtomicCell, Index};
use rayon::prelude::*;
use std::fmt;

/// Fixed-length array of atomic `T` cells
pub struct AtomicArray<T: Index> {
    name: &'static str,
    cells: Vec<T::Atomic>,
    placement: Placement,
}

impl<T: Index> AtomicArray<T> {
    /// Create an empty (released) array
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cells: Vec::new(),
            placement: Placement::Host,
        }
    }

    /// Reserve `len` cells set to `fill`; keeps contents if already that size
    ///
    /// # Errors
    ///
    /// Returns `Allocation` if the cells cannot be reserved
    pub fn allocate(&mut self, len: usize, fill: T) -> Result<()> {
        if self.cells.len() == len && len > 0 {
            return Ok(());
        }
        self.release();

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GraphError::allocation(self.name, len))?;
        cells.extend((0..len).map(|_| T::Atomic::with_value(fill)));
        self.cells = cells;
        Ok(())
    }

    /// Free the cells; safe to call repeatedly
    pub fn release(&mut self) {
        self.cells = Vec::new();
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the array has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current placement
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Change the placement directive
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Set every cell to `value` (in parallel)
    pub fn fill(&self, value: T) {
        self.cells.par_iter().for_each(|cell| cell.store_value(value));
    }

    /// Current value at `index`; `None` if out of range
    #[must_use]
    pub fn load(&self, index: usize) -> Option<T> {
        self.cells.get(index).map(AtomicCell::load_value)
    }

    /// Overwrite `index`; returns `false` if out of range
    ///
    /// Only safe to use on a slot the caller has exclusively claimed.
    pub fn store(&self, index: usize, value: T) -> bool {
        self.cells.get(index).map_or(false, |cell| {
            cell.store_value(value);
            true
        })
    }

    /// Atomically replace `expected` with `new` at `index`
    ///
    /// Returns `true` only for the caller whose swap took effect.
    pub fn compare_and_swap(&self, index: usize, expected: T, new: T) -> bool {
        self.cells
            .get(index)
            .is_some_and(|cell| cell.compare_exchange_value(expected, new).is_ok())
    }

    /// Copy of the current contents
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.cells.iter().map(AtomicCell::load_value).collect()
    }

    /// Copy of the current contents, honoring the placement directive
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is device-only
    pub fn host_snapshot(&self) -> Result<Vec<T>> {
        if !self.placement.on_host() {
            return Err(GraphError::invalid(format!(
                "array `{}` is device-only",
                self.name
            )));
        }
        Ok(self.snapshot())
    }
}

impl<T: Index> fmt::Debug for AtomicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicArray")
            .field("name", &self.name)
            .field("len", &self.cells.len())
            .field("placement", &self.placement)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_allocate_fill_snapshot() {
        let mut array: AtomicArray<u32> = AtomicArray::new("labels");
        array.allocate(3, u32::MAX).unwrap();
        assert_eq!(array.snapshot(), vec![u32::MAX; 3]);

        array.fill(7);
        assert!(array.store(1, 2));
        assert!(!array.store(3, 2));
        assert_eq!(array.snapshot(), vec![7, 2, 7]);

        array.release();
        array.release();
        assert!(array.is_empty());
        assert_eq!(array.load(0), None);
    }

    #[test]
    fn test_compare_and_swap_single_winner() {
        let mut array: AtomicArray<i64> = AtomicArray::new("predecessors");
        array.allocate(1, -1).unwrap();
        let winners = AtomicUsize::new(0);

        (0..10_000_i64).into_par_iter().for_each(|src| {
            if array.compare_and_swap(0, -1, src) {
                winners.fetch_add(1, Ordering::Relaxed);
            }
        });

        assert_eq!(winners.load(Ordering::Relaxed), 1);
        assert_ne!(array.load(0), Some(-1));
    }

    #[test]
    fn test_placement_gates_host_snapshot() {
        let mut array: AtomicArray<u32> = AtomicArray::new("labels");
        array.allocate(2, 0).unwrap();
        assert_eq!(array.placement(), Placement::Host);

        array.set_placement(Placement::Device);
        let err = array.host_snapshot().unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
        assert!(format!("{array:?}").contains("Device"));

        array.set_placement(Placement::Mirrored);
        assert_eq!(array.host_snapshot().unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_oversized_allocation_fails() {
        let mut array: AtomicArray<u64> = AtomicArray::new("labels");
        let err = array.allocate(usize::MAX / 2, 0).unwrap_err();
        assert!(matches!(err, GraphError::Allocation { .. }));
        assert!(array.is_empty());
    }

    #[test]
    fn test_out_of_range_cas_fails() {
        let mut array: AtomicArray<u32> = AtomicArray::new("labels");
        array.allocate(2, u32::MAX).unwrap();
        assert!(!array.compare_and_swap(5, u32::MAX, 0));
    }
}
