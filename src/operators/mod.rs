//! Bulk-synchronous frontier operators
//!
//! - [`advance`]: expand each frontier vertex to the neighbors its functor admits
//! - [`advance_edges`]: same traversal, emitting edge ids
//! - [`filter`]: keep the frontier vertices its functor accepts
//!
//! Each call is one step: all of its work completes before it returns, so the
//! next step observes every write made during this one.

mod advance;
mod filter;

pub use advance::{advance, advance_edges, Advanced};
pub use filter::filter;

/// Frontier size below which operators stay on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Tuning shared by all operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Frontiers at least this long are processed with rayon
    pub parallel_threshold: usize,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl OperatorConfig {
    /// Always run on the rayon pool
    #[must_use]
    pub const fn parallel() -> Self {
        Self {
            parallel_threshold: 0,
        }
    }

    /// Never leave the calling thread
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    pub(crate) const fn use_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }
}
