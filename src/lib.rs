//! frontier-graph: frontier-based parallel graph analytics
//!
//! # Overview
//!
//! frontier-graph stores sparse graphs as edge lists (COO), CSR and CSC, and
//! runs traversals as bulk-synchronous supersteps of two operators:
//!
//! - **Advance**: expand every frontier vertex to the neighbors its functor
//!   admits
//! - **Filter**: keep the frontier vertices its functor accepts
//!
//! Algorithms plug in as [`Functor`] implementations. Concurrent workers admit a
//! vertex exactly once by claiming it with an atomic compare-and-swap.
//!
//! # Quick Start
//!
//! ```
//! use frontier_graph::algorithms::{bfs, BfsConfig};
//! use frontier_graph::{CsrGraph, EdgeList};
//!
//! # fn main() -> frontier_graph::Result<()> {
//! // 0 → 1, 0 → 2, 1 → 3, 2 → 3
//! let edges: EdgeList = EdgeList::from_pairs(4, true, vec![(0, 1), (0, 2), (1, 3), (2, 3)], None)?;
//! let graph: CsrGraph = CsrGraph::from_edge_list(&edges)?;
//!
//! let result = bfs(&graph, &BfsConfig::new(0).with_predecessors())?;
//! assert_eq!(result.labels, vec![0, 1, 1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: edge list, CSR and CSC forms with conversions, text loading
//!   and Parquet persistence
//! - **Engine**: [`Frontier`], [`operators`], [`Enactor`]
//! - **Configuration**: explicit [`config::Parameters`] registry
//! - **GPU** (`gpu` feature): WGSL advance kernel over a device-mirrored CSR

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod atomic;
pub mod config;
pub mod enactor;
pub mod error;
pub mod frontier;
pub mod functor;
pub mod operators;
pub mod storage;
pub mod types;

#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use atomic::AtomicArray;
pub use enactor::{Enactor, EnactorConfig, EnactorStats};
pub use error::{GraphError, Result};
pub use frontier::{Frontier, FrontierKind};
pub use functor::Functor;
pub use operators::OperatorConfig;
pub use storage::{
    Adjacency, AdjacencyView, CscGraph, CsrGraph, EdgeList, EdgeListReader, EdgeOrder, Placement,
};
pub use types::{GraphValue, Index, ValueType};

#[cfg(feature = "gpu")]
pub use gpu::{gpu_bfs, GpuDevice, GpuGraphBuffers};
