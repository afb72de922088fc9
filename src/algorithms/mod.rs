//! Graph algorithms expressed as functors over the frontier engine

pub mod bfs;

pub use bfs::{bfs, BfsConfig, BfsFunctor, BfsProblem, BfsResult};
