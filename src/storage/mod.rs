//! Graph storage layer
//!
//! Edge list (COO), CSR and CSC graph forms with conversions between them,
//! plus text loading and Parquet persistence.

pub mod array;
mod compressed;
pub mod coo;
pub mod csc;
pub mod csr;
#[cfg(feature = "storage")]
pub mod parquet;
pub mod reader;

pub use array::{Array1D, Placement};
pub use compressed::{Adjacency, AdjacencyView, DISPLAY_NEIGHBOR_CAP, DISPLAY_VERTEX_LIMIT};
pub use coo::{EdgeList, EdgeOrder};
pub use csc::CscGraph;
pub use csr::CsrGraph;
pub use reader::EdgeListReader;
