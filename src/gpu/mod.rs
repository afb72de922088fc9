//! GPU execution of the frontier operators
//!
//! Based on research from:
//! - **Gunrock** (Wang et al., ACM `ToPC` 2017) - GPU graph traversal primitives
//!
//! # Architecture
//!
//! - `device`: wgpu device initialization and buffer readback
//! - `buffer`: device mirror of a CSR graph placed with `Placement::Device`
//!   or `Placement::Mirrored`
//! - `bfs`: BFS whose Advance runs as a WGSL compute kernel
//!
//! # Feature Flag
//!
//! This module is only available with the `gpu` feature flag:
//! ```bash
//! cargo build --features gpu
//! ```

mod bfs;
mod buffer;
mod device;

pub use bfs::gpu_bfs;
pub use buffer::GpuGraphBuffers;
pub use device::{GpuDevice, GpuDeviceError};
