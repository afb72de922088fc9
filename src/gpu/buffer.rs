//! Device mirror of a CSR graph
//!
//! Only graphs whose arrays are placed on the device (`Placement::Device` or
//! `Placement::Mirrored`) are uploaded. The upload finishes before
//! [`GpuGraphBuffers::mirror`] returns, so the next kernel sees the data.

use super::GpuDevice;
use crate::storage::CsrGraph;
use anyhow::{bail, Result};
use tracing::debug;

/// GPU buffers for a CSR graph with `u32` ids and offsets
#[derive(Debug)]
pub struct GpuGraphBuffers {
    num_nodes: usize,
    num_edges: usize,

    /// `row_offsets` (size: `num_nodes + 1`)
    pub row_offsets: wgpu::Buffer,

    /// `col_indices` (size: `num_edges`, at least one slot)
    pub col_indices: wgpu::Buffer,
}

impl GpuGraphBuffers {
    /// Upload a device-placed graph
    ///
    /// # Errors
    ///
    /// Returns error if the graph is host-only or unallocated, has more
    /// vertices than a `u32` id can name, or has an array larger than one
    /// storage binding
    pub fn mirror(device: &GpuDevice, graph: &CsrGraph<u32, u32, f32>) -> Result<Self> {
        if !graph.placement().on_device() {
            bail!("graph arrays are host-only; set Placement::Device or Placement::Mirrored first");
        }

        let arrays = graph.arrays();
        let offsets = arrays.offsets.staging_slice();
        let indices = arrays.indices.staging_slice();
        let num_nodes = graph.num_nodes();
        let num_edges = graph.num_edges();

        if offsets.len() != num_nodes + 1 || indices.len() != num_edges {
            bail!("graph arrays are not allocated");
        }
        if u32::try_from(num_nodes).map_or(true, |n| n == u32::MAX) {
            bail!("{num_nodes} vertices do not fit u32 ids");
        }
        let max_words = device.max_binding_words();
        if offsets.len() > max_words || indices.len() > max_words {
            bail!(
                "graph with {num_nodes} vertices and {num_edges} edges exceeds the \
                 device binding limit of {max_words} words"
            );
        }

        let usage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST;
        let row_offsets = device.create_buffer_init("CSR row_offsets", offsets, usage);
        let col_indices = device.create_buffer_init("CSR col_indices", indices, usage);
        device.device().poll(wgpu::Maintain::Wait);

        debug!(num_nodes, num_edges, "mirrored graph to device");
        Ok(Self {
            num_nodes,
            num_edges,
            row_offsets,
            col_indices,
        })
    }

    /// Get number of nodes
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Get number of edges
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.num_edges
    }
}
