//! GPU BFS: device advance, host filter
//!
//! Each superstep uploads the frontier, runs one invocation per frontier vertex
//! (see `shaders/advance_bfs.wgsl`), waits for the queue to drain, and reads the
//! admitted vertices back. The host then applies Filter before the next step.

use super::{GpuDevice, GpuGraphBuffers};
use crate::algorithms::{BfsConfig, BfsResult};
use crate::enactor::EnactorStats;
use crate::frontier::Frontier;
use crate::functor::AcceptAll;
use crate::operators::filter;
use anyhow::{bail, Result};
use std::time::Instant;
use tracing::{debug, info};

const WORKGROUP_SIZE: u32 = 256;
const SHADER: &str = include_str!("shaders/advance_bfs.wgsl");

/// Uniform block of the advance kernel
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct AdvanceParams {
    frontier_len: u32,
    mark_predecessors: u32,
    num_nodes: u32,
    _padding: u32,
}

fn buffer_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

const fn storage(read_only: bool) -> wgpu::BufferBindingType {
    wgpu::BufferBindingType::Storage { read_only }
}

/// Run BFS on a mirrored graph
///
/// `edges_visited` in the returned stats stays 0: the device does not count
/// offered edges.
///
/// # Errors
///
/// Returns error if the source is not a vertex, the frontier outgrows the
/// dispatch limit, or result readback fails
///
/// # Example
///
/// ```ignore
/// # use frontier_graph::gpu::{gpu_bfs, GpuDevice, GpuGraphBuffers};
/// # use frontier_graph::{algorithms::BfsConfig, CsrGraph, Placement};
/// # async fn example() -> anyhow::Result<()> {
/// let device = GpuDevice::new().await?;
/// let mut graph: CsrGraph = CsrGraph::from_tuples(&[(0, 1, 1.0), (1, 2, 1.0)])?;
/// graph.set_placement(Placement::Mirrored);
///
/// let buffers = GpuGraphBuffers::mirror(&device, &graph)?;
/// let result = gpu_bfs(&device, &buffers, &BfsConfig::new(0)).await?;
/// assert_eq!(result.labels, vec![0, 1, 2]);
/// # Ok(())
/// # }
/// ```
#[allow(clippy::too_many_lines)]
#[allow(clippy::cast_possible_truncation)]
pub async fn gpu_bfs(
    device: &GpuDevice,
    buffers: &GpuGraphBuffers,
    config: &BfsConfig,
) -> Result<BfsResult<u32>> {
    let num_nodes = buffers.num_nodes();
    if config.source >= num_nodes {
        bail!("source vertex {} out of range for {num_nodes} vertices", config.source);
    }
    let source = config.source as u32;

    let shader_module = device
        .device()
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("BFS Advance Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

    let bind_group_layout =
        device
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("BFS Advance Bind Group Layout"),
                entries: &[
                    buffer_entry(0, wgpu::BufferBindingType::Uniform),
                    buffer_entry(1, storage(true)),
                    buffer_entry(2, storage(true)),
                    buffer_entry(3, storage(true)),
                    buffer_entry(4, storage(false)),
                    buffer_entry(5, storage(false)),
                    buffer_entry(6, storage(false)),
                    buffer_entry(7, storage(false)),
                ],
            });

    let pipeline_layout = device
        .device()
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("BFS Advance Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

    let compute_pipeline =
        device
            .device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("BFS Advance Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader_module,
                entry_point: "advance",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

    // Per-vertex state: labels[source] = 0, everything else invalid
    let mut initial_labels = vec![u32::MAX; num_nodes];
    initial_labels[config.source] = 0;
    let state_usage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC;
    let labels_buffer = device.create_buffer_init("BFS labels", &initial_labels, state_usage);
    let predecessors_buffer =
        device.create_buffer_init("BFS predecessors", &vec![u32::MAX; num_nodes], state_usage);

    let params_buffer = device.create_buffer_init(
        "BFS Params",
        bytemuck::cast_slice(&[AdvanceParams {
            frontier_len: 0,
            mark_predecessors: u32::from(config.mark_predecessors),
            num_nodes: num_nodes as u32,
            _padding: 0,
        }]),
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    );
    // Every vertex enters at most one frontier, so `num_nodes` slots suffice
    let input_buffer = device.create_buffer(
        "BFS input frontier",
        num_nodes,
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    );
    let output_buffer = device.create_buffer(
        "BFS output frontier",
        num_nodes,
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
    );
    let output_len_buffer = device.create_buffer_init(
        "BFS output length",
        &[0],
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
    );

    let bind_group = device
        .device()
        .create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("BFS Advance Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.row_offsets.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.col_indices.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: input_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: labels_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: predecessors_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 7,
                    resource: output_len_buffer.as_entire_binding(),
                },
            ],
        });

    let start = Instant::now();
    let mut stats = EnactorStats::default();
    let mut frontier = Frontier::seed(source);
    let max_workgroups = device.device().limits().max_compute_workgroups_per_dimension;

    while !frontier.is_empty() {
        if config
            .enactor
            .max_iterations
            .is_some_and(|cap| stats.iterations >= cap)
        {
            stats.hit_iteration_cap = true;
            break;
        }

        let frontier_len = frontier.len() as u32;
        let num_workgroups = frontier_len.div_ceil(WORKGROUP_SIZE);
        if num_workgroups > max_workgroups {
            bail!("frontier of {frontier_len} vertices exceeds the dispatch limit");
        }

        let queue = device.queue();
        queue.write_buffer(&input_buffer, 0, bytemuck::cast_slice(frontier.as_slice()));
        queue.write_buffer(
            &params_buffer,
            0,
            bytemuck::bytes_of(&AdvanceParams {
                frontier_len,
                mark_predecessors: u32::from(config.mark_predecessors),
                num_nodes: num_nodes as u32,
                _padding: 0,
            }),
        );
        queue.write_buffer(&output_len_buffer, 0, bytemuck::bytes_of(&0u32));

        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("BFS Advance Encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("BFS Advance Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&compute_pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            compute_pass.dispatch_workgroups(num_workgroups, 1, 1);
        }
        queue.submit(Some(encoder.finish()));
        device.device().poll(wgpu::Maintain::Wait);

        let produced = device
            .read_u32s(&output_len_buffer, 1)
            .await?
            .first()
            .copied()
            .unwrap_or(0) as usize;
        let admitted = device.read_u32s(&output_buffer, produced.min(num_nodes)).await?;

        let next = filter(
            &Frontier::vertices(admitted),
            &AcceptAll,
            &config.enactor.operator,
        )?;
        debug!(
            iteration = stats.iterations,
            input = frontier.len(),
            advanced = produced,
            output = next.len(),
            "gpu superstep"
        );

        stats.iterations += 1;
        stats.vertices_admitted += next.len();
        stats.frontier_sizes.push(next.len());
        frontier = next;
    }
    stats.elapsed = start.elapsed();

    let labels = device.read_u32s(&labels_buffer, num_nodes).await?;
    let predecessors = if config.mark_predecessors {
        Some(device.read_u32s(&predecessors_buffer, num_nodes).await?)
    } else {
        None
    };

    let result = BfsResult {
        labels,
        predecessors,
        stats,
    };
    info!(
        source = config.source,
        visited = result.visited_count(),
        depth = result.stats.iterations,
        "gpu bfs complete"
    );
    Ok(result)
}
