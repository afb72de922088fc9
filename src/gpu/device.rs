//! GPU device initialization and buffer readback
//!
//! Handles wgpu device creation, adapter selection, and copying results back
//! to the host.

use anyhow::{Context, Result};
use thiserror::Error;
use wgpu::util::DeviceExt;

/// GPU device initialization errors
#[derive(Debug, Error)]
pub enum GpuDeviceError {
    /// No compatible GPU adapter found
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(String),
}

/// GPU device wrapper for frontier operators
///
/// # Example
///
/// ```ignore
/// # use frontier_graph::gpu::GpuDevice;
/// let device = GpuDevice::new().await?;
/// println!("{}", device.info().name);
/// ```
#[derive(Debug)]
pub struct GpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter: wgpu::Adapter,
}

impl GpuDevice {
    /// Check if GPU is available without keeping a device
    ///
    /// Tests use this to skip when no adapter is present.
    pub async fn is_gpu_available() -> bool {
        Self::new().await.is_ok()
    }

    /// Initialize GPU device with default settings
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if no adapter is found or the device request
    /// fails
    pub async fn new() -> Result<Self, GpuDeviceError> {
        Self::new_with_backend(wgpu::Backends::all()).await
    }

    /// Initialize GPU device with specific backend
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if device initialization fails
    pub async fn new_with_backend(backends: wgpu::Backends) -> Result<Self, GpuDeviceError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuDeviceError::NoAdapter)?;

        // CSR arrays of large graphs exceed the default 128 MiB binding size
        let supported = adapter.limits();
        let required_limits = wgpu::Limits {
            max_storage_buffer_binding_size: supported.max_storage_buffer_binding_size,
            max_buffer_size: supported.max_buffer_size,
            ..wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("frontier-graph GPU device"),
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| GpuDeviceError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            adapter,
        })
    }

    /// Get adapter info (GPU name, backend, etc.)
    #[must_use]
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Create a buffer holding `contents`
    ///
    /// Empty contents get one zero word, since zero-sized storage bindings
    /// are invalid.
    #[must_use]
    pub fn create_buffer_init(
        &self,
        label: &str,
        contents: &[u32],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        let contents = if contents.is_empty() { &[0][..] } else { contents };
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(contents),
                usage,
            })
    }

    /// Create an uninitialized buffer of `words` u32 slots (at least one)
    #[must_use]
    pub fn create_buffer(&self, label: &str, words: usize, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: word_bytes(words.max(1)),
            usage,
            mapped_at_creation: false,
        })
    }

    /// Copy the first `count` u32 words of `buffer` back to the host
    ///
    /// `buffer` must have `COPY_SRC` usage. Blocks until all previously
    /// submitted work has finished.
    ///
    /// # Errors
    ///
    /// Returns error if mapping the staging buffer fails
    pub async fn read_u32s(&self, buffer: &wgpu::Buffer, count: usize) -> Result<Vec<u32>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let size = word_bytes(count);
        let staging_buffer = self.create_buffer(
            "Readback Staging",
            count,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        encoder.copy_buffer_to_buffer(buffer, 0, &staging_buffer, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..size);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();

        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device.poll(wgpu::Maintain::Wait);
        rx.receive()
            .await
            .context("Failed to receive map result")?
            .context("Buffer mapping failed")?;

        let data = buffer_slice.get_mapped_range();
        let values: Vec<u32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging_buffer.unmap();

        Ok(values)
    }

    /// Largest number of u32 words one storage binding can hold
    #[must_use]
    pub fn max_binding_words(&self) -> usize {
        let limits = self.device.limits();
        let bytes = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        usize::try_from(bytes / word_bytes(1)).unwrap_or(usize::MAX)
    }

    /// Get device reference
    #[must_use]
    pub const fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get queue reference
    #[must_use]
    pub const fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

pub(crate) const fn word_bytes(words: usize) -> u64 {
    (words * std::mem::size_of::<u32>()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpu_device_with_invalid_backend() {
        let device = GpuDevice::new_with_backend(wgpu::Backends::empty()).await;
        assert!(
            device.is_err(),
            "Device creation should fail with empty backends"
        );
    }

    #[test]
    fn test_gpu_device_error_display() {
        let err = GpuDeviceError::NoAdapter;
        assert_eq!(err.to_string(), "No compatible GPU adapter found");

        let err = GpuDeviceError::DeviceRequest("test error".to_string());
        assert_eq!(err.to_string(), "Failed to request GPU device: test error");
    }

    #[tokio::test]
    async fn test_buffer_roundtrip() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_buffer_roundtrip: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let buffer = device.create_buffer_init(
            "roundtrip",
            &[1, 2, 3, 4],
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        );

        assert_eq!(device.read_u32s(&buffer, 3).await.unwrap(), vec![1, 2, 3]);
        assert!(device.read_u32s(&buffer, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_contents_padded() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_empty_contents_padded: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let buffer = device.create_buffer_init("empty", &[], wgpu::BufferUsages::STORAGE);
        assert_eq!(buffer.size(), 4);
    }

    #[tokio::test]
    async fn test_binding_limit_follows_adapter() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_binding_limit_follows_adapter: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let adapter_words = device.adapter.limits().max_storage_buffer_binding_size as usize / 4;
        assert!(device.max_binding_words() > 0);
        assert!(device.max_binding_words() <= adapter_words);
    }
}
