//! # Buffer State Module
//!
//! Named registry of the GPU buffers the renderer owns: the camera uniform
//! and the face instance buffer that every vertex batch is streamed through.
//!
//! Writes are bounds checked against the size the buffer was created with and
//! usage is tracked per buffer for the startup and frame statistics logs.

use std::collections::HashMap;

use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::StSystem;

/// Usage counters for a single buffer.
#[derive(Debug, Default, Clone, Copy)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    allocated_memory: u64,
    /// High-water mark of bytes written
    used_memory: u64,
    /// Number of writes
    times_written: u64,
}

/// Central manager for GPU buffers.
///
/// Buffers are referenced by `&'static str` names declared next to the code
/// that owns them, e.g. [`super::camera_state::CAMERA_BUFFER_NAME`].
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    buffers: HashMap<&'static str, Buffer>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `device` - Reference to the GPU device
    /// * `queue` - Reference to the GPU command queue
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Creates an uninitialized buffer, replacing any buffer of the same name.
    pub fn create_buffer(&mut self, buffer_name: &'static str, buffer_descriptor: wgpu::BufferDescriptor) {
        let buffer = self.device.get().create_buffer(&buffer_descriptor);
        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: buffer_descriptor.size,
                ..Default::default()
            },
        );
    }

    /// Creates a buffer holding `init_descriptor.contents`.
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let size = init_descriptor.contents.len() as u64;
        let buffer = self.device.get().create_buffer_init(&init_descriptor);
        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: size,
                used_memory: size,
                times_written: 1,
            },
        );
    }

    /// Queues a write of raw bytes into a named buffer.
    ///
    /// # Arguments
    /// * `buffer_name` - Name of the buffer to write to
    /// * `offset` - Byte offset in the buffer to start writing
    /// * `data` - Raw byte data to write
    ///
    /// # Returns
    /// `false` if the buffer is unknown or the write would run past its end,
    /// in which case nothing is written.
    pub fn write_buffer(&mut self, buffer_name: &'static str, offset: wgpu::BufferAddress, data: &[u8]) -> bool {
        let (Some(buffer), Some(analytics)) =
            (self.buffers.get(buffer_name), self.buffer_analytics.get_mut(buffer_name))
        else {
            log::error!("Write to unknown buffer '{}'", buffer_name);
            return false;
        };

        let data_size = data.len() as u64;
        if offset + data_size > analytics.allocated_memory {
            log::error!(
                "Buffer write out of bounds for buffer '{}': {} bytes at offset {} into {} bytes",
                buffer_name,
                data_size,
                offset,
                analytics.allocated_memory
            );
            return false;
        }

        self.queue.get().write_buffer(buffer, offset, data);
        analytics.used_memory = analytics.used_memory.max(offset + data_size);
        analytics.times_written += 1;
        true
    }

    /// Gets a buffer by name.
    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    /// Gets a binding resource covering a whole buffer.
    pub fn get_entire_binding(&self, buffer_name: &'static str) -> Option<wgpu::BindingResource> {
        self.buffers.get(buffer_name).map(Buffer::as_entire_binding)
    }

    /// Total bytes allocated across all buffers.
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.allocated_memory).sum()
    }

    /// Total bytes ever written (high-water marks) across all buffers.
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.used_memory).sum()
    }

    /// Total number of writes across all buffers.
    pub fn get_total_writes(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.times_written).sum()
    }
}
