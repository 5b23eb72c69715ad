//! Manages the face render pipeline and the per-frame render passes.
//!
//! # Architecture
//!
//! - `PipelineManager`: Owns the face pipeline, bind groups, depth texture and
//!   the face instance buffer
//! - `RenderFrame`: One acquired surface texture. Implements
//!   [`VertexBatchSubmitter`] so the mesher's batches are drawn as they flush
//!
//! Each batch is uploaded into the same instance buffer and drawn in its own
//! render pass and submission. The first pass of a frame clears color and
//! depth, later passes load them, so batches accumulate into one image.

use log::debug;
use wgpu::{
    CommandEncoder, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, SurfaceError,
    SurfaceTexture, TextureFormat, TextureView,
};

use crate::{core::StSystem, engine_state::buffer_state::BufferState};

use super::{
    bind_group_state::BindGroupState, meshing::VertexBatchSubmitter, texture, vertex::FaceVertex,
};

/// Name of the GPU buffer every face batch is streamed through
pub const FACE_BUFFER_NAME: &str = "face_instance_buffer";

/// Sky color behind the terrain.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.9,
    b: 1.0,
    a: 1.0,
};

/// Vertices per face: two triangles expanded in the vertex shader.
const VERTICES_PER_FACE: u32 = 6;

/// Owns the face pipeline and the resources it draws with.
pub struct PipelineManager {
    pub bind_group_state: BindGroupState,
    pub buffer_state: StSystem<BufferState>,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    face_pipeline: RenderPipeline,
    batch_capacity: usize,
}

impl PipelineManager {
    /// Creates the face pipeline and allocates the instance buffer.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - Surface configuration, for the depth texture size
    /// * `texture_format` - The color target format
    /// * `buffer_state` - Buffer registry the instance buffer is created in
    /// * `shader_string` - WGSL source with `vs_main` and `fs_main`
    /// * `bind_group_state` - Camera and texture bind groups
    /// * `batch_capacity` - Most faces a single batch can hold
    pub fn new(
        device: &Device,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        bind_group_state: BindGroupState,
        batch_capacity: usize,
    ) -> Self {
        let batch_capacity = batch_capacity.max(1);
        let depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Face Render Pipeline Layout"),
            bind_group_layouts: &bind_group_state.layouts(),
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Face Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_string.into()),
        });

        let face_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Face Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[FaceVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Face winding differs per orientation, so both sides are kept
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        buffer_state.get_mut().create_buffer(
            FACE_BUFFER_NAME,
            wgpu::BufferDescriptor {
                label: Some(FACE_BUFFER_NAME),
                size: (batch_capacity * std::mem::size_of::<FaceVertex>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            },
        );

        Self {
            bind_group_state,
            buffer_state,
            depth_texture,
            face_pipeline,
            batch_capacity,
        }
    }

    /// Most faces one batch may carry.
    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }

    /// Acquires the next surface texture and starts a frame.
    ///
    /// # Errors
    /// Whatever the surface reports; the caller decides whether to
    /// reconfigure or skip.
    pub fn begin_frame<'a>(
        &'a self,
        surface: &Surface,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
    ) -> Result<RenderFrame<'a>, SurfaceError> {
        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());
        Ok(RenderFrame {
            manager: self,
            device,
            queue,
            frame,
            view,
            passes: 0,
        })
    }

    /// Handles window resize events by recreating the depth texture.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }
}

/// A frame in flight. Dropping it without [`RenderFrame::present`] discards
/// the image.
pub struct RenderFrame<'a> {
    manager: &'a PipelineManager,
    device: StSystem<Device>,
    queue: StSystem<Queue>,
    frame: SurfaceTexture,
    view: TextureView,
    passes: u32,
}

impl RenderFrame<'_> {
    /// Presents the frame, clearing it first if no batch was drawn.
    pub fn present(mut self) {
        if self.passes == 0 {
            let mut encoder = self.device.get().create_command_encoder(&Default::default());
            self.encode_pass(&mut encoder, 0);
            self.queue.get().submit([encoder.finish()]);
        }
        self.frame.present();
    }

    /// Records one render pass drawing `instances` faces from the instance
    /// buffer, clearing the targets if it is the frame's first pass.
    fn encode_pass(&mut self, encoder: &mut CommandEncoder, instances: u32) {
        let first = self.passes == 0;
        let (color_load, depth_load) = if first {
            (wgpu::LoadOp::Clear(CLEAR_COLOR), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        let manager = self.manager;
        let buffer_state = manager.buffer_state.get();
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Face Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &manager.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        if instances > 0 {
            if let Some(face_buffer) = buffer_state.get_buffer(FACE_BUFFER_NAME) {
                rpass.set_pipeline(&manager.face_pipeline);
                rpass.set_bind_group(0, &manager.bind_group_state.camera_bind_group, &[]);
                rpass.set_bind_group(1, &manager.bind_group_state.texture_bind_group, &[]);
                rpass.set_vertex_buffer(0, face_buffer.slice(..));
                rpass.draw(0..VERTICES_PER_FACE, 0..instances);
            }
        }

        drop(rpass);
        self.passes += 1;
    }
}

impl VertexBatchSubmitter for RenderFrame<'_> {
    fn submit_batch(&mut self, batch: &[FaceVertex]) {
        // The sink never hands over more than the buffer was sized for, but
        // a batch that does not fit is drawn truncated rather than dropped.
        let batch = &batch[..batch.len().min(self.manager.batch_capacity)];
        let written = self.manager.buffer_state.get_mut().write_buffer(
            FACE_BUFFER_NAME,
            0,
            bytemuck::cast_slice(batch),
        );
        if !written {
            return;
        }

        let mut encoder = self.device.get().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Face Batch Encoder"),
        });
        self.encode_pass(&mut encoder, batch.len() as u32);
        self.queue.get().submit([encoder.finish()]);
        debug!("Drew batch of {} faces (pass {})", batch.len(), self.passes);
    }
}
