//! Rendering system for the voxel engine.
//!
//! Every frame the whole grid is meshed on the CPU and streamed to the GPU in
//! fixed-size batches, each drawn as soon as it fills.

use log::{info, warn};
use pipeline_manager::PipelineManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceError};

use crate::core::StSystem;

use super::{
    buffer_state::BufferState, camera_state::CAMERA_BUFFER_NAME, error::EngineError,
    voxels::grid::VoxelGrid,
};

mod bind_group_state;
pub mod meshing;
pub mod pipeline_manager;
pub mod texture;
pub mod vertex;

pub use meshing::{SinkTotals, StreamingVertexSink};
pub use texture::TextureLayers;
pub use vertex::FaceVertex;

/// Owns the surface and draws the world onto it.
pub struct Renderer {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    pub device: StSystem<Device>,
    pub queue: StSystem<Queue>,
    pub pipeline_manager: PipelineManager,
    /// Reused between frames so meshing does not reallocate
    face_scratch: Vec<FaceVertex>,
}

impl Renderer {
    /// Creates the renderer.
    ///
    /// The camera uniform buffer must already exist in `buffer_state`.
    ///
    /// # Arguments
    /// * `surface` - The configured surface to render to
    /// * `surface_config` - Configuration the surface was configured with
    /// * `buffer_state` - Buffer registry holding the camera buffer
    /// * `shader_string` - WGSL source of the face shader
    /// * `texture_layers` - Block texture pixels
    /// * `batch_capacity` - Faces per GPU batch
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        texture_layers: &TextureLayers,
        batch_capacity: usize,
    ) -> Result<Self, EngineError> {
        let (device, queue) = {
            let buffers = buffer_state.get();
            (buffers.device.clone(), buffers.queue.clone())
        };

        let block_textures =
            texture::Texture::create_block_texture_array(&device.get(), &queue.get(), texture_layers);

        let bind_group_state = {
            let buffers = buffer_state.get();
            let camera_binding = buffers
                .get_entire_binding(CAMERA_BUFFER_NAME)
                .ok_or(EngineError::MissingBuffer(CAMERA_BUFFER_NAME))?;
            bind_group_state::BindGroupState::new(&device.get(), camera_binding, &block_textures)
        };

        let pipeline_manager = PipelineManager::new(
            &device.get(),
            &surface_config,
            surface_config.format,
            buffer_state.clone(),
            shader_string,
            bind_group_state,
            batch_capacity,
        );

        info!(
            "Renderer ready: {}x{} {:?}, {} faces per batch, {} bytes of GPU buffers",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            pipeline_manager.batch_capacity(),
            buffer_state.get().get_total_allocated_memory()
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
            face_scratch: Vec::new(),
        })
    }

    /// Handles window resize events.
    ///
    /// A zero-sized window (minimized) leaves the surface as it is.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device.get(), &self.surface_config);
        self.pipeline_manager.resize(&self.device.get(), &self.surface_config);
    }

    /// Meshes and draws the whole grid, then presents.
    ///
    /// # Returns
    /// Face and batch counts, or `None` if no surface texture could be
    /// acquired and the frame was skipped.
    pub fn render_world(&mut self, grid: &VoxelGrid) -> Option<SinkTotals> {
        let mut frame = match self.pipeline_manager.begin_frame(
            &self.surface,
            self.device.clone(),
            self.queue.clone(),
        ) {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device.get(), &self.surface_config);
                return None;
            }
            Err(err) => {
                warn!("Skipping frame: {}", err);
                return None;
            }
        };

        let capacity = self.pipeline_manager.batch_capacity();
        let mut sink = StreamingVertexSink::new(&mut self.face_scratch, capacity, &mut frame);
        meshing::mesh_world(grid, &mut sink);
        let totals = sink.finish();

        frame.present();
        Some(totals)
    }
}
