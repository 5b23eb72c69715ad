//! # Camera State Management
//!
//! Keeps the camera, its projection and the GPU copy of the camera uniform
//! in step with the player.
//!
//! ## Core Components
//! - `Camera`: Eye position and orientation derived from the player
//! - `Projection`: The zoom-scaled frustum
//! - `CameraUniform`: GPU representation of camera data for shaders

use crate::core::StSystem;

use super::{buffer_state::BufferState, physics::player::Player, settings::EngineSettings};

pub mod camera;

/// Name of the GPU buffer used for camera uniform data
pub const CAMERA_BUFFER_NAME: &str = "camera_buffer";

/// Owns the camera and uploads it to the GPU.
///
/// # Fields
/// - `camera`: The camera used for the most recent frame
/// - `camera_uniform`: GPU-optimized camera data for shaders
/// - `projection`: Frustum settings, resized with the window
/// - `buffer_state`: Manages GPU buffer state
pub struct CameraState {
    pub camera: camera::Camera,
    pub camera_uniform: camera::CameraUniform,
    pub projection: camera::Projection,
    pub buffer_state: StSystem<BufferState>,
}

impl CameraState {
    /// Creates the camera state and its uniform buffer.
    ///
    /// # Arguments
    /// * `buffer_state` - The buffer state system for GPU resource management
    /// * `player` - The player to start looking through
    /// * `width`, `height` - Surface size in pixels
    /// * `settings` - Frustum settings
    pub fn new(
        buffer_state: StSystem<BufferState>,
        player: &Player,
        width: u32,
        height: u32,
        settings: &EngineSettings,
    ) -> Self {
        let camera = camera::Camera::from_player(player);
        let projection = camera::Projection::new(
            width,
            height,
            settings.frustum_half_height,
            settings.near_plane,
            settings.far_plane,
        );

        let mut camera_uniform = camera::CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection, 1.0);

        buffer_state.get_mut().create_buffer_init(
            CAMERA_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CAMERA_BUFFER_NAME),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        CameraState {
            camera,
            camera_uniform,
            projection,
            buffer_state,
        }
    }

    /// Rebuilds the camera from the player and writes the uniform buffer.
    ///
    /// This should be called once per frame, after the player has moved.
    pub fn update(&mut self, player: &Player, zoom: f32) {
        self.camera = camera::Camera::from_player(player);
        self.camera_uniform
            .update_view_proj(&self.camera, &self.projection, zoom);
        self.buffer_state.get_mut().write_buffer(
            CAMERA_BUFFER_NAME,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Updates the aspect ratio after a surface resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }
}
