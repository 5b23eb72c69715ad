//! # Engine Settings
//!
//! Runtime tunables read from an optional JSON file next to the binary's
//! working directory. World shape is not configurable here; it is fixed by
//! the constants in [`super::voxels`].

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{error::EngineError, rendering::FaceVertex};

/// File looked up in the working directory at startup.
pub const SETTINGS_FILE_NAME: &str = "blocko.json";

/// Faces buffered before a batch is flushed to the GPU.
pub const DEFAULT_VERTEX_BATCH_CAPACITY: usize = 100_000;

/// Largest batch whose instance buffer fits in wgpu's default buffer size
/// limit, which is what the device is requested with.
pub fn max_vertex_batch_capacity() -> usize {
    let limit = wgpu::Limits::default().max_buffer_size;
    (limit / std::mem::size_of::<FaceVertex>() as u64) as usize
}

/// Texture files for the top, side and bottom layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexturePaths {
    pub top: PathBuf,
    pub side: PathBuf,
    pub bottom: PathBuf,
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self {
            top: PathBuf::from("res/top.png"),
            side: PathBuf::from("res/side.png"),
            bottom: PathBuf::from("res/bottom.png"),
        }
    }
}

impl TexturePaths {
    /// Paths in texture layer order.
    pub fn layers(&self) -> [&Path; 3] {
        [&self.top, &self.side, &self.bottom]
    }
}

/// Every field is optional in the file; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Faces per GPU batch
    pub vertex_batch_capacity: usize,
    /// Near clipping plane in world units
    pub near_plane: f32,
    /// Far clipping plane in world units
    pub far_plane: f32,
    /// Half the frustum height at the near plane when fully zoomed out
    pub frustum_half_height: f32,
    /// Radians of yaw/pitch per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Log frame statistics once a second
    pub report_frame_stats: bool,
    pub texture_paths: TexturePaths,
    pub shader_path: PathBuf,
    /// Fixed seed for terrain and erosion. Random when absent.
    pub world_seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            vertex_batch_capacity: DEFAULT_VERTEX_BATCH_CAPACITY,
            near_plane: 16.0,
            far_plane: 199_999.0,
            frustum_half_height: 9.0,
            mouse_sensitivity: 0.001,
            report_frame_stats: true,
            texture_paths: TexturePaths::default(),
            shader_path: PathBuf::from("assets/shaders/blocko.wgsl"),
            world_seed: None,
        }
    }
}

impl EngineSettings {
    /// Parses settings from a JSON string.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, EngineError> {
        let mut settings: EngineSettings =
            serde_json::from_str(json).map_err(|source| EngineError::SettingsParse {
                path: origin.to_path_buf(),
                source,
            })?;
        let max_capacity = max_vertex_batch_capacity();
        if settings.vertex_batch_capacity > max_capacity {
            log::warn!(
                "vertex_batch_capacity {} exceeds the GPU buffer limit, using {}",
                settings.vertex_batch_capacity,
                max_capacity
            );
        }
        settings.vertex_batch_capacity = settings.vertex_batch_capacity.clamp(1, max_capacity);
        Ok(settings)
    }

    /// Loads settings from `path`.
    ///
    /// # Returns
    /// Defaults when the file does not exist or cannot be read; an error only
    /// when the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json, path)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("No settings file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Ok(Self::default())
            }
        }
    }
}
