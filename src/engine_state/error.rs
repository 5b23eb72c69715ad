//! Startup errors. Anything that reaches the event loop as an `EngineError`
//! ends the process.

use std::path::PathBuf;

/// Failures while bringing the engine up.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("could not create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("graphics device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("could not read shader {path}: {source}")]
    ShaderLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("malformed settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("GPU buffer '{0}' was not created before it was bound")]
    MissingBuffer(&'static str),

    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}
