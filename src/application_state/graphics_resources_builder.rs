//! # Graphics Resources Builder
//!
//! Creates the window, the wgpu surface, adapter, device and queue, and
//! reads the shader and texture files the renderer needs.
//!
//! The main components are:
//! - `Graphics`: Everything the engine needs to start drawing
//! - `GraphicsBuilder`: Builds `Graphics` once and hands it to the event loop
//! - `MaybeGraphics`: Where graphics initialization currently stands

use std::sync::Arc;

use log::{error, info};
use wgpu::{Device, Features, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::engine_state::{error::EngineError, rendering::TextureLayers, settings::EngineSettings};

/// Title of the main window.
pub const WINDOW_TITLE: &str = "Blocko";
/// Initial window size in logical pixels.
const INITIAL_WINDOW_SIZE: LogicalSize<u32> = LogicalSize::new(1280, 720);

/// What graphics initialization sends back to the event loop.
pub type GraphicsResult = Result<Graphics, EngineError>;

/// Everything the engine needs to start drawing.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    pub shader_file_string: String,
    pub texture_layers: TextureLayers,
}

/// Creates the window and every graphics resource.
///
/// # Errors
/// Any failure here is fatal: no window, no surface, no adapter, no device,
/// an unreadable shader or an undecodable texture.
fn create_graphics(event_loop: &ActiveEventLoop, settings: &EngineSettings) -> GraphicsResult {
    let window_attrs = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(INITIAL_WINDOW_SIZE);
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))?;
    info!("Using adapter {:?}", adapter.get_info());

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Blocko Device"),
        required_features: Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::MemoryUsage,
        trace: wgpu::Trace::Off,
    }))?;

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or(EngineError::UnsupportedSurface)?;
    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        // Vertical sync paces the frame loop
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    let shader_file_string =
        std::fs::read_to_string(&settings.shader_path).map_err(|source| EngineError::ShaderLoad {
            path: settings.shader_path.clone(),
            source,
        })?;
    let texture_layers = TextureLayers::load(settings.texture_paths.layers())?;

    surface.configure(&device, &surface_config);

    Ok(Graphics {
        window,
        surface,
        surface_config,
        device,
        queue,
        shader_file_string,
        texture_layers,
    })
}

/// Builds the graphics once and sends them to the event loop as a user event.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
}

/// Where graphics initialization currently stands.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume
    Builder(GraphicsBuilder),
    /// Handed over to the engine
    Moved,
}

impl GraphicsBuilder {
    /// Creates a builder that reports back through `event_loop_proxy`.
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Creates the graphics and sends the result to the event loop.
    ///
    /// Only the first call does anything.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop, settings: &EngineSettings) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            return;
        };

        let gfx = create_graphics(event_loop, settings);
        if event_loop_proxy.send_event(gfx).is_err() {
            error!("Event loop closed before graphics were ready");
        }
    }
}
