//! # Blocko
//!
//! A small block world: terrain with slowly spreading grass, a player who
//! walks, jumps and edits blocks, and a renderer that re-meshes the whole
//! world every frame and streams it to the GPU in fixed-size batches.
//!
//! ## Key Modules
//!
//! * `application_state` - winit event handling, window and graphics setup
//! * `core` - Shared single-threaded handles
//! * `engine_state` - Simulation, camera, rendering and settings

use std::path::Path;

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use engine_state::settings::{EngineSettings, SETTINGS_FILE_NAME};
use log::info;
use winit::event_loop::EventLoop;

pub use engine_state::error::EngineError;

mod application_state;
mod core;
mod engine_state;

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        /// Log filter when `RUST_LOG` is unset. wgpu is chatty at info in
        /// debug builds.
        const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";
    } else {
        /// Log filter when `RUST_LOG` is unset.
        const DEFAULT_LOG_FILTER: &str = "info";
    }
}

/// Runs the game until the window closes.
///
/// # Errors
/// Startup failures: unreadable or malformed settings, no window, no GPU,
/// missing shader. Nothing after the first frame is reported here.
pub fn run() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logger initialized");

    let settings = EngineSettings::load(Path::new(SETTINGS_FILE_NAME))?;

    let event_loop = EventLoop::with_user_event().build()?;
    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        settings,
    );

    event_loop.run_app(&mut state)?;

    match state.fatal_error.take() {
        Some(err) => Err(err),
        None => {
            info!("Exiting");
            Ok(())
        }
    }
}
