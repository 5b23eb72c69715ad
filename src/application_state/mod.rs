//! # Application State Management
//!
//! Drives the engine from winit's event loop:
//! - Graphics initialization once the loop resumes
//! - Input collection between frames
//! - Cursor capture for mouse look
//! - Exit on request or on a fatal startup error

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, warn};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::engine_state::{error::EngineError, settings::EngineSettings, EngineState};

/// The main application state container that manages the application's lifecycle.
pub struct ApplicationState {
    /// Graphics initialization progress
    pub graphics: MaybeGraphics,
    /// The running engine, once graphics are ready
    pub state: Option<InitializedApplicationState>,
    pub settings: EngineSettings,
    /// Set when startup failed; the event loop exits right after
    pub fatal_error: Option<EngineError>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The core game engine state and logic
    pub engine_state: EngineState,
    /// Handle to the application window
    pub window: Arc<Window>,
    /// Manages input state and event processing
    pub input_manager: InputManager,
}

impl ApplicationState {
    /// Creates the application, waiting for the event loop to resume before
    /// building graphics.
    pub fn new(graphics: MaybeGraphics, settings: EngineSettings) -> Self {
        Self {
            graphics,
            state: None,
            settings,
            fatal_error: None,
        }
    }

    /// Logs a fatal error, keeps it for the caller and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        error!("Fatal: {}", err);
        self.fatal_error = Some(err);
        event_loop.exit();
    }
}

/// Captures or frees the cursor for mouse look.
///
/// Locking is preferred; platforms that cannot lock fall back to confining.
///
/// # Returns
/// Whether the cursor ended up in the requested state.
fn set_cursor_captured(window: &Window, captured: bool) -> bool {
    let grab = if captured {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };

    match grab {
        Ok(()) => {
            window.set_cursor_visible(!captured);
            true
        }
        Err(err) => {
            warn!("Could not change cursor grab: {}", err);
            false
        }
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                state.input_manager.release_all();
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.frame();
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    /// Raw mouse motion drives mouse look, independent of cursor position.
    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop, &self.settings);
        }
    }

    /// Receives the graphics and starts the engine.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        self.graphics = MaybeGraphics::Moved;

        let gfx = match graphics {
            Ok(gfx) => gfx,
            Err(err) => return self.fail(event_loop, err),
        };

        let engine_state = match EngineState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            &gfx.shader_file_string,
            &gfx.texture_layers,
            self.settings.clone(),
        ) {
            Ok(engine_state) => engine_state,
            Err(err) => return self.fail(event_loop, err),
        };

        let mut state = InitializedApplicationState {
            engine_state,
            window: gfx.window,
            input_manager: InputManager::new(),
        };
        let captured = set_cursor_captured(&state.window, true);
        state.engine_state.set_mouse_look(captured);
        state.window.request_redraw();

        self.state = Some(state);
    }

    /// Hands the frame's input to the engine, acts on its window requests
    /// and asks for the next frame.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };

        let processed_input = state.input_manager.get_and_reset_processed_input();
        let requests = state.engine_state.set_input_commands(processed_input);

        if requests.quit {
            event_loop.exit();
            return;
        }
        if requests.release_cursor && set_cursor_captured(&state.window, false) {
            state.engine_state.set_mouse_look(false);
        }
        if requests.grab_cursor {
            let captured = set_cursor_captured(&state.window, true);
            state.engine_state.set_mouse_look(captured);
        }

        state.window.request_redraw();
    }
}
