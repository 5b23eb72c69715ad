//! # Engine State Module
//!
//! The frame coordinator. `EngineState` turns raw input into an
//! [`InputSnapshot`], advances the [`Simulation`], keeps the camera uniform
//! current and has the renderer mesh and draw the world.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns every subsystem and runs one frame at a time
//! * `simulation` - World, player and targeting, free of GPU state
//! * `camera_state` - Camera derived from the player and its GPU uniform
//! * `rendering` - Per-frame meshing and batched drawing
//! * `buffer_state` - Named GPU buffers
//! * `frame_stats` - Once-a-second frame rate logging

use log::{debug, info};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{application_state::input_state::ProcessedInputState, core::StSystem};

use buffer_state::BufferState;
use camera_state::CameraState;
use error::EngineError;
use frame_stats::FrameStats;
use physics::player::MovementIntents;
use rendering::{Renderer, TextureLayers};
use settings::EngineSettings;
use simulation::{InputSnapshot, Simulation};

mod buffer_state;
mod camera_state;
pub mod error;
mod frame_stats;
mod physics;
pub mod rendering;
pub mod settings;
pub mod simulation;
mod voxels;

/// Things input asks of the window or the event loop rather than the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowRequests {
    pub quit: bool,
    pub grab_cursor: bool,
    pub release_cursor: bool,
}

/// One frame of processed input, split by who acts on it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct TranslatedInput {
    snapshot: InputSnapshot,
    requests: WindowRequests,
    toggle_frame_stats: bool,
}

/// The main state container for the engine.
pub struct EngineState {
    pub settings: EngineSettings,
    pub simulation: Simulation,
    /// Camera state managing the view and its uniform buffer
    pub camera_state: CameraState,
    pub renderer: Renderer,
    /// Buffer state for managing GPU buffers
    pub buffer_state: StSystem<BufferState>,
    frame_stats: FrameStats,
    /// Input gathered since the last frame ran
    pending_input: InputSnapshot,
    /// Whether mouse motion turns the view
    mouse_look: bool,
}

impl EngineState {
    /// Creates the engine with a freshly generated world.
    ///
    /// # Arguments
    ///
    /// * `surface` - The configured rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `shader_string` - WGSL source of the face shader
    /// * `texture_layers` - Block texture pixels
    /// * `settings` - Runtime tunables
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: &str,
        texture_layers: &TextureLayers,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        let device = StSystem::from_value(device);
        let queue = StSystem::from_value(queue);
        let buffer_state = StSystem::from_value(BufferState::new(device, queue));

        let simulation = Simulation::new(voxels::WORLD_DIMENSIONS, settings.world_seed);

        let camera_state = CameraState::new(
            buffer_state.clone(),
            simulation.player(),
            surface_config.width,
            surface_config.height,
            &settings,
        );

        let renderer = Renderer::new(
            surface,
            surface_config,
            buffer_state.clone(),
            shader_string,
            texture_layers,
            settings.vertex_batch_capacity,
        )?;

        info!("Engine ready, player at {:?}", simulation.player().position());

        Ok(Self {
            frame_stats: FrameStats::new(settings.report_frame_stats, web_time::Instant::now()),
            settings,
            simulation,
            camera_state,
            renderer,
            buffer_state,
            pending_input: InputSnapshot::default(),
            mouse_look: true,
        })
    }

    /// Resizes the rendering surface and the projection.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize_surface(size);
        if size.width > 0 && size.height > 0 {
            self.camera_state.resize(size.width, size.height);
        }
    }

    /// Records whether the cursor is captured.
    pub fn set_mouse_look(&mut self, mouse_look: bool) {
        if self.mouse_look != mouse_look {
            info!("Mouse look {}", if mouse_look { "captured" } else { "released" });
        }
        self.mouse_look = mouse_look;
    }

    /// Takes in a frame's processed input.
    ///
    /// Game input is held until the next [`EngineState::frame`]; window and
    /// event loop requests are handed back to the caller.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) -> WindowRequests {
        let translated =
            translate_processed_input(&input, self.mouse_look, self.settings.mouse_sensitivity);

        self.pending_input.merge(translated.snapshot);
        if translated.toggle_frame_stats {
            self.frame_stats.toggle();
        }

        translated.requests
    }

    /// Runs one frame: simulate, update the camera, mesh and draw.
    pub fn frame(&mut self) {
        let input = std::mem::take(&mut self.pending_input);
        self.simulation.step(&input);

        self.camera_state
            .update(self.simulation.player(), self.simulation.zoom());

        if let Some(totals) = self.renderer.render_world(self.simulation.grid()) {
            self.frame_stats.record_frame(totals.faces);
        }
        let report = self
            .frame_stats
            .end_window(web_time::Instant::now(), self.simulation.player().position());
        if report.is_some() {
            let buffers = self.buffer_state.get();
            debug!(
                "GPU buffers: {} of {} bytes used, {} writes",
                buffers.get_total_used_memory(),
                buffers.get_total_allocated_memory(),
                buffers.get_total_writes()
            );
        }
    }
}

/// Maps held and edge-triggered keys and buttons onto game input.
///
/// Left click breaks while the mouse is captured and recaptures it
/// otherwise. Mouse motion only turns the view while captured.
fn translate_processed_input(
    input: &ProcessedInputState,
    mouse_look: bool,
    mouse_sensitivity: f32,
) -> TranslatedInput {
    let mut snapshot = InputSnapshot {
        intents: MovementIntents {
            forward: input.get_key_state(KeyCode::KeyW).is_active(),
            back: input.get_key_state(KeyCode::KeyS).is_active(),
            left: input.get_key_state(KeyCode::KeyA).is_active(),
            right: input.get_key_state(KeyCode::KeyD).is_active(),
        },
        jump: input.get_key_state(KeyCode::Space).is_just_pressed()
            || input.get_mouse_button_state(MouseButton::Back).is_just_pressed(),
        zoom: input.get_key_state(KeyCode::KeyZ).is_active(),
        place_block: input.get_mouse_button_state(MouseButton::Right).is_just_pressed(),
        lift: input.get_key_state(KeyCode::KeyJ).is_just_released(),
        ..Default::default()
    };
    let mut requests = WindowRequests::default();

    let left_click = input.get_mouse_button_state(MouseButton::Left).is_just_pressed();
    if mouse_look {
        snapshot.break_block = left_click;
        if let Some((dx, dy)) = input.get_mouse_delta() {
            snapshot.yaw_delta = dx as f32 * mouse_sensitivity;
            snapshot.pitch_delta = dy as f32 * mouse_sensitivity;
        }
    } else {
        requests.grab_cursor = left_click;
    }

    requests.release_cursor = input.get_key_state(KeyCode::Escape).is_just_pressed();
    requests.quit = input.get_key_state(KeyCode::KeyQ).is_just_pressed();

    TranslatedInput {
        snapshot,
        requests,
        toggle_frame_stats: input.get_key_state(KeyCode::KeyN).is_just_pressed(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input(
        keys: &[(KeyCode, RawInputState)],
        buttons: &[(MouseButton, RawInputState)],
        mouse_delta: Option<(f64, f64)>,
    ) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect::<HashMap<_, _>>(),
            mouse_button_states: buttons.iter().copied().collect::<HashMap<_, _>>(),
            mouse_delta,
        }
    }

    #[test]
    fn held_keys_become_intents() {
        let translated = translate_processed_input(
            &input(
                &[
                    (KeyCode::KeyW, RawInputState::Held),
                    (KeyCode::KeyD, RawInputState::Pressed),
                    (KeyCode::KeyS, RawInputState::Released),
                    (KeyCode::KeyZ, RawInputState::Held),
                ],
                &[],
                None,
            ),
            true,
            0.001,
        );

        let intents = translated.snapshot.intents;
        assert!(intents.forward && intents.right);
        assert!(!intents.back && !intents.left);
        assert!(translated.snapshot.zoom);
        assert!(!translated.snapshot.jump);
    }

    #[test]
    fn jump_fires_on_space_or_back_button_press_only() {
        let space = translate_processed_input(
            &input(&[(KeyCode::Space, RawInputState::Pressed)], &[], None),
            true,
            0.001,
        );
        let held = translate_processed_input(
            &input(&[(KeyCode::Space, RawInputState::Held)], &[], None),
            true,
            0.001,
        );
        let back = translate_processed_input(
            &input(&[], &[(MouseButton::Back, RawInputState::Pressed)], None),
            true,
            0.001,
        );

        assert!(space.snapshot.jump);
        assert!(!held.snapshot.jump);
        assert!(back.snapshot.jump);
    }

    #[test]
    fn mouse_motion_is_scaled_while_captured_and_ignored_otherwise() {
        let raw = input(&[], &[], Some((100.0, -50.0)));

        let captured = translate_processed_input(&raw, true, 0.001);
        assert!((captured.snapshot.yaw_delta - 0.1).abs() < 1e-6);
        assert!((captured.snapshot.pitch_delta + 0.05).abs() < 1e-6);

        let released = translate_processed_input(&raw, false, 0.001);
        assert_eq!(released.snapshot.yaw_delta, 0.0);
        assert_eq!(released.snapshot.pitch_delta, 0.0);
    }

    #[test]
    fn left_click_breaks_when_captured_and_recaptures_when_not() {
        let click = input(&[], &[(MouseButton::Left, RawInputState::Pressed)], None);

        let captured = translate_processed_input(&click, true, 0.001);
        assert!(captured.snapshot.break_block);
        assert!(!captured.requests.grab_cursor);

        let released = translate_processed_input(&click, false, 0.001);
        assert!(!released.snapshot.break_block);
        assert!(released.requests.grab_cursor);
    }

    #[test]
    fn one_shot_keys() {
        let translated = translate_processed_input(
            &input(
                &[
                    (KeyCode::KeyJ, RawInputState::Released),
                    (KeyCode::KeyN, RawInputState::Pressed),
                    (KeyCode::Escape, RawInputState::Pressed),
                    (KeyCode::KeyQ, RawInputState::Pressed),
                ],
                &[(MouseButton::Right, RawInputState::Pressed)],
                None,
            ),
            true,
            0.001,
        );

        assert!(translated.snapshot.lift);
        assert!(translated.snapshot.place_block);
        assert!(translated.toggle_frame_stats);
        assert_eq!(
            translated.requests,
            WindowRequests {
                quit: true,
                grab_cursor: false,
                release_cursor: true,
            }
        );
    }
}
