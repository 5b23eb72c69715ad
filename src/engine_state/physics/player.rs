//! # Player Controller
//!
//! Turns movement intents into a collision-checked walk, applies the gravity
//! curve and keeps track of whether the player is standing on something.
//!
//! Positions are world units with `y` growing downward, so negative gravity
//! values lift the player and positive ones pull them down.

use std::f32::consts::PI;

use cgmath::{Point3, Vector3};

use super::collision::{move_box, world_collide, Aabb};
use crate::engine_state::voxels::{
    grid::{VoxelGrid, WorldDimensions},
    BLOCK_SIZE, SCALE,
};

/// Body width and depth.
pub const PLAYER_WIDTH: i32 = 16 * SCALE;
/// Body height, one block.
pub const PLAYER_HEIGHT: i32 = BLOCK_SIZE;
/// Planar speed cap in units per frame.
pub const PLAYER_MAX_SPEED: i32 = 2 * SCALE;
/// Accumulator magnitude at or below which the speed cap leaves a component alone.
pub const SPEED_CAP_DEADZONE: i32 = 4;

/// Gravity phase set by a jump.
pub const GRAV_JUMP: usize = 0;
/// Neutral gravity phase, where the curve is zero.
pub const GRAV_ZERO: usize = 14;
/// Terminal gravity phase.
pub const GRAV_MAX: usize = 30;

/// Vertical displacement per frame for each gravity phase.
pub const GRAVITY_CURVE: [i32; GRAV_MAX + 1] = [
    -20, -17, -14, -12, -10, -8, -6, -5, -4, -3, //
    -2, -2, -1, -1, 0, 1, 1, 2, 2, 3, //
    4, 5, 6, 7, 8, 10, 12, 14, 17, 20, //
    22,
];

/// Distance past the world bottom at which the player is respawned.
pub const RESPAWN_MARGIN: i32 = 6000;
/// Starting yaw in radians.
pub const SPAWN_YAW: f32 = PI * 0.23;
/// Pitch is kept just short of straight up or down.
pub const PITCH_LIMIT: f32 = PI * 0.5 - 0.001;

pub const ZOOM_IN_RATE: f32 = 0.9;
pub const ZOOM_OUT_RATE: f32 = 1.2;
pub const ZOOM_MIN: f32 = 0.25;
pub const ZOOM_MAX: f32 = 1.0;

/// The four held movement keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementIntents {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// The player's body and motion state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Aabb,
    pub velocity: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub intents: MovementIntents,
    pub forward_velocity: i32,
    pub right_velocity: i32,
    pub gravity_phase: usize,
    pub grounded: bool,
}

impl Player {
    /// A player standing at the top-centre of a world of the given extents.
    pub fn spawn(dimensions: WorldDimensions) -> Self {
        let half = (BLOCK_SIZE / 2) as f32;
        Self {
            body: Aabb::new(
                Point3::new(dimensions.width as f32 * half, 0.0, dimensions.depth as f32 * half),
                Vector3::new(PLAYER_WIDTH as f32, PLAYER_HEIGHT as f32, PLAYER_WIDTH as f32),
            ),
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: SPAWN_YAW,
            pitch: 0.0,
            intents: MovementIntents::default(),
            forward_velocity: 0,
            right_velocity: 0,
            gravity_phase: GRAV_ZERO,
            grounded: false,
        }
    }

    /// Body position (lowest corner).
    pub fn position(&self) -> Point3<f32> {
        self.body.min
    }

    /// Thin box directly under the feet used for ground detection.
    fn foot_probe(&self) -> Aabb {
        Aabb::new(
            Point3::new(self.body.min.x, self.body.min.y + PLAYER_HEIGHT as f32, self.body.min.z),
            Vector3::new(PLAYER_WIDTH as f32, 1.0, PLAYER_WIDTH as f32),
        )
    }
}

/// What a single [`PlayerController::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerUpdate {
    /// Normal frame
    Stepped,
    /// Player fell out of the world and was put back at spawn. The world must
    /// be regenerated.
    Respawned,
}

/// Owns the player and the camera zoom.
pub struct PlayerController {
    player: Player,
    dimensions: WorldDimensions,
    zoom: f32,
}

impl PlayerController {
    pub fn new(dimensions: WorldDimensions) -> Self {
        Self {
            player: Player::spawn(dimensions),
            dimensions,
            zoom: ZOOM_MAX,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Current frustum scale in `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Replaces the held movement keys.
    pub fn set_intents(&mut self, intents: MovementIntents) {
        self.player.intents = intents;
    }

    /// Applies a mouse-look delta in radians, clamping pitch.
    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.player.yaw += yaw_delta;
        self.player.pitch = (self.player.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Starts a jump if the player is standing on something.
    pub fn jump(&mut self) {
        if self.player.grounded {
            self.player.gravity_phase = GRAV_JUMP;
        }
    }

    /// Moves the player `amount` units toward the sky, ignoring collision.
    pub fn lift(&mut self, amount: f32) {
        self.player.body.min.y -= amount;
    }

    /// Puts the player back at spawn. Zoom is left alone.
    pub fn respawn(&mut self) {
        self.player = Player::spawn(self.dimensions);
    }

    fn respawn_depth(&self) -> f32 {
        (self.dimensions.height as i32 * BLOCK_SIZE + RESPAWN_MARGIN) as f32
    }

    /// Advances the player by one frame.
    ///
    /// # Arguments
    /// * `grid` - World to collide against
    /// * `zooming` - Whether the zoom key is held
    pub fn update(&mut self, grid: &VoxelGrid, zooming: bool) -> PlayerUpdate {
        if self.player.body.min.y > self.respawn_depth() {
            log::info!("Player fell out of the world at {:?}, respawning", self.player.position());
            self.respawn();
            return PlayerUpdate::Respawned;
        }

        self.accumulate_velocity();
        self.limit_speed();
        self.walk(grid);
        self.fall(grid);

        self.player.grounded = world_collide(grid, &self.player.foot_probe());
        if self.player.grounded {
            self.player.gravity_phase = GRAV_ZERO;
        }

        let rate = if zooming { ZOOM_IN_RATE } else { ZOOM_OUT_RATE };
        self.zoom = (self.zoom * rate).clamp(ZOOM_MIN, ZOOM_MAX);

        PlayerUpdate::Stepped
    }

    fn accumulate_velocity(&mut self) {
        let p = &mut self.player;
        let intents = p.intents;
        p.forward_velocity = step_accumulator(p.forward_velocity, intents.forward, intents.back);
        p.right_velocity = step_accumulator(p.right_velocity, intents.right, intents.left);
    }

    /// Scales components back when the planar speed exceeds the cap. Only
    /// components already past the deadzone are scaled.
    fn limit_speed(&mut self) {
        let p = &mut self.player;
        let (f, r) = (p.forward_velocity as f32, p.right_velocity as f32);
        let total = (f * f + r * r).sqrt();
        if total <= PLAYER_MAX_SPEED as f32 {
            return;
        }

        let factor = PLAYER_MAX_SPEED as f32 / total;
        if p.forward_velocity.abs() > SPEED_CAP_DEADZONE {
            p.forward_velocity = (f * factor) as i32;
        }
        if p.right_velocity.abs() > SPEED_CAP_DEADZONE {
            p.right_velocity = (r * factor) as i32;
        }
    }

    fn walk(&mut self, grid: &VoxelGrid) {
        let p = &mut self.player;
        let (sin, cos) = p.yaw.sin_cos();
        let (f, r) = (p.forward_velocity as f32, p.right_velocity as f32);
        p.velocity.x = sin * f + cos * r;
        p.velocity.z = cos * f - sin * r;

        let displacement = Vector3::new(p.velocity.x as i32, p.velocity.y as i32, p.velocity.z as i32);
        if !move_box(grid, &mut p.body, displacement) {
            p.forward_velocity = 0;
            p.right_velocity = 0;
        }
    }

    /// Landing and bumping a ceiling both reset the phase to neutral.
    fn fall(&mut self, grid: &VoxelGrid) {
        let p = &mut self.player;
        if p.grounded && p.gravity_phase >= GRAV_ZERO {
            return;
        }

        let drop = GRAVITY_CURVE[p.gravity_phase];
        if !move_box(grid, &mut p.body, Vector3::new(0, drop, 0)) {
            p.gravity_phase = GRAV_ZERO;
        } else if p.gravity_phase < GRAV_MAX {
            p.gravity_phase += 1;
        }
    }
}

/// Increments toward `toward` while it alone is held, otherwise decays to zero.
fn step_accumulator(value: i32, toward: bool, away: bool) -> i32 {
    let mut value = value;

    if toward && !away {
        value += 1;
    } else if value > 0 {
        value -= 1;
    }

    if away && !toward {
        value -= 1;
    } else if value < 0 {
        value += 1;
    }

    value
}
