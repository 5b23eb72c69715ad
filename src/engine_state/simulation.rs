//! # Simulation
//!
//! The CPU side of a frame: the world, the player and the block under the
//! crosshair. Nothing here touches the GPU, so a whole frame of game logic
//! can run in tests.
//!
//! A step applies the frame's input first, with edits aimed at the target
//! found on the previous frame, then moves the player, erodes the terrain
//! and finally casts the view ray for the next frame.

use cgmath::Point3;
use log::debug;

use super::{
    camera_state::camera::Camera,
    physics::{
        player::{MovementIntents, Player, PlayerController, PlayerUpdate},
        raycast::{raycast_target, RayHit},
    },
    voxels::{
        block::block_type::{DIRT, OPEN},
        grid::{VoxelGrid, WorldDimensions},
        world_generator::WorldGenerator,
    },
};

/// World units the debug lift key raises the player by.
pub const LIFT_DISTANCE: f32 = 1000.0;

/// Everything the simulation needs from one frame of input.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Held movement keys
    pub intents: MovementIntents,
    /// Jump was pressed this frame
    pub jump: bool,
    /// Zoom key is held
    pub zoom: bool,
    /// Yaw change in radians
    pub yaw_delta: f32,
    /// Pitch change in radians, positive looks toward the ground
    pub pitch_delta: f32,
    /// Break the targeted block
    pub break_block: bool,
    /// Place dirt in front of the targeted block
    pub place_block: bool,
    /// Raise the player by [`LIFT_DISTANCE`]
    pub lift: bool,
}

impl InputSnapshot {
    /// Folds a newer snapshot into this one when several arrive before a
    /// frame runs. Held state comes from the newer one, one-shot actions
    /// are kept if either saw them and look deltas add up.
    pub fn merge(&mut self, newer: InputSnapshot) {
        self.intents = newer.intents;
        self.zoom = newer.zoom;
        self.yaw_delta += newer.yaw_delta;
        self.pitch_delta += newer.pitch_delta;
        self.jump |= newer.jump;
        self.break_block |= newer.break_block;
        self.place_block |= newer.place_block;
        self.lift |= newer.lift;
    }
}

/// A change the player made to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEdit {
    Broken(Point3<i32>),
    Placed(Point3<i32>),
}

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub player: PlayerUpdate,
    /// Cells erosion turned to grass
    pub grass_grown: usize,
    pub edits: Vec<BlockEdit>,
}

/// Owns the world and the player and advances them a frame at a time.
pub struct Simulation {
    grid: VoxelGrid,
    generator: WorldGenerator,
    controller: PlayerController,
    target: Option<RayHit>,
}

impl Simulation {
    /// Generates a world of the given size and spawns the player in it.
    ///
    /// # Arguments
    /// * `dimensions` - World extents in blocks
    /// * `seed` - Terrain and erosion seed, random when `None`
    pub fn new(dimensions: WorldDimensions, seed: Option<u64>) -> Self {
        let mut grid = VoxelGrid::new(dimensions);
        let mut generator = WorldGenerator::new(seed);
        generator.generate(&mut grid);

        Self {
            grid,
            generator,
            controller: PlayerController::new(dimensions),
            target: None,
        }
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        self.controller.player()
    }

    pub fn zoom(&self) -> f32 {
        self.controller.zoom()
    }

    /// The block under the crosshair as of the last step.
    #[cfg(test)]
    pub fn target(&self) -> Option<RayHit> {
        self.target
    }

    /// Runs one frame of game logic.
    pub fn step(&mut self, input: &InputSnapshot) -> StepOutcome {
        let mut edits = Vec::new();

        self.controller.look(input.yaw_delta, input.pitch_delta);
        self.controller.set_intents(input.intents);
        if input.jump {
            self.controller.jump();
        }
        if input.lift {
            self.controller.lift(LIFT_DISTANCE);
        }
        if input.break_block {
            edits.extend(self.break_target());
        }
        if input.place_block {
            edits.extend(self.place_at_target());
        }

        let player = self.controller.update(&self.grid, input.zoom);
        if player == PlayerUpdate::Respawned {
            self.generator.generate(&mut self.grid);
        }

        let grass_grown = self.generator.tick(&mut self.grid);

        let camera = Camera::from_player(self.controller.player());
        self.target = raycast_target(&self.grid, camera.eye, camera.forward);

        StepOutcome {
            player,
            grass_grown,
            edits,
        }
    }

    /// Opens the targeted cell.
    ///
    /// # Returns
    /// The edit, or `None` if nothing is targeted.
    pub fn break_target(&mut self) -> Option<BlockEdit> {
        let hit = self.target?;
        if !self.grid.set_at(hit.target, OPEN) {
            return None;
        }
        debug!("Broke block at {:?}", hit.target);
        Some(BlockEdit::Broken(hit.target))
    }

    /// Fills the cell in front of the targeted one with dirt.
    ///
    /// # Returns
    /// The edit, or `None` if nothing is targeted.
    pub fn place_at_target(&mut self) -> Option<BlockEdit> {
        let hit = self.target?;
        if !self.grid.set_at(hit.place, DIRT) {
            return None;
        }
        debug!("Placed block at {:?}", hit.place);
        Some(BlockEdit::Placed(hit.place))
    }
}
