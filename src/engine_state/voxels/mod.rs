//! # Voxels
//!
//! The world grid and everything that writes terrain into it.
//!
//! * **Block**: tile codes, face sides and texture layer selection
//! * **Grid**: the fixed-extent [`grid::VoxelGrid`] of tile codes and skylight
//! * **World Generator**: terrain fill and the per-frame grass spread
//!
//! World constants are fixed at compile time. `y` grows downward, so `y = 0`
//! is the top layer of the world.

pub mod block;
pub mod grid;
pub mod world_generator;

use grid::WorldDimensions;

/// Magnification applied to the base unit sizes.
pub const SCALE: i32 = 3;
/// World width in blocks (x).
pub const TILES_W: usize = 200;
/// World height in blocks (y).
pub const TILES_H: usize = 40;
/// World depth in blocks (z).
pub const TILES_D: usize = 200;
/// World units per block edge.
pub const BLOCK_SIZE: i32 = 20 * SCALE;

/// Extents of the playable world.
pub const WORLD_DIMENSIONS: WorldDimensions = WorldDimensions::new(TILES_W, TILES_H, TILES_D);
