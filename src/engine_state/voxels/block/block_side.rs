//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the orientation
//! codes the renderer uses to expand a face record into a quad.

/// Represents the six possible faces of a voxel block.
///
/// The world's `y` axis grows downward, so `UP` faces `-y` (toward the sky)
/// and `DOWN` faces `+y`. The discriminants are the orientation codes carried
/// by every face vertex and interpreted by the face shader.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Faces the sky (`-y`)
    UP = 1,

    /// Faces `+x`
    EAST = 2,

    /// Faces `+z`
    NORTH = 3,

    /// Faces `-x`
    WEST = 4,

    /// Faces `-z`
    SOUTH = 5,

    /// Faces the ground (`+y`)
    DOWN = 6,
}

impl BlockSide {
    /// Returns all six faces in the order the mesher emits them.
    ///
    /// The order is: [UP, SOUTH, NORTH, WEST, EAST, DOWN]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::UP,
            BlockSide::SOUTH,
            BlockSide::NORTH,
            BlockSide::WEST,
            BlockSide::EAST,
            BlockSide::DOWN,
        ]
    }

    /// The orientation code written into face vertices.
    pub fn orientation_code(self) -> u32 {
        self as u32
    }

    /// Grid offset of the neighbor this face looks at.
    pub fn neighbor_offset(self) -> (i32, i32, i32) {
        match self {
            BlockSide::UP => (0, -1, 0),
            BlockSide::DOWN => (0, 1, 0),
            BlockSide::SOUTH => (0, 0, -1),
            BlockSide::NORTH => (0, 0, 1),
            BlockSide::WEST => (-1, 0, 0),
            BlockSide::EAST => (1, 0, 0),
        }
    }
}
