//! # Block Module
//!
//! Tile codes, tile types, block faces and the texture layer each face of a
//! tile type samples.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The integer type a tile is stored as in the grid.
pub type TileCode = u8;

/// Texture array layer with the grass top.
pub const TEXTURE_LAYER_TOP: u32 = 0;
/// Texture array layer with the grass-on-dirt side.
pub const TEXTURE_LAYER_SIDE: u32 = 1;
/// Texture array layer with plain dirt.
pub const TEXTURE_LAYER_BOTTOM: u32 = 2;
/// Number of texture layers the renderer uploads.
pub const TEXTURE_LAYER_COUNT: u32 = 3;

impl BlockType {
    /// Texture layer drawn on the given face of this tile type.
    ///
    /// # Returns
    /// `None` for tile types that are never drawn.
    pub fn texture_layer(self, side: BlockSide) -> Option<u32> {
        match self {
            BlockType::GRASS => Some(match side {
                BlockSide::UP => TEXTURE_LAYER_TOP,
                BlockSide::DOWN => TEXTURE_LAYER_BOTTOM,
                _ => TEXTURE_LAYER_SIDE,
            }),
            BlockType::DIRT => Some(TEXTURE_LAYER_BOTTOM),
            BlockType::OPEN => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_has_distinct_top_side_and_bottom() {
        assert_eq!(BlockType::GRASS.texture_layer(BlockSide::UP), Some(TEXTURE_LAYER_TOP));
        assert_eq!(BlockType::GRASS.texture_layer(BlockSide::EAST), Some(TEXTURE_LAYER_SIDE));
        assert_eq!(BlockType::GRASS.texture_layer(BlockSide::DOWN), Some(TEXTURE_LAYER_BOTTOM));
    }

    #[test]
    fn dirt_is_uniform_and_open_is_never_drawn() {
        for side in BlockSide::all() {
            assert_eq!(BlockType::DIRT.texture_layer(side), Some(TEXTURE_LAYER_BOTTOM));
            assert_eq!(BlockType::OPEN.texture_layer(side), None);
        }
    }
}
