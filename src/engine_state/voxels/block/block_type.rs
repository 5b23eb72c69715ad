//! # Block Type Module
//!
//! This module defines the tile codes stored in the voxel grid and the
//! enumeration used to interpret them.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::TileCode;

/// Dirt tile code.
pub const DIRT: TileCode = 45;
/// Grass tile code.
pub const GRAS: TileCode = 46;
/// Every tile code at or below this value is a physical obstacle.
pub const LAST_SOLID: TileCode = GRAS;
/// Invisible, walkable open space.
pub const OPEN: TileCode = 75;

/// Enumerates the tile types the world knows how to simulate and draw.
///
/// The discriminants are the raw tile codes stored in the grid, so a
/// `BlockType` can be recovered from any stored byte with
/// [`BlockType::from_code`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Plain dirt, the same texture on every face.
    DIRT = 45,

    /// Grass: green on top, grass-on-dirt sides, dirt bottom.
    GRASS = 46,

    /// Empty space.
    OPEN = 75,
}

impl BlockType {
    /// Interprets a raw tile code.
    ///
    /// # Returns
    /// `None` for codes that do not name a known tile type.
    pub fn from_code(code: TileCode) -> Option<Self> {
        FromPrimitive::from_u8(code)
    }

    /// Whether a tile code counts as a physical obstacle.
    pub fn is_solid_code(code: TileCode) -> bool {
        code <= LAST_SOLID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_the_enum() {
        assert_eq!(BlockType::from_code(45), Some(BlockType::DIRT));
        assert_eq!(BlockType::from_code(46), Some(BlockType::GRASS));
        assert_eq!(BlockType::from_code(75), Some(BlockType::OPEN));
        assert_eq!(BlockType::from_code(3), None);
        assert_eq!(BlockType::GRASS as TileCode, GRAS);
    }

    #[test]
    fn solid_threshold_splits_codes() {
        assert!(BlockType::is_solid_code(DIRT));
        assert!(BlockType::is_solid_code(GRAS));
        assert!(BlockType::is_solid_code(0));
        assert!(!BlockType::is_solid_code(OPEN));
        assert!(!BlockType::is_solid_code(LAST_SOLID + 1));
    }
}
