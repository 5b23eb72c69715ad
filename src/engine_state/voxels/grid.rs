//! # Voxel Grid Module
//!
//! The single, fixed-extent world grid: one tile code per cell plus a
//! parallel skylight grid that is one cell larger on every axis so that
//! corner-light sampling at the far edges never leaves the array.
//!
//! Coordinates are `(x, y, z)` with `y` growing downward. Any coordinate
//! outside the extents is "out of world": it reads as [`OPEN`], is never
//! solid, and writes to it are ignored.

use cgmath::Point3;

use super::block::{
    block_type::{BlockType, OPEN},
    TileCode,
};

/// Extents of the grid in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldDimensions {
    /// Number of cells along `x`
    pub width: usize,
    /// Number of cells along `y`
    pub height: usize,
    /// Number of cells along `z`
    pub depth: usize,
}

impl WorldDimensions {
    /// Creates a new set of extents.
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }
}

/// A mutable 3D array of tile codes with a parallel skylight array.
///
/// Storage is `tiles[z][y][x]` flattened into a single vector.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    dimensions: WorldDimensions,
    tiles: Vec<TileCode>,
    skylight: Vec<u8>,
}

impl VoxelGrid {
    /// Creates a grid filled with [`OPEN`] and zero skylight.
    pub fn new(dimensions: WorldDimensions) -> Self {
        let light_cells = (dimensions.width + 1) * (dimensions.height + 1) * (dimensions.depth + 1);
        Self {
            dimensions,
            tiles: vec![OPEN; dimensions.cell_count()],
            skylight: vec![0; light_cells],
        }
    }

    /// The grid extents.
    pub fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    /// Whether the coordinate names a cell owned by the grid.
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.dimensions.width
            && (y as usize) < self.dimensions.height
            && (z as usize) < self.dimensions.depth
    }

    fn tile_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some(x + self.dimensions.width * (y + self.dimensions.height * z))
    }

    fn light_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let (w, h, d) = (
            self.dimensions.width + 1,
            self.dimensions.height + 1,
            self.dimensions.depth + 1,
        );
        if x < 0 || y < 0 || z < 0 || x as usize >= w || y as usize >= h || z as usize >= d {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some(x + w * (y + h * z))
    }

    /// Reads the tile code at a coordinate, [`OPEN`] when out of world.
    pub fn get(&self, x: i32, y: i32, z: i32) -> TileCode {
        match self.tile_index(x, y, z) {
            Some(index) => self.tiles[index],
            None => OPEN,
        }
    }

    /// Reads the tile code at a grid point.
    pub fn get_at(&self, position: Point3<i32>) -> TileCode {
        self.get(position.x, position.y, position.z)
    }

    /// Writes a tile code.
    ///
    /// # Returns
    /// `false` when the coordinate is out of world and nothing was written.
    pub fn set(&mut self, x: i32, y: i32, z: i32, code: TileCode) -> bool {
        match self.tile_index(x, y, z) {
            Some(index) => {
                self.tiles[index] = code;
                true
            }
            None => false,
        }
    }

    /// Writes a tile code at a grid point.
    pub fn set_at(&mut self, position: Point3<i32>, code: TileCode) -> bool {
        self.set(position.x, position.y, position.z, code)
    }

    /// Whether the cell is in world and holds a solid tile.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.in_bounds(x, y, z) && BlockType::is_solid_code(self.get(x, y, z))
    }

    /// Skylight intensity (0-15). The light grid extends one cell past the
    /// tile grid on the high side of each axis; anything beyond reads 0.
    pub fn skylight(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.light_index(x, y, z) {
            Some(index) => self.skylight[index],
            None => 0,
        }
    }

    /// Sets the skylight of an in-world cell. Out-of-world writes are ignored.
    pub fn set_skylight(&mut self, x: i32, y: i32, z: i32, light: u8) {
        if !self.in_bounds(x, y, z) {
            return;
        }
        if let Some(index) = self.light_index(x, y, z) {
            self.skylight[index] = light;
        }
    }

    /// Resets every cell to [`OPEN`] with no light.
    #[cfg(test)]
    pub fn clear(&mut self) {
        self.tiles.fill(OPEN);
        self.skylight.fill(0);
    }

    /// Counts the cells holding a given tile code.
    pub fn count(&self, code: TileCode) -> usize {
        self.tiles.iter().filter(|&&tile| tile == code).count()
    }
}
