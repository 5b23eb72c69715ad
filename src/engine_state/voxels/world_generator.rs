//! # World Generator Module
//!
//! Procedural terrain fill and the per-frame grass spread that slowly
//! covers freshly exposed dirt.
//!
//! Terrain is a height field built from two ridge functions plus a raised
//! landmass around a fixed anchor. Column index `y` counts down from the sky,
//! so "solid" means `y` is deeper than the height at that column.

use fastrand::Rng;

use super::{
    block::block_type::{DIRT, GRAS, OPEN},
    grid::VoxelGrid,
};

/// Skylight assigned to every open cell at generation time.
pub const SKYLIGHT_AMBIENT: u8 = 15;
/// Columns probed by a single erosion tick.
pub const EROSION_PROBES_PER_TICK: usize = 100;
/// One in this many exposed solid cells starts out as grass.
pub const GRASS_SEED_ODDS: u32 = 100;

/// Tuning constants for the terrain height field.
#[derive(Debug, Clone, Copy)]
pub struct TerrainShape {
    pub ridge_base: f32,
    pub ridge_amplitude: f32,
    pub ridge_x_frequency: f32,
    pub ridge_z_frequency: f32,
    pub ridge_skew: f32,
    pub ridge_slope: f32,
    pub shelf_base: f32,
    pub shelf_x_amplitude: f32,
    pub shelf_x_phase: f32,
    pub shelf_x_frequency: f32,
    pub shelf_z_amplitude: f32,
    pub shelf_z_phase: f32,
    pub shelf_z_frequency: f32,
    pub mound_radius: f32,
    pub mound_strength: f32,
}

impl TerrainShape {
    pub const DEFAULT: TerrainShape = TerrainShape {
        ridge_base: 3.0,
        ridge_amplitude: 3.0,
        ridge_x_frequency: 0.1,
        ridge_z_frequency: 0.2,
        ridge_skew: 0.02,
        ridge_slope: 0.1,
        shelf_base: -14.0,
        shelf_x_amplitude: 12.0,
        shelf_x_phase: 1.0,
        shelf_x_frequency: 0.14,
        shelf_z_amplitude: 13.0,
        shelf_z_phase: 2.0,
        shelf_z_frequency: 0.18,
        mound_radius: 40.0,
        mound_strength: 0.6,
    };

    /// Rolling ridge height at a column, raised near the mound anchor.
    fn ridge_height(&self, x: i32, z: i32, anchor_distance: f32) -> f32 {
        let (xf, zf) = (x as f32, z as f32);
        let mut height = self.ridge_base
            + self.ridge_amplitude * (self.ridge_x_frequency * xf).sin()
            + self.ridge_amplitude * (self.ridge_z_frequency * zf + self.ridge_skew * xf).cos()
            + self.ridge_slope * (zf + xf);

        if anchor_distance < self.mound_radius {
            let mound = height * (self.mound_radius / anchor_distance) * self.mound_strength;
            if mound > height {
                height = mound;
            }
        }

        height
    }

    /// Secondary shelf height, mostly negative so it only pokes through in places.
    fn shelf_height(&self, x: i32, z: i32) -> f32 {
        let (xf, zf) = (x as f32, z as f32);
        self.shelf_base
            + self.shelf_x_amplitude * (self.shelf_x_phase + self.shelf_x_frequency * xf).sin()
            + self.shelf_z_amplitude * (self.shelf_z_phase + self.shelf_z_frequency * zf).cos()
    }
}

impl Default for TerrainShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Owns the random stream used for terrain fill and erosion.
pub struct WorldGenerator {
    rng: Rng,
    shape: TerrainShape,
}

impl WorldGenerator {
    /// Creates a generator. A `None` seed draws one from the process RNG.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            rng,
            shape: TerrainShape::DEFAULT,
        }
    }

    /// Fills the whole grid with fresh terrain and skylight.
    ///
    /// Every cell is rewritten, so this doubles as the respawn reset.
    pub fn generate(&mut self, grid: &mut VoxelGrid) {
        let dims = grid.dimensions();
        let (width, height, depth) = (dims.width as i32, dims.height as i32, dims.depth as i32);
        let anchor_x = 2 * width / 3;
        let anchor_z = depth / 3;
        let bottom = height - 1;

        for x in 0..width {
            for z in 0..depth {
                let dx = (x - anchor_x) as f32;
                let dz = (z - anchor_z) as f32;
                let anchor_distance = (dx * dx + dz * dz).sqrt();
                let ridge = self.shape.ridge_height(x, z, anchor_distance);
                let shelf = self.shape.shelf_height(x, z);

                for y in 0..height {
                    let depth_below_sky = (height - y) as f32;
                    let solid = y == bottom || depth_below_sky < ridge || depth_below_sky < shelf;

                    if solid {
                        let exposed = y == 0 || grid.get(x, y - 1, z) == OPEN;
                        let code = if exposed && self.rng.u32(0..GRASS_SEED_ODDS) == 1 {
                            GRAS
                        } else {
                            DIRT
                        };
                        grid.set(x, y, z, code);
                        grid.set_skylight(x, y, z, 0);
                    } else {
                        grid.set(x, y, z, OPEN);
                        grid.set_skylight(x, y, z, SKYLIGHT_AMBIENT);
                    }

                    if Self::is_landmark(x, y, z) {
                        grid.set(x, y, z, DIRT);
                        grid.set_skylight(x, y, z, 0);
                    }
                }
            }
        }

        log::info!(
            "Generated {}x{}x{} world: {} dirt, {} grass",
            width,
            height,
            depth,
            grid.count(DIRT),
            grid.count(GRAS)
        );
    }

    /// The two fixed walls near the origin that are always solid.
    fn is_landmark(x: i32, y: i32, z: i32) -> bool {
        (z == 4 && x + y < 10) || (x == 7 && z + y > 10 && z < 14)
    }

    /// Runs one erosion pass of [`EROSION_PROBES_PER_TICK`] column probes.
    ///
    /// Each probe picks an interior column and walks down from the sky to its
    /// first dirt cell. That cell turns to grass when it is open above and has
    /// grass beside it on its own level or one level above or below. The
    /// probe stops at that first dirt cell either way.
    ///
    /// # Returns
    /// The number of cells converted to grass.
    pub fn tick(&mut self, grid: &mut VoxelGrid) -> usize {
        let dims = grid.dimensions();
        if dims.width < 3 || dims.depth < 3 || dims.height < 3 {
            return 0;
        }

        let mut converted = 0;
        for _ in 0..EROSION_PROBES_PER_TICK {
            let x = 1 + self.rng.usize(0..dims.width - 2) as i32;
            let z = 1 + self.rng.usize(0..dims.depth - 2) as i32;

            for y in 1..dims.height as i32 - 1 {
                if grid.get(x, y, z) != DIRT {
                    continue;
                }
                if grid.get(x, y - 1, z) == OPEN && Self::touches_grass(grid, x, y, z) {
                    grid.set(x, y, z, GRAS);
                    converted += 1;
                }
                break;
            }
        }

        converted
    }

    fn touches_grass(grid: &VoxelGrid, x: i32, y: i32, z: i32) -> bool {
        const HORIZONTAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

        [y, y + 1, y - 1].iter().any(|&level| {
            HORIZONTAL
                .iter()
                .any(|&(dx, dz)| grid.get(x + dx, level, z + dz) == GRAS)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::WorldDimensions;

    fn generated(seed: u64, dims: WorldDimensions) -> VoxelGrid {
        let mut grid = VoxelGrid::new(dims);
        WorldGenerator::new(Some(seed)).generate(&mut grid);
        grid
    }

    #[test]
    fn bottom_layer_is_always_solid_and_unlit() {
        let dims = WorldDimensions::new(24, 12, 24);
        let grid = generated(7, dims);
        let bottom = dims.height as i32 - 1;
        for x in 0..dims.width as i32 {
            for z in 0..dims.depth as i32 {
                assert!(grid.is_solid(x, bottom, z));
                assert_eq!(grid.skylight(x, bottom, z), 0);
            }
        }
    }

    #[test]
    fn skylight_follows_openness() {
        let dims = WorldDimensions::new(30, 16, 30);
        let grid = generated(11, dims);
        for x in 0..dims.width as i32 {
            for y in 0..dims.height as i32 {
                for z in 0..dims.depth as i32 {
                    let expected = if grid.get(x, y, z) == OPEN { SKYLIGHT_AMBIENT } else { 0 };
                    assert_eq!(grid.skylight(x, y, z), expected);
                }
            }
        }
    }

    #[test]
    fn landmark_walls_are_dirt() {
        let grid = generated(3, WorldDimensions::new(20, 20, 20));
        assert_eq!(grid.get(0, 0, 4), DIRT);
        assert_eq!(grid.get(5, 4, 4), DIRT);
        assert_eq!(grid.get(7, 0, 12), DIRT);
        assert_eq!(grid.get(7, 5, 13), DIRT);
    }

    #[test]
    fn same_seed_generates_the_same_world() {
        let dims = WorldDimensions::new(32, 16, 32);
        let a = generated(42, dims);
        let b = generated(42, dims);
        for x in 0..dims.width as i32 {
            for y in 0..dims.height as i32 {
                for z in 0..dims.depth as i32 {
                    assert_eq!(a.get(x, y, z), b.get(x, y, z));
                }
            }
        }
    }

    #[test]
    fn erosion_converts_exposed_dirt_beside_grass() {
        // a single interior column so every probe lands on x = 1, z = 1
        let mut grid = VoxelGrid::new(WorldDimensions::new(3, 4, 3));
        grid.set(1, 1, 1, DIRT);
        grid.set(2, 1, 1, GRAS);

        let converted = WorldGenerator::new(Some(1)).tick(&mut grid);

        assert_eq!(converted, 1);
        assert_eq!(grid.get(1, 1, 1), GRAS);
    }

    #[test]
    fn erosion_needs_an_open_cell_above() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(3, 4, 3));
        grid.set(1, 0, 1, GRAS);
        grid.set(1, 1, 1, DIRT);
        grid.set(0, 1, 1, GRAS);

        assert_eq!(WorldGenerator::new(Some(1)).tick(&mut grid), 0);
        assert_eq!(grid.get(1, 1, 1), DIRT);
    }

    #[test]
    fn erosion_reaches_grass_one_level_away() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(3, 5, 3));
        grid.set(1, 2, 1, DIRT);
        grid.set(1, 3, 0, GRAS);

        assert_eq!(WorldGenerator::new(Some(5)).tick(&mut grid), 1);
        assert_eq!(grid.get(1, 2, 1), GRAS);
    }

    #[test]
    fn erosion_only_ever_adds_grass_next_to_grass() {
        let dims = WorldDimensions::new(40, 16, 40);
        let mut grid = generated(99, dims);
        let mut generator = WorldGenerator::new(Some(100));

        for _ in 0..20 {
            let before = grid.clone();
            generator.tick(&mut grid);

            for x in 0..dims.width as i32 {
                for y in 0..dims.height as i32 {
                    for z in 0..dims.depth as i32 {
                        let (old, new) = (before.get(x, y, z), grid.get(x, y, z));
                        if old == GRAS {
                            assert_eq!(new, GRAS);
                        }
                        if old != new {
                            assert_eq!((old, new), (DIRT, GRAS));
                            assert!(WorldGenerator::touches_grass(&grid, x, y, z));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn erosion_without_any_grass_changes_nothing() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(10, 6, 10));
        for x in 0..10 {
            for z in 0..10 {
                grid.set(x, 3, z, DIRT);
            }
        }
        assert_eq!(WorldGenerator::new(Some(2)).tick(&mut grid), 0);
        assert_eq!(grid.count(GRAS), 0);
    }
}
