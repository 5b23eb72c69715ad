//! Smoothed corner lighting.
//!
//! Each of a block's eight corners sums eight skylight samples around that
//! corner, scaled by [`LIGHT_BLEND_WEIGHT`]. Faces then pick their four
//! corners from that set, so faces of one block agree on the light at shared
//! corners.

use crate::engine_state::voxels::{block::block_side::BlockSide, grid::VoxelGrid};

/// Scale applied to a corner's summed skylight. Eight fully lit cells give
/// a little under one.
pub const LIGHT_BLEND_WEIGHT: f32 = 0.008;

/// Unit offsets `(x, y, z)` of each face's corners from the block origin,
/// in the order the face shader walks them. Offset 0 on `y` is the sky side.
pub fn face_corner_offsets(side: BlockSide) -> [[usize; 3]; 4] {
    match side {
        BlockSide::UP => [[0, 0, 0], [1, 0, 0], [0, 0, 1], [1, 0, 1]],
        BlockSide::EAST => [[1, 0, 1], [1, 0, 0], [1, 1, 1], [1, 1, 0]],
        BlockSide::NORTH => [[0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]],
        BlockSide::WEST => [[0, 0, 0], [0, 0, 1], [0, 1, 0], [0, 1, 1]],
        BlockSide::SOUTH => [[1, 0, 0], [0, 0, 0], [1, 1, 0], [0, 1, 0]],
        BlockSide::DOWN => [[1, 1, 0], [0, 1, 0], [1, 1, 1], [0, 1, 1]],
    }
}

/// Light at the eight corners of one block, indexed `[x][y][z]` by corner
/// offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerLights {
    corners: [[[f32; 2]; 2]; 2],
}

impl CornerLights {
    /// Samples the skylight around the block at `(x, y, z)`.
    ///
    /// On the low side of each axis the neighbour index is clamped at zero;
    /// on the high side it may reach one past the tile grid, where the
    /// skylight grid still has (unlit) cells.
    pub fn sample(grid: &VoxelGrid, x: i32, y: i32, z: i32) -> Self {
        let neighbor = |c: i32, offset: usize| if offset == 0 { (c - 1).max(0) } else { c + 1 };
        let mut corners = [[[0.0; 2]; 2]; 2];

        for (ox, plane) in corners.iter_mut().enumerate() {
            for (oy, row) in plane.iter_mut().enumerate() {
                for (oz, corner) in row.iter_mut().enumerate() {
                    let (nx, ny, nz) = (neighbor(x, ox), neighbor(y, oy), neighbor(z, oz));
                    // The cell straight above or below is skipped and the
                    // x-diagonal on that layer counts twice.
                    let cells = [
                        (nx, ny, nz),
                        (nx, ny, z),
                        (nx, y, z),
                        (nx, y, nz),
                        (x, y, nz),
                        (x, ny, nz),
                        (nx, ny, z),
                        (x, y, z),
                    ];
                    let sum: u32 = cells
                        .iter()
                        .map(|&(cx, cy, cz)| grid.skylight(cx, cy, cz) as u32)
                        .sum();
                    *corner = LIGHT_BLEND_WEIGHT * sum as f32;
                }
            }
        }

        Self { corners }
    }

    /// The four corner lights of one face, in shader corner order.
    pub fn face(&self, side: BlockSide) -> [f32; 4] {
        face_corner_offsets(side).map(|[ox, oy, oz]| self.corners[ox][oy][oz])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::WorldDimensions;

    fn lit_grid() -> VoxelGrid {
        let mut grid = VoxelGrid::new(WorldDimensions::new(4, 4, 4));
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    grid.set_skylight(x, y, z, 15);
                }
            }
        }
        grid
    }

    #[test]
    fn fully_lit_interior_corner_sums_eight_samples() {
        let lights = CornerLights::sample(&lit_grid(), 1, 1, 1);
        for side in BlockSide::all() {
            for light in lights.face(side) {
                assert!((light - LIGHT_BLEND_WEIGHT * 120.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn dark_cells_darken_only_the_corners_they_touch() {
        let mut grid = lit_grid();
        // the cell diagonally above-south-west of (1, 1, 1)
        grid.set_skylight(0, 0, 0, 0);
        let lights = CornerLights::sample(&grid, 1, 1, 1);

        let up = lights.face(BlockSide::UP);
        assert!((up[0] - LIGHT_BLEND_WEIGHT * 105.0).abs() < 1e-6);
        assert!((up[3] - LIGHT_BLEND_WEIGHT * 120.0).abs() < 1e-6);

        let down = lights.face(BlockSide::DOWN);
        assert!(down.iter().all(|l| (l - LIGHT_BLEND_WEIGHT * 120.0).abs() < 1e-6));
    }

    #[test]
    fn cell_straight_above_is_not_sampled_and_its_diagonal_counts_twice() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(4, 4, 4));
        grid.set_skylight(1, 0, 1, 15);
        let lights = CornerLights::sample(&grid, 1, 1, 1);
        assert_eq!(lights.face(BlockSide::UP)[0], 0.0);

        let mut grid = VoxelGrid::new(WorldDimensions::new(4, 4, 4));
        grid.set_skylight(0, 0, 1, 15);
        let lights = CornerLights::sample(&grid, 1, 1, 1);
        let up = lights.face(BlockSide::UP);
        // usw and unw both read (0, 0, 1) twice
        assert!((up[0] - LIGHT_BLEND_WEIGHT * 30.0).abs() < 1e-6);
        assert!((up[2] - LIGHT_BLEND_WEIGHT * 30.0).abs() < 1e-6);
        assert_eq!(up[1], 0.0);
    }

    #[test]
    fn corners_past_the_far_edge_read_unlit_padding() {
        let lights = CornerLights::sample(&lit_grid(), 3, 3, 3);
        let down = lights.face(BlockSide::DOWN);
        // dne corner: only the block itself is inside the lit grid
        assert!((down[2] - LIGHT_BLEND_WEIGHT * 15.0).abs() < 1e-6);
    }

    #[test]
    fn shared_corners_agree_across_faces() {
        let mut grid = lit_grid();
        grid.set_skylight(2, 0, 2, 3);
        let lights = CornerLights::sample(&grid, 1, 1, 1);
        // the up-north-east corner
        assert_eq!(lights.face(BlockSide::UP)[3], lights.face(BlockSide::NORTH)[1]);
        assert_eq!(lights.face(BlockSide::UP)[3], lights.face(BlockSide::EAST)[0]);
    }
}
