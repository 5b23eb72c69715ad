//! # Target Raycaster
//!
//! Short-range grid march from the eye used to pick the block under the
//! crosshair and the open cell in front of it.

use cgmath::{Point3, Vector3, Zero};

use crate::engine_state::voxels::{block::block_type::OPEN, grid::VoxelGrid, BLOCK_SIZE};

/// Boundary crossings tried before giving up.
pub const RAYCAST_STEP_BUDGET: usize = 7;
/// Overshoot applied on each advance so the eye lands just past the boundary.
const BOUNDARY_NUDGE: f32 = 1.0001;

/// A block hit by the view ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    /// The first non-open cell along the ray
    pub target: Point3<i32>,
    /// The cell visited just before `target`
    pub place: Point3<i32>,
}

/// Distance along `direction` to the next block boundary on one axis.
fn boundary_distance(cell: i32, eye: f32, direction: f32) -> f32 {
    if direction == 0.0 {
        return f32::INFINITY;
    }
    let boundary = BLOCK_SIZE * (cell + if direction > 0.0 { 1 } else { 0 });
    (boundary as f32 - eye) / direction
}

/// Marches from `eye` along `direction` crossing one block boundary at a time.
///
/// The starting cell itself is never a target.
///
/// # Returns
/// The hit, or `None` if the ray leaves the world or runs out of steps
/// before reaching a non-open cell.
pub fn raycast_target(grid: &VoxelGrid, eye: Point3<f32>, direction: Vector3<f32>) -> Option<RayHit> {
    if direction.is_zero() {
        return None;
    }

    let bs = BLOCK_SIZE as f32;
    let mut eye = eye;
    let mut cell = Point3::new((eye.x / bs) as i32, (eye.y / bs) as i32, (eye.z / bs) as i32);

    for _ in 0..RAYCAST_STEP_BUDGET {
        let place = cell;
        let a = [
            boundary_distance(cell.x, eye.x, direction.x),
            boundary_distance(cell.y, eye.y, direction.y),
            boundary_distance(cell.z, eye.z, direction.z),
        ];

        let axis = if a[0] < a[1] && a[0] < a[2] {
            0
        } else if a[1] < a[2] {
            1
        } else {
            2
        };
        cell[axis] += if direction[axis] > 0.0 { 1 } else { -1 };
        eye += direction * (a[axis] * BOUNDARY_NUDGE);

        if !grid.in_bounds(cell.x, cell.y, cell.z) {
            return None;
        }
        if grid.get_at(cell) != OPEN {
            return Some(RayHit { target: cell, place });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::block_type::DIRT, grid::WorldDimensions};

    fn grid_with_floor(floor: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(WorldDimensions::new(8, 8, 8));
        for x in 0..8 {
            for z in 0..8 {
                grid.set(x, floor, z, DIRT);
            }
        }
        grid
    }

    #[test]
    fn looking_down_hits_the_floor() {
        let grid = grid_with_floor(4);
        let hit = raycast_target(&grid, Point3::new(150.0, 150.0, 150.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(
            hit,
            Some(RayHit {
                target: Point3::new(2, 4, 2),
                place: Point3::new(2, 3, 2),
            })
        );
    }

    #[test]
    fn diagonal_ray_places_on_the_near_side() {
        let grid = grid_with_floor(4);
        let direction = Vector3::new(0.3, 1.0, 0.0);
        let hit = raycast_target(&grid, Point3::new(150.0, 150.0, 150.0), direction)
            .expect("floor is within reach");
        assert_eq!(hit.target.y, 4);
        assert_eq!(hit.place.y, 3);
        assert_eq!(hit.target.x, hit.place.x);
    }

    #[test]
    fn nothing_in_reach_is_a_miss() {
        let grid = grid_with_floor(7);
        let hit = raycast_target(&grid, Point3::new(30.0, 30.0, 30.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn leaving_the_world_is_a_miss() {
        let grid = grid_with_floor(4);
        let hit = raycast_target(&grid, Point3::new(150.0, 150.0, 150.0), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn floor_beyond_the_step_budget_is_a_miss() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(4, 12, 4));
        for x in 0..4 {
            for z in 0..4 {
                grid.set(x, 11, z, DIRT);
            }
        }
        // eleven boundaries away, more than the budget allows
        let hit = raycast_target(&grid, Point3::new(90.0, 10.0, 90.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn zero_direction_is_a_miss() {
        let grid = grid_with_floor(4);
        assert_eq!(raycast_target(&grid, Point3::new(150.0, 150.0, 150.0), Vector3::zero()), None);
    }
}
