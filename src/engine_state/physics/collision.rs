//! # Collision Solver
//!
//! Box-versus-grid collision and the unit-step movement sweep.
//!
//! Boxes are axis-aligned with `min` at their lowest corner. Overlap uses an
//! asymmetric boundary rule on every axis: the left box's far edge may touch
//! the right box's near edge and still count as overlapping, but not the
//! other way round. Resting contact depends on this, so it stays as is.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{grid::VoxelGrid, BLOCK_SIZE};

/// An axis-aligned box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lowest corner on every axis
    pub min: Point3<f32>,
    /// Extent along each axis
    pub size: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, size: Vector3<f32>) -> Self {
        Self { min, size }
    }

    /// The unit cube of the block at `(bx, by, bz)`.
    pub fn block(bx: i32, by: i32, bz: i32) -> Self {
        let bs = BLOCK_SIZE as f32;
        Self::new(
            Point3::new(bs * bx as f32, bs * by as f32, bs * bz as f32),
            Vector3::new(bs, bs, bs),
        )
    }

    /// A copy of this box moved by `offset`.
    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self::new(self.min + offset, self.size)
    }
}

/// Overlap test with `>=` on the near side and `<` on the far side.
///
/// `box_overlap(a, b)` and `box_overlap(b, a)` differ when the boxes only
/// touch: a box spanning `0..10` overlaps one spanning `10..20`, but not the
/// reverse.
pub fn box_overlap(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|axis| {
        a.min[axis] + a.size[axis] >= b.min[axis] && a.min[axis] < b.min[axis] + b.size[axis]
    })
}

/// Whether `aabb` overlaps the block at `(bx, by, bz)`.
///
/// Out-of-world blocks never collide.
pub fn block_collide(grid: &VoxelGrid, bx: i32, by: i32, bz: i32, aabb: &Aabb) -> bool {
    grid.is_solid(bx, by, bz) && box_overlap(aabb, &Aabb::block(bx, by, bz))
}

/// Whether `aabb` overlaps any solid block near its origin.
///
/// Checks the blocks one to either side of the box origin on `x` and `z`,
/// and from one above to two below on `y` so a body two blocks tall is
/// covered.
pub fn world_collide(grid: &VoxelGrid, aabb: &Aabb) -> bool {
    let bs = BLOCK_SIZE as f32;
    for i in -1..=1 {
        for j in -1..=2 {
            for k in -1..=1 {
                let bx = (aabb.min.x / bs + i as f32) as i32;
                let by = (aabb.min.y / bs + j as f32) as i32;
                let bz = (aabb.min.z / bs + k as f32) as i32;

                if block_collide(grid, bx, by, bz, aabb) {
                    return true;
                }
            }
        }
    }

    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Splits an integer displacement into unit steps, one axis at a time.
///
/// Horizontal axes alternate with each other, and any remaining vertical
/// displacement is taken straight after each horizontal step. Vertical is
/// also taken once nothing horizontal remains.
#[derive(Debug, Clone)]
pub struct AxisSweep {
    remaining: Vector3<i32>,
    last_axis: Option<Axis>,
}

impl AxisSweep {
    pub fn new(displacement: Vector3<i32>) -> Self {
        Self {
            remaining: displacement,
            last_axis: None,
        }
    }

    /// Displacement still to be consumed.
    #[cfg(test)]
    pub fn remaining(&self) -> Vector3<i32> {
        self.remaining
    }

    fn choose_axis(&self) -> Axis {
        let r = self.remaining;
        let last_horizontal = matches!(self.last_axis, Some(Axis::X) | Some(Axis::Z));

        if (r.x == 0 && r.z == 0) || (last_horizontal && r.y != 0) {
            Axis::Y
        } else if r.z == 0 || (self.last_axis == Some(Axis::Z) && r.x != 0) {
            Axis::X
        } else {
            Axis::Z
        }
    }

    /// Consumes one unit step.
    ///
    /// # Returns
    /// The axis and signed unit amount, or `None` once the displacement is
    /// used up.
    pub fn next_step(&mut self) -> Option<(Axis, i32)> {
        if self.remaining == Vector3::new(0, 0, 0) {
            return None;
        }

        let axis = self.choose_axis();
        let amount = if self.remaining[axis as usize] > 0 { 1 } else { -1 };
        self.remaining[axis as usize] -= amount;
        self.last_axis = Some(axis);

        Some((axis, amount))
    }

    /// Drops whatever displacement is left on `axis`.
    pub fn block(&mut self, axis: Axis) {
        self.remaining[axis as usize] = 0;
    }
}

/// Moves `aabb` through the grid by `displacement`, one unit at a time.
///
/// A step that would newly collide is skipped and its axis blocked. While the
/// box already overlaps the world, colliding steps are still applied so an
/// embedded body can work its way out; the first step that lands clear ends
/// that grace.
///
/// # Returns
/// `true` when at least one step was applied, or when the displacement is
/// zero.
pub fn move_box(grid: &VoxelGrid, aabb: &mut Aabb, displacement: Vector3<i32>) -> bool {
    if displacement == Vector3::new(0, 0, 0) {
        return true;
    }

    let mut already_stuck = world_collide(grid, aabb);
    let mut moved = false;
    let mut sweep = AxisSweep::new(displacement);

    while let Some((axis, amount)) = sweep.next_step() {
        let mut offset = Vector3::new(0.0, 0.0, 0.0);
        offset[axis as usize] = amount as f32;
        let candidate = aabb.translated(offset);

        let would_be_stuck = world_collide(grid, &candidate);
        if !would_be_stuck {
            already_stuck = false;
        }

        if would_be_stuck && !already_stuck {
            sweep.block(axis);
            continue;
        }

        *aabb = candidate;
        moved = true;
    }

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::block_type::{DIRT, OPEN},
        grid::WorldDimensions,
    };

    fn boxed(x: f32, w: f32) -> Aabb {
        Aabb::new(Point3::new(x, 0.0, 0.0), Vector3::new(w, 10.0, 10.0))
    }

    /// A 12-cube grid with the cell at (5, 5, 5) open and everything around it solid.
    fn enclosure() -> VoxelGrid {
        let mut grid = VoxelGrid::new(WorldDimensions::new(12, 12, 12));
        for x in 3..=7 {
            for y in 3..=8 {
                for z in 3..=7 {
                    grid.set(x, y, z, DIRT);
                }
            }
        }
        grid.set(5, 5, 5, OPEN);
        grid
    }

    fn cell_sized_body(bx: i32, by: i32, bz: i32) -> Aabb {
        let bs = BLOCK_SIZE as f32;
        Aabb::new(
            Point3::new(bx as f32 * bs, by as f32 * bs, bz as f32 * bs),
            Vector3::new(bs - 1.0, bs - 1.0, bs - 1.0),
        )
    }

    #[test]
    fn touching_edges_overlap_only_from_the_near_side() {
        let left = boxed(0.0, 10.0);
        let right = boxed(10.0, 10.0);
        assert!(box_overlap(&left, &right));
        assert!(!box_overlap(&right, &left));
    }

    #[test]
    fn separated_boxes_do_not_overlap() {
        assert!(!box_overlap(&boxed(0.0, 10.0), &boxed(10.5, 10.0)));
        assert!(box_overlap(&boxed(0.0, 10.0), &boxed(5.0, 10.0)));
    }

    #[test]
    fn out_of_world_blocks_never_collide() {
        let grid = VoxelGrid::new(WorldDimensions::new(4, 4, 4));
        let outside = Aabb::new(Point3::new(-500.0, -500.0, -500.0), Vector3::new(48.0, 60.0, 48.0));
        assert!(!world_collide(&grid, &outside));
        assert!(!block_collide(&grid, -1, 0, 0, &outside));
    }

    #[test]
    fn zero_move_reports_moved_and_stays_put() {
        let grid = enclosure();
        let mut body = cell_sized_body(5, 5, 5);
        let before = body;
        assert!(move_box(&grid, &mut body, Vector3::new(0, 0, 0)));
        assert_eq!(body, before);
    }

    #[test]
    fn enclosed_body_cannot_move() {
        let grid = enclosure();
        let mut body = cell_sized_body(5, 5, 5);
        let before = body;
        assert!(!world_collide(&grid, &body));
        assert!(!move_box(&grid, &mut body, Vector3::new(3, -2, 1)));
        assert_eq!(body, before);
    }

    #[test]
    fn embedded_body_may_keep_moving() {
        let grid = enclosure();
        let mut body = cell_sized_body(4, 5, 5);
        assert!(world_collide(&grid, &body));
        assert!(move_box(&grid, &mut body, Vector3::new(2, 0, 0)));
        assert_eq!(body.min.x, 4.0 * BLOCK_SIZE as f32 + 2.0);
    }

    #[test]
    fn free_movement_consumes_the_whole_displacement() {
        let grid = VoxelGrid::new(WorldDimensions::new(8, 8, 8));
        let mut body = cell_sized_body(3, 3, 3);
        let start = body.min;
        assert!(move_box(&grid, &mut body, Vector3::new(4, -3, -7)));
        assert_eq!(body.min, start + Vector3::new(4.0, -3.0, -7.0));
    }

    #[test]
    fn blocked_axis_stops_while_others_continue() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(12, 12, 12));
        for y in 0..12 {
            for z in 0..12 {
                grid.set(6, y, z, DIRT);
            }
        }
        let bs = BLOCK_SIZE as f32;
        // far x edge sits one unit short of the wall
        let mut body = Aabb::new(Point3::new(6.0 * bs - 60.0, 3.0 * bs, 3.0 * bs), Vector3::new(59.0, 59.0, 59.0));

        assert!(move_box(&grid, &mut body, Vector3::new(5, 0, 5)));
        assert_eq!(body.min.x, 6.0 * bs - 60.0);
        assert_eq!(body.min.z, 3.0 * bs + 5.0);
    }

    #[test]
    fn sweep_alternates_horizontal_axes() {
        let mut sweep = AxisSweep::new(Vector3::new(2, 0, 2));
        let axes: Vec<Axis> = std::iter::from_fn(|| sweep.next_step().map(|(axis, _)| axis)).collect();
        assert_eq!(axes, vec![Axis::Z, Axis::X, Axis::Z, Axis::X]);
    }

    #[test]
    fn sweep_takes_vertical_after_each_horizontal_step() {
        let mut sweep = AxisSweep::new(Vector3::new(1, -2, 1));
        let steps: Vec<(Axis, i32)> = std::iter::from_fn(|| sweep.next_step()).collect();
        assert_eq!(
            steps,
            vec![(Axis::Z, 1), (Axis::Y, -1), (Axis::X, 1), (Axis::Y, -1)]
        );
        assert_eq!(sweep.remaining(), Vector3::new(0, 0, 0));
    }

    #[test]
    fn blocking_an_axis_drops_its_remainder() {
        let mut sweep = AxisSweep::new(Vector3::new(3, 0, 0));
        assert_eq!(sweep.next_step(), Some((Axis::X, 1)));
        sweep.block(Axis::X);
        assert_eq!(sweep.next_step(), None);
    }
}
