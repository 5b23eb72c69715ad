//! Face extraction for the voxel grid.
//!
//! The whole grid is re-meshed every frame. Only faces that look onto open
//! space (or out of the world) are emitted, each as one [`FaceVertex`]
//! carrying its texture layer, orientation and four corner lights. Faces
//! stream through a [`StreamingVertexSink`] so the GPU sees fixed-size
//! batches no matter how much of the world is visible.
//!
//! # Architecture
//! - `lighting`: per-corner skylight averaging
//! - `vertex_sink`: the bounded buffer and its flush callback

use cgmath::Point3;

pub mod lighting;
pub mod vertex_sink;

pub use lighting::CornerLights;
pub use vertex_sink::{SinkTotals, StreamingVertexSink, VertexBatchSubmitter};

use crate::engine_state::{
    rendering::vertex::FaceVertex,
    voxels::{
        block::{
            block_side::BlockSide,
            block_type::{BlockType, OPEN},
        },
        grid::VoxelGrid,
    },
};

/// Emits every visible face of the block at `(x, y, z)`.
///
/// Open cells and tile codes without a texture emit nothing.
pub fn mesh_block<S>(grid: &VoxelGrid, x: i32, y: i32, z: i32, sink: &mut StreamingVertexSink<'_, S>)
where
    S: VertexBatchSubmitter + ?Sized,
{
    let code = grid.get(x, y, z);
    if code == OPEN {
        return;
    }
    let Some(block_type) = BlockType::from_code(code) else {
        return;
    };

    let lights = CornerLights::sample(grid, x, y, z);
    for side in BlockSide::all() {
        let (dx, dy, dz) = side.neighbor_offset();
        if grid.get(x + dx, y + dy, z + dz) != OPEN {
            continue;
        }
        if let Some(layer) = block_type.texture_layer(side) {
            sink.push(FaceVertex::new(Point3::new(x, y, z), side, layer, lights.face(side)));
        }
    }
}

/// Walks the grid `x`, then `y`, then `z`, pushing every visible face.
///
/// The sink is not finished here; the caller flushes the tail with
/// [`StreamingVertexSink::finish`].
pub fn mesh_world<S>(grid: &VoxelGrid, sink: &mut StreamingVertexSink<'_, S>)
where
    S: VertexBatchSubmitter + ?Sized,
{
    let dims = grid.dimensions();
    for x in 0..dims.width as i32 {
        for y in 0..dims.height as i32 {
            for z in 0..dims.depth as i32 {
                mesh_block(grid, x, y, z, sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::{
            block_type::{DIRT, GRAS},
            TEXTURE_LAYER_BOTTOM, TEXTURE_LAYER_SIDE, TEXTURE_LAYER_TOP,
        },
        grid::WorldDimensions,
        world_generator::WorldGenerator,
    };

    fn mesh(grid: &VoxelGrid, capacity: usize) -> (Vec<FaceVertex>, SinkTotals, usize) {
        let mut faces = Vec::new();
        let mut largest_batch = 0;
        let mut record = |batch: &[FaceVertex]| {
            largest_batch = largest_batch.max(batch.len());
            faces.extend_from_slice(batch);
        };
        let mut buffer = Vec::new();
        let mut sink = StreamingVertexSink::new(&mut buffer, capacity, &mut record);
        mesh_world(grid, &mut sink);
        let totals = sink.finish();
        (faces, totals, largest_batch)
    }

    #[test]
    fn open_grid_emits_nothing() {
        let grid = VoxelGrid::new(WorldDimensions::new(6, 6, 6));
        let (faces, totals, _) = mesh(&grid, 16);
        assert!(faces.is_empty());
        assert_eq!(totals, SinkTotals::default());
    }

    #[test]
    fn lone_block_emits_all_six_faces() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(5, 5, 5));
        grid.set(2, 2, 2, GRAS);
        let (faces, totals, _) = mesh(&grid, 16);

        assert_eq!(totals.faces, 6);
        let orientations: Vec<u32> = faces.iter().map(|f| f.orientation).collect();
        assert_eq!(orientations, vec![1, 5, 3, 4, 2, 6]);
        assert!(faces.iter().all(|f| f.position == [2, 2, 2]));

        let layer = |side: BlockSide| faces.iter().find(|f| f.orientation == side as u32).map(|f| f.texture_layer);
        assert_eq!(layer(BlockSide::UP), Some(TEXTURE_LAYER_TOP));
        assert_eq!(layer(BlockSide::WEST), Some(TEXTURE_LAYER_SIDE));
        assert_eq!(layer(BlockSide::DOWN), Some(TEXTURE_LAYER_BOTTOM));
    }

    #[test]
    fn blocks_at_the_world_edge_show_their_outer_faces() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(1, 1, 1));
        grid.set(0, 0, 0, DIRT);
        let (faces, _, _) = mesh(&grid, 16);
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|f| f.texture_layer == TEXTURE_LAYER_BOTTOM));
    }

    #[test]
    fn touching_blocks_hide_their_shared_faces() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(5, 5, 5));
        grid.set(1, 1, 1, DIRT);
        grid.set(2, 1, 1, DIRT);
        let (faces, _, _) = mesh(&grid, 16);
        assert_eq!(faces.len(), 10);
        assert!(!faces
            .iter()
            .any(|f| f.position == [1, 1, 1] && f.orientation == BlockSide::EAST as u32));
    }

    #[test]
    fn unknown_solid_codes_are_not_drawn() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(3, 3, 3));
        grid.set(1, 1, 1, 7);
        let (faces, _, _) = mesh(&grid, 16);
        assert!(faces.is_empty());
    }

    #[test]
    fn batches_stay_bounded_and_account_for_every_face() {
        let mut grid = VoxelGrid::new(WorldDimensions::new(24, 10, 24));
        WorldGenerator::new(Some(8)).generate(&mut grid);

        let (unbatched, _, _) = mesh(&grid, 1_000_000);
        let (faces, totals, largest) = mesh(&grid, 37);

        assert!(largest <= 37);
        assert_eq!(totals.faces, faces.len());
        assert_eq!(faces, unbatched);
        assert_eq!(totals.batches, faces.len().div_ceil(37));
    }
}
