//! Face record layout shared by the mesher and the face shader.
//!
//! One `FaceVertex` describes a whole visible block face. It is bound as a
//! per-instance attribute and the vertex shader expands it into a quad.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// A single visible face of a block.
///
/// # Memory Layout
/// - Texture layer: u32 (4 bytes)
/// - Orientation code: u32 (4 bytes)
/// - Block position: 3x i32 (12 bytes)
/// - Corner lights: 4x f32 (16 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FaceVertex {
    /// Layer in the block texture array
    pub texture_layer: u32,
    /// [`BlockSide`] discriminant, 1 to 6
    pub orientation: u32,
    /// Block coordinate in the grid, scaled by block size in the shader
    pub position: [i32; 3],
    /// Light at the face's four corners, in shader corner order
    pub corner_lights: [f32; 4],
}

impl FaceVertex {
    /// Creates a face record.
    ///
    /// # Arguments
    /// * `position` - Grid coordinate of the block owning the face
    /// * `side` - Which face of the block
    /// * `texture_layer` - Texture array layer to sample
    /// * `corner_lights` - Light for each corner
    pub fn new(position: Point3<i32>, side: BlockSide, texture_layer: u32, corner_lights: [f32; 4]) -> Self {
        Self {
            texture_layer,
            orientation: side.orientation_code(),
            position: position.into(),
            corner_lights,
        }
    }

    /// Returns the instance buffer layout for the face pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: texture_layer (u32)
    /// - `location = 1`: orientation (u32)
    /// - `location = 2`: position (vec3<i32>)
    /// - `location = 3`: corner_lights (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Uint32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[u32; 1]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Uint32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[u32; 2]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Sint32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[u32; 5]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
