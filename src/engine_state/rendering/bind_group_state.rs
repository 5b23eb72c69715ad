//! Bind groups shared by the face pipeline.
//!
//! Group 0 carries the camera uniform, group 1 the block texture array and
//! its sampler.

use wgpu::{BindGroup, BindGroupLayout, BindingResource, Device};

use super::texture::Texture;

/// Name of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Name of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Name of the texture bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Name of the texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";

/// Holds every bind group and layout the renderer binds.
pub struct BindGroupState {
    pub camera_bind_group: BindGroup,
    pub camera_bind_group_layout: BindGroupLayout,
    pub texture_bind_group: BindGroup,
    pub texture_bind_group_layout: BindGroupLayout,
}

impl BindGroupState {
    /// Creates the camera and texture bind groups.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `camera_binding` - The whole camera uniform buffer
    /// * `block_textures` - The uploaded block texture array
    pub fn new(device: &Device, camera_binding: BindingResource, block_textures: &Texture) -> Self {
        let (camera_bind_group, camera_bind_group_layout) =
            Self::generate_camera_bindgroups(device, camera_binding);
        let (texture_bind_group, texture_bind_group_layout) =
            Self::generate_texture_bindgroups(device, block_textures);

        Self {
            camera_bind_group,
            camera_bind_group_layout,
            texture_bind_group,
            texture_bind_group_layout,
        }
    }

    /// Layouts in bind group index order, for the pipeline layout.
    pub fn layouts(&self) -> [&BindGroupLayout; 2] {
        [&self.camera_bind_group_layout, &self.texture_bind_group_layout]
    }

    fn generate_camera_bindgroups(
        device: &Device,
        camera_binding: BindingResource,
    ) -> (BindGroup, BindGroupLayout) {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(CAMERA_BIND_GROUP_LAYOUT),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_binding,
            }],
            label: Some(CAMERA_BIND_GROUP),
        });

        (camera_bind_group, camera_bind_group_layout)
    }

    fn generate_texture_bindgroups(device: &Device, block_textures: &Texture) -> (BindGroup, BindGroupLayout) {
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // Must agree with the texture entry's filterable flag
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(TEXTURE_BIND_GROUP_LAYOUT),
            });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&block_textures.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&block_textures.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        });

        (texture_bind_group, texture_bind_group_layout)
    }
}
