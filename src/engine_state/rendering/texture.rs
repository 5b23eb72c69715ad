//! Texture handling for the rendering pipeline.
//!
//! Provides the depth buffer and the three-layer block texture array
//! (top, side, bottom) sampled by the face shader.

use std::path::Path;

use image::{imageops::FilterType, ImageError, RgbaImage};
use log::{info, warn};
use wgpu::util::DeviceExt;

use crate::engine_state::{
    error::EngineError,
    voxels::block::{TEXTURE_LAYER_COUNT, TEXTURE_LAYER_SIDE, TEXTURE_LAYER_TOP},
};

/// Edge length of the procedural layers used when a texture file is missing.
pub const PROCEDURAL_TEXTURE_SIZE: u32 = 16;

/// Represents a GPU texture with associated view and sampler.
pub struct Texture {
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads the block layers as a `D2Array` texture.
    ///
    /// The sampler repeats and uses nearest filtering so the pixel art stays
    /// crisp at every distance.
    pub fn create_block_texture_array(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layers: &TextureLayers,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Block Texture Array"),
                size: wgpu::Extent3d {
                    width: layers.width,
                    height: layers.height,
                    depth_or_array_layers: layers.layer_count() as u32,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &layers.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// CPU side pixels for every block texture layer, all of one size.
#[derive(Debug, Clone)]
pub struct TextureLayers {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, one layer after another.
    pub rgba: Vec<u8>,
}

impl TextureLayers {
    /// Reads the layer images in texture layer order.
    ///
    /// A file that cannot be read is replaced with a procedural layer and a
    /// warning. A file that exists but does not decode is an error. Every
    /// layer is resized to the first layer's dimensions.
    pub fn load(paths: [&Path; TEXTURE_LAYER_COUNT as usize]) -> Result<Self, EngineError> {
        let mut images = Vec::with_capacity(paths.len());
        for (layer, path) in paths.iter().enumerate() {
            images.push(load_layer(path, layer)?);
        }

        let (width, height) = images[0].dimensions();
        let mut rgba = Vec::with_capacity((width * height * 4) as usize * images.len());
        for image in images {
            let image = if image.dimensions() == (width, height) {
                image
            } else {
                image::imageops::resize(&image, width, height, FilterType::Nearest)
            };
            rgba.extend_from_slice(image.as_raw());
        }

        info!("Loaded {} block texture layers at {}x{}", paths.len(), width, height);
        Ok(Self { width, height, rgba })
    }

    /// Number of layers held.
    pub fn layer_count(&self) -> usize {
        self.rgba.len() / (self.width as usize * self.height as usize * 4).max(1)
    }
}

fn load_layer(path: &Path, layer: usize) -> Result<RgbaImage, EngineError> {
    match image::open(path) {
        Ok(image) => Ok(image.to_rgba8()),
        Err(ImageError::IoError(err)) => {
            warn!(
                "Texture {} unavailable ({}), using a procedural layer",
                path.display(),
                err
            );
            Ok(procedural_layer(layer))
        }
        Err(source) => Err(EngineError::TextureLoad {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// A speckled grass or dirt square, picked by layer.
fn procedural_layer(layer: usize) -> RgbaImage {
    const GRASS: [u8; 3] = [86, 160, 52];
    const DIRT: [u8; 3] = [121, 85, 58];

    let layer_code = layer as u32;
    let base = if layer_code == TEXTURE_LAYER_TOP { GRASS } else { DIRT };
    let mut rng = fastrand::Rng::with_seed(layer as u64);

    RgbaImage::from_fn(PROCEDURAL_TEXTURE_SIZE, PROCEDURAL_TEXTURE_SIZE, |_, y| {
        // Side layer gets a grass fringe along its top rows
        let base = if layer_code == TEXTURE_LAYER_SIDE && y < PROCEDURAL_TEXTURE_SIZE / 4 {
            GRASS
        } else {
            base
        };
        let shade = rng.u8(0..24);
        image::Rgba([
            base[0].saturating_sub(shade),
            base[1].saturating_sub(shade),
            base[2].saturating_sub(shade),
            255,
        ])
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blocko-texture-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_fall_back_to_procedural_layers() {
        let dir = scratch_dir("missing");
        let paths = [dir.join("a.png"), dir.join("b.png"), dir.join("c.png")];
        let layers = TextureLayers::load([&paths[0], &paths[1], &paths[2]]).unwrap();

        assert_eq!(layers.width, PROCEDURAL_TEXTURE_SIZE);
        assert_eq!(layers.height, PROCEDURAL_TEXTURE_SIZE);
        assert_eq!(layers.layer_count(), 3);
    }

    #[test]
    fn layers_are_resized_to_the_first_layer() {
        let dir = scratch_dir("resize");
        let top = dir.join("top.png");
        RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]))
            .save(&top)
            .unwrap();

        let missing = dir.join("missing.png");
        let layers = TextureLayers::load([&top, &missing, &missing]).unwrap();

        assert_eq!((layers.width, layers.height), (4, 4));
        assert_eq!(layers.rgba.len(), 4 * 4 * 4 * 3);
        assert_eq!(&layers.rgba[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        let bad = dir.join("bad.png");
        std::fs::write(&bad, b"definitely not a png").unwrap();

        let result = TextureLayers::load([&bad, &bad, &bad]);
        assert!(matches!(result, Err(EngineError::TextureLoad { .. })));
    }
}
