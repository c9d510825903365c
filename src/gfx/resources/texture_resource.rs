//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the
//! depth buffer, image-backed material maps, and 1x1 fallback textures.

use std::path::Path;

use image::RgbaImage;
use log::debug;

use crate::error::{GlintError, Result};

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Format of image and solid-color textures. Texels are sampled as
    /// stored, matching the non-sRGB surface they are drawn to.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates a depth texture matching the surface configuration
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

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
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

    /// Decodes an image file and uploads it as a repeating texture.
    pub fn from_image_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self> {
        let image = load_rgba_image(path)?;
        let (width, height) = image.dimensions();
        debug!(
            "Uploading texture '{}' ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Self::create_from_rgba_data(
            device,
            queue,
            image.as_raw(),
            width,
            height,
            &path.display().to_string(),
            wgpu::AddressMode::Repeat,
        ))
    }

    /// A 1x1 texture used when a mesh has no map of some kind.
    pub fn create_solid_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Self {
        Self::create_from_rgba_data(
            device,
            queue,
            &rgba,
            1,
            1,
            label,
            wgpu::AddressMode::Repeat,
        )
    }

    /// Creates a 2D texture from raw RGBA8 data (4 bytes per pixel) with linear filtering.
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
        address_mode: wgpu::AddressMode,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
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

/// Opens an image as RGBA8 with its rows flipped, so that V = 0 is the bottom row.
pub fn load_rgba_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| GlintError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.flipv().to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn decoded_images_are_flipped_vertically() {
        let path = std::env::temp_dir().join("glint_texture_flip_test.png");
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.save(&path).unwrap();

        let loaded = load_rgba_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.dimensions(), (1, 2));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*loaded.get_pixel(0, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn missing_image_reports_its_path() {
        let err = load_rgba_image(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, GlintError::ImageDecode { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
