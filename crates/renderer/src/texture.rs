//! GPU textures: 2D images, cube maps and offscreen render targets.

use std::path::Path;

use anyhow::Context;
use asset::{
    cubemap::{self, FACE_SIZE},
    texture::TextureData,
};
use corelib::Viewport;
use wgpu::{
    AddressMode, Device, Extent3d, FilterMode, Origin3d, Queue, Sampler, SamplerDescriptor,
    TexelCopyBufferLayout, TexelCopyTextureInfo, Texture, TextureAspect, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
    TextureViewDimension,
};

use crate::gpu::create_depth_view;
use crate::material::TextureSlot;

/// Anything a material can bind: a view, its sampler and the kind of slot
/// it fits.
pub trait SampledTexture {
    fn view(&self) -> &TextureView;
    fn sampler(&self) -> &Sampler;
    fn slot(&self) -> TextureSlot;
}

/// Texel format of every loaded image. Values are sampled as stored, with
/// no sRGB decode, to match the non-sRGB surface.
const IMAGE_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

pub struct Texture2d {
    view: TextureView,
    sampler: Sampler,
}

impl Texture2d {
    /// Upload decoded RGBA8 pixels.
    pub fn upload(
        device: &Device,
        queue: &Queue,
        label: &str,
        data: &TextureData,
        wrap: AddressMode,
    ) -> Self {
        let size = Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: IMAGE_FORMAT,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        write_layer(queue, &texture, 0, data);

        Self {
            view: texture.create_view(&TextureViewDescriptor::default()),
            sampler: device.create_sampler(&sampler_descriptor(label, wrap)),
        }
    }

    /// Decode an image file and upload it.
    pub fn load(
        device: &Device,
        queue: &Queue,
        path: &Path,
        wrap: AddressMode,
    ) -> anyhow::Result<Self> {
        let data = TextureData::load(path)?;
        let label = path.display().to_string();
        Ok(Self::upload(device, queue, &label, &data, wrap))
    }
}

impl SampledTexture for Texture2d {
    fn view(&self) -> &TextureView {
        &self.view
    }
    fn sampler(&self) -> &Sampler {
        &self.sampler
    }
    fn slot(&self) -> TextureSlot {
        TextureSlot::D2
    }
}

/// Six-layer texture viewed as a cube, every face [`FACE_SIZE`] square.
pub struct CubeMap {
    view: TextureView,
    sampler: Sampler,
}

impl CubeMap {
    /// Load `<base>_posx.tga` .. `<base>_negz.tga` into one cube texture.
    /// Each face is validated before it is uploaded.
    pub fn load(device: &Device, queue: &Queue, base: &Path) -> anyhow::Result<Self> {
        let texture = device.create_texture(&cube_texture_descriptor());

        cubemap::load_faces(base, |face, data| {
            write_layer(queue, &texture, face.layer(), data);
            Ok(())
        })
        .with_context(|| format!("Failed to load cube map {}", base.display()))?;

        Ok(Self {
            view: texture.create_view(&cube_view_descriptor()),
            sampler: device.create_sampler(&cube_sampler_descriptor()),
        })
    }
}

fn cube_texture_descriptor() -> TextureDescriptor<'static> {
    TextureDescriptor {
        label: Some("cube map"),
        size: Extent3d {
            width: FACE_SIZE,
            height: FACE_SIZE,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: IMAGE_FORMAT,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    }
}

fn cube_view_descriptor() -> TextureViewDescriptor<'static> {
    TextureViewDescriptor {
        label: Some("cube map view"),
        dimension: Some(TextureViewDimension::Cube),
        base_array_layer: 0,
        array_layer_count: Some(6),
        ..Default::default()
    }
}

/// Bilinear, clamped on all three axes so face seams don't bleed.
fn cube_sampler_descriptor() -> SamplerDescriptor<'static> {
    sampler_descriptor("cube map sampler", AddressMode::ClampToEdge)
}

impl SampledTexture for CubeMap {
    fn view(&self) -> &TextureView {
        &self.view
    }
    fn sampler(&self) -> &Sampler {
        &self.sampler
    }
    fn slot(&self) -> TextureSlot {
        TextureSlot::Cube
    }
}

/// Offscreen color + depth target that can later be sampled.
/// The color format matches the surface so one pipeline can draw to both.
#[derive(Clone)]
pub struct RenderTarget {
    color_view: TextureView,
    depth_view: TextureView,
    sampler: Sampler,
    size: Viewport,
}

impl RenderTarget {
    pub fn new(device: &Device, format: TextureFormat, width: u32, height: u32) -> Self {
        let size = Viewport::new(width, height);
        let color = device.create_texture(&TextureDescriptor {
            label: Some("render target"),
            size: Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        Self {
            color_view: color.create_view(&TextureViewDescriptor::default()),
            depth_view: create_depth_view(device, size.width, size.height),
            sampler: device.create_sampler(&sampler_descriptor(
                "render target sampler",
                AddressMode::ClampToEdge,
            )),
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    pub(crate) fn color_view(&self) -> &TextureView {
        &self.color_view
    }

    pub(crate) fn depth_view(&self) -> &TextureView {
        &self.depth_view
    }
}

impl SampledTexture for RenderTarget {
    fn view(&self) -> &TextureView {
        &self.color_view
    }
    fn sampler(&self) -> &Sampler {
        &self.sampler
    }
    fn slot(&self) -> TextureSlot {
        TextureSlot::D2
    }
}

fn write_layer(queue: &Queue, texture: &Texture, layer: u32, data: &TextureData) {
    queue.write_texture(
        TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: TextureAspect::All,
        },
        &data.data,
        TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(data.row_bytes()),
            rows_per_image: Some(data.height),
        },
        Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Bilinear min/mag filtering, one mip level, `wrap` on every axis.
fn sampler_descriptor(label: &str, wrap: AddressMode) -> SamplerDescriptor<'_> {
    SamplerDescriptor {
        label: Some(label),
        address_mode_u: wrap,
        address_mode_v: wrap,
        address_mode_w: wrap,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        mipmap_filter: FilterMode::Nearest,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_sampler_is_bilinear_and_clamped() {
        let desc = cube_sampler_descriptor();
        assert_eq!(desc.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_v, AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_w, AddressMode::ClampToEdge);
        assert_eq!(desc.mag_filter, FilterMode::Linear);
        assert_eq!(desc.min_filter, FilterMode::Linear);
        assert_eq!(desc.mipmap_filter, FilterMode::Nearest);
        assert_eq!(desc.compare, None);
        assert_eq!(desc.border_color, None);
        assert_eq!(desc.anisotropy_clamp, 1);
    }

    #[test]
    fn cube_view_covers_six_layers() {
        let desc = cube_view_descriptor();
        assert_eq!(desc.dimension, Some(TextureViewDimension::Cube));
        assert_eq!(desc.base_array_layer, 0);
        assert_eq!(desc.array_layer_count, Some(6));
        assert_eq!(desc.base_mip_level, 0);
        assert_eq!(desc.mip_level_count, None);
        assert_eq!(desc.format, None);
    }

    #[test]
    fn cube_texture_holds_six_square_faces() {
        let desc = cube_texture_descriptor();
        assert_eq!(
            desc.size,
            Extent3d {
                width: FACE_SIZE,
                height: FACE_SIZE,
                depth_or_array_layers: 6,
            }
        );
        assert_eq!(desc.dimension, TextureDimension::D2);
        assert_eq!(desc.format, IMAGE_FORMAT);
        assert!(!desc.format.is_srgb());
        assert!(desc.usage.contains(TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST));
    }

    #[test]
    fn image_samplers_use_the_requested_wrap() {
        let desc = sampler_descriptor("brick", AddressMode::Repeat);
        assert_eq!(desc.label, Some("brick"));
        assert_eq!(
            [desc.address_mode_u, desc.address_mode_v, desc.address_mode_w],
            [AddressMode::Repeat; 3]
        );
        assert_eq!(desc.mag_filter, FilterMode::Linear);
        assert_eq!(desc.min_filter, FilterMode::Linear);
    }
}
