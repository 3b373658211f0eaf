use image::imageops::{self, FilterType};
use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::error::{Result, ViewportError};
use crate::types::DecodedImage;

use super::context::GpuContext;

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// An uploaded image bound to the texture layout, ready for the image pass.
pub struct WgpuTexture {
    _texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl WgpuTexture {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Sampler shared by every image texture: repeat wrap, trilinear filtering.
pub(crate) fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("image sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

pub(crate) fn upload(
    context: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &DecodedImage,
) -> Result<WgpuTexture> {
    let (width, height) = image.dimensions();
    let limit = context.max_texture_dimension;
    if width > limit || height > limit {
        return Err(ViewportError::GpuResource(format!(
            "image is {width}x{height}, device limit is {limit}x{limit}"
        )));
    }

    let (mip_levels, data) = mip_chain(image)?;
    let (texture, error) = context.scoped(|device| {
        let texture = device.create_texture_with_data(
            &context.queue,
            &wgpu::TextureDescriptor {
                label: Some("image texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: mip_levels,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TEXTURE_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &data,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("image bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        WgpuTexture {
            _texture: texture,
            bind_group,
            width,
            height,
        }
    });

    if let Some(error) = error {
        return Err(ViewportError::GpuResource(format!(
            "failed to allocate {width}x{height} texture: {error}"
        )));
    }
    tracing::debug!(width, height, mip_levels, "uploaded image texture");
    Ok(texture)
}

/// Number of levels in a full mip chain down to 1x1.
pub(crate) fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level on the CPU, base level first, concatenated in the
/// order `create_texture_with_data` expects.
pub(crate) fn mip_chain(image: &DecodedImage) -> Result<(u32, Vec<u8>)> {
    let (width, height) = image.dimensions();
    let levels = mip_level_count(width, height);

    let mut current = RgbaImage::from_raw(width, height, image.pixels().to_vec())
        .ok_or_else(|| ViewportError::GpuResource("pixel buffer does not match size".into()))?;
    let mut data = Vec::with_capacity(image.pixels().len() * 4 / 3 + 4);
    data.extend_from_slice(current.as_raw());

    for _ in 1..levels {
        let next_width = (current.width() / 2).max(1);
        let next_height = (current.height() / 2).max(1);
        current = imageops::resize(&current, next_width, next_height, FilterType::Triangle);
        data.extend_from_slice(current.as_raw());
    }

    Ok((levels, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_count_follows_the_longer_side() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(3, 600), 10);
    }

    #[test]
    fn chain_holds_every_level() {
        let image = DecodedImage::new(8, 2, vec![200; 8 * 2 * 4]).expect("valid image");
        let (levels, data) = mip_chain(&image).expect("mip chain");
        assert_eq!(levels, 4);
        // 8x2 + 4x1 + 2x1 + 1x1 texels.
        assert_eq!(data.len(), (16 + 4 + 2 + 1) * 4);
        assert!(data.iter().all(|&byte| (199..=201).contains(&byte)));
    }
}
