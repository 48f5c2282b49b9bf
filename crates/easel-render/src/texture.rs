//! Texture upload and sampling.

use image::RgbaImage;

use crate::context::Context;

/// Filter applied when a texture binding is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Blocky, exact texel values.
    Nearest,
    /// Bilinear blending between texels.
    Linear,
}

pub(crate) fn create_sampler(ctx: &Context, filter: FilterMode) -> wgpu::Sampler {
    let mode = match filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    };
    ctx.device().create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Easel Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: mode,
        min_filter: mode,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// Upload an RGBA image and return a view of it.
pub(crate) fn upload_rgba(ctx: &Context, label: &str, image: &RgbaImage) -> wgpu::TextureView {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    ctx.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// One opaque white texel. Every texture binding samples this until real
/// texels arrive, so programs can draw before their images finish loading.
pub(crate) fn placeholder_view(ctx: &Context) -> wgpu::TextureView {
    let image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
    upload_rgba(ctx, "Easel Placeholder", &image)
}
