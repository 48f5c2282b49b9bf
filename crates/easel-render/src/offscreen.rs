//! Offscreen render targets with pixel readback.

use anyhow::Context as _;
use image::RgbaImage;

use crate::context::Context;
use crate::frame::{ClearOptions, DEPTH_FORMAT, Frame};

/// A color target (plus optional depth) that lives entirely offscreen.
/// Draw into it with [`OffscreenTarget::begin_frame`], then pull the pixels
/// back with [`OffscreenTarget::read_rgba`].
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth_view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// A target of `width` by `height` pixels. Pass `with_depth` when
    /// depth-testing programs will draw here.
    #[must_use]
    pub fn new(ctx: &Context, width: u32, height: u32, with_depth: bool) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_view = with_depth.then(|| {
            ctx.device()
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("Offscreen Depth"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: DEPTH_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        Self {
            texture,
            view,
            depth_view,
            width,
            height,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear the target and start drawing a frame into it.
    #[must_use]
    pub fn begin_frame(&self, ctx: &Context, clear: ClearOptions) -> Frame<'_> {
        Frame::begin(
            ctx,
            &self.view,
            self.depth_view.as_ref(),
            (self.width, self.height),
            clear,
        )
    }

    /// Copy the rendered pixels back to the CPU.
    pub fn read_rgba(&self, ctx: &Context) -> anyhow::Result<RgbaImage> {
        let bytes_per_pixel = 4u32;
        let unpadded_bytes_per_row = self.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer_size = u64::from(padded_bytes_per_row) * u64::from(self.height);
        let readback = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue().submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = ctx.device().poll(wgpu::PollType::Wait);
        rx.recv()
            .context("readback completion never signaled")?
            .context("failed to map the readback buffer")?;

        let data = slice.get_mapped_range();
        let mut image = RgbaImage::new(self.width, self.height);
        for y in 0..self.height {
            let row = (y * padded_bytes_per_row) as usize;
            for x in 0..self.width {
                let p = row + (x * bytes_per_pixel) as usize;
                image.put_pixel(
                    x,
                    y,
                    image::Rgba([data[p], data[p + 1], data[p + 2], data[p + 3]]),
                );
            }
        }
        drop(data);
        readback.unmap();

        Ok(image)
    }
}
