//! Per-frame clearing and draw encoding.
//!
//! Every draw submits its own small command buffer. `Queue::write_buffer`
//! takes effect before the next submit, so the classic loop of write
//! uniforms, draw, write uniforms, draw renders each draw with the values
//! set just before it.

use std::ops::Range;

use crate::buffers::{IndexBuffer, VertexBuffer};
use crate::context::Context;

/// Depth format used wherever a target carries a depth buffer.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// What a frame starts from.
#[derive(Debug, Clone, Copy)]
pub struct ClearOptions {
    pub color: [f64; 4],
    /// Initial depth, where 1.0 is the far plane. Ignored on targets
    /// without a depth buffer.
    pub depth: f32,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            depth: 1.0,
        }
    }
}

impl ClearOptions {
    #[must_use]
    pub fn color(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            color: [r, g, b, a],
            ..Self::default()
        }
    }
}

/// One frame's drawing surface: a cleared color view plus optional depth.
///
/// Draws go through the context's active program. A draw with no program
/// installed, with the wrong number of vertex buffers, or past the end of
/// the data logs a warning and leaves the target untouched.
pub struct Frame<'a> {
    color: &'a wgpu::TextureView,
    depth: Option<&'a wgpu::TextureView>,
    size: (u32, u32),
}

impl<'a> Frame<'a> {
    /// Clear the target and hand back a frame to draw into.
    pub fn begin(
        ctx: &Context,
        color: &'a wgpu::TextureView,
        depth: Option<&'a wgpu::TextureView>,
        size: (u32, u32),
        clear: ClearOptions,
    ) -> Self {
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.color[0],
                            g: clear.color[1],
                            b: clear.color[2],
                            a: clear.color[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth.map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear.depth),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        ctx.queue().submit(std::iter::once(encoder.finish()));

        Self {
            color,
            depth,
            size: (size.0.max(1), size.1.max(1)),
        }
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Width over height, for projection math.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }

    /// Draw the vertex range with the context's active program.
    pub fn draw(&mut self, ctx: &Context, buffers: &[&VertexBuffer], vertices: Range<u32>) {
        self.encode(ctx, buffers, None, vertices);
    }

    /// Draw the index range with the context's active program.
    pub fn draw_indexed(
        &mut self,
        ctx: &Context,
        buffers: &[&VertexBuffer],
        indices: &IndexBuffer,
        range: Range<u32>,
    ) {
        self.encode(ctx, buffers, Some(indices), range);
    }

    fn encode(
        &mut self,
        ctx: &Context,
        buffers: &[&VertexBuffer],
        indices: Option<&IndexBuffer>,
        range: Range<u32>,
    ) {
        let Some(program) = ctx.active_program() else {
            tracing::warn!("draw with no active program, skipping");
            return;
        };
        if buffers.len() != program.expected_buffers() {
            tracing::warn!(
                program = %program.label(),
                expected = program.expected_buffers(),
                got = buffers.len(),
                "draw with the wrong number of vertex buffers, skipping"
            );
            return;
        }
        let limit = match indices {
            Some(index_buffer) => index_buffer.count(),
            None => buffers.iter().map(|b| b.vertex_count()).min().unwrap_or(0),
        };
        if range.end > limit {
            tracing::warn!(
                program = %program.label(),
                end = range.end,
                available = limit,
                "draw range runs past the end of the data, skipping"
            );
            return;
        }
        let depth = match (program.uses_depth(), self.depth) {
            (true, Some(view)) => Some(view),
            (true, None) => {
                tracing::warn!(
                    program = %program.label(),
                    "program depth-tests but the target has no depth buffer, skipping"
                );
                return;
            }
            (false, _) => None,
        };

        let bind = program.bind_state();
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Draw Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Draw Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth.map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(program.pipeline());
            for (group, bind_group) in bind.groups.iter().enumerate() {
                pass.set_bind_group(group as u32, bind_group, &[]);
            }
            for (slot, buffer) in buffers.iter().enumerate() {
                pass.set_vertex_buffer(slot as u32, buffer.raw().slice(..));
            }
            match indices {
                Some(index_buffer) => {
                    pass.set_index_buffer(index_buffer.raw().slice(..), index_buffer.format());
                    pass.draw_indexed(range, 0, 0..1);
                }
                None => pass.draw(range, 0..1),
            }
        }
        ctx.queue().submit(std::iter::once(encoder.finish()));
    }
}
