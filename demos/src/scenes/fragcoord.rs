//! Color from the fragment's own window position, no varyings at all.
//!
//! The vertex buffer holds four floats per vertex but the layout maps only
//! the first two, so the texture coordinates ride along unused.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, Topology, VertexBuffer};

pub(crate) const VS: &str = r"
@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos, 0.0, 1.0);
}
";

pub(crate) const FS: &str = r"
struct Res {
    size: vec2<f32>,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var<uniform> res: Res;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let uv = pos.xy / res.size;
    return vec4<f32>(uv.x, 1.0 - uv.y, 0.5, 1.0);
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Res {
    size: [f32; 2],
    _pad: [f32; 2],
}

pub struct FragCoord {
    program: Program,
    vertices: VertexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::interleaved(4, &[(0, AttrFormat::Float32x2, 0)])?;
    let program = Program::create(
        ctx,
        &ProgramDesc::new("fragcoord", &source, &[layout.clone()])
            .with_topology(Topology::TriangleStrip),
    )?;
    let vertices = VertexBuffer::upload(ctx, "fragcoord", &layout, &geometry::quad_uv())?;
    Ok(Box::new(FragCoord { program, vertices }))
}

impl Scene for FragCoord {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let (width, height) = frame.size();
        self.program.write_uniforms(
            ctx,
            &Res {
                size: [width as f32, height as f32],
                _pad: [0.0, 0.0],
            },
        )?;
        frame.draw(ctx, &[&self.vertices], 0..4);
        Ok(())
    }
}
