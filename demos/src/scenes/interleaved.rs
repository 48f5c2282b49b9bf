//! Position and color interleaved in one buffer, five floats per vertex.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, VertexBuffer};

pub(crate) const VS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec2<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = vec4<f32>(pos, 0.0, 1.0);
    vout.color = color;
    return vout;
}
";

pub(crate) const FS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(v.color, 1.0);
}
";

pub struct Interleaved {
    vertices: VertexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::interleaved(
        5,
        &[
            (0, AttrFormat::Float32x2, 0),
            (1, AttrFormat::Float32x3, 2),
        ],
    )?;
    Program::create(
        ctx,
        &ProgramDesc::new("interleaved", &source, &[layout.clone()]),
    )?;
    let vertices = VertexBuffer::upload(ctx, "interleaved", &layout, &geometry::colored_triangle())?;
    Ok(Box::new(Interleaved { vertices }))
}

impl Scene for Interleaved {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        frame.draw(ctx, &[&self.vertices], 0..3);
        Ok(())
    }
}
