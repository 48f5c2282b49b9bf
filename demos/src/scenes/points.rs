//! A point list. WebGPU points are always a single pixel, so look closely.

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
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
";

pub struct Points {
    vertices: VertexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    // The context keeps the created program active for the draws below.
    Program::create(
        ctx,
        &ProgramDesc::new("points", &source, &[layout.clone()])
            .with_topology(Topology::PointList),
    )?;

    // The triangle's corners, as points.
    let vertices = VertexBuffer::upload(ctx, "points", &layout, &geometry::triangle())?;

    Ok(Box::new(Points { vertices }))
}

impl Scene for Points {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        frame.draw(ctx, &[&self.vertices], 0..3);
        Ok(())
    }
}
