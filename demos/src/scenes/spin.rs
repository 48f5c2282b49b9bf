//! A triangle moved and spun by a uniform block updated every frame.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, VertexBuffer};

pub(crate) const VS: &str = r"
struct Motion {
    translate: vec2<f32>,
    angle: f32,
    _pad: f32,
}

@group(0) @binding(0) var<uniform> motion: Motion;

@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
    let c = cos(motion.angle);
    let s = sin(motion.angle);
    let rotated = vec2<f32>(pos.x * c - pos.y * s, pos.x * s + pos.y * c);
    return vec4<f32>(rotated + motion.translate, 0.0, 1.0);
}
";

pub(crate) const FS: &str = r"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Motion {
    translate: [f32; 2],
    angle: f32,
    _pad: f32,
}

pub struct Spin {
    program: Program,
    vertices: VertexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let program = Program::create(ctx, &ProgramDesc::new("spin", &source, &[layout.clone()]))?;
    let vertices = VertexBuffer::upload(ctx, "spin", &layout, &geometry::triangle())?;
    Ok(Box::new(Spin { program, vertices }))
}

impl Scene for Spin {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, time: f32) -> Result<()> {
        self.program.write_uniforms(
            ctx,
            &Motion {
                translate: [0.35, 0.0],
                angle: (45.0 * time).to_radians(),
                _pad: 0.0,
            },
        )?;
        frame.draw(ctx, &[&self.vertices], 0..3);
        Ok(())
    }
}
