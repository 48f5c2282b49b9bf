//! Click to drop points. The fragment stage colors each point straight
//! from its clip-space position, red rising to the right and green rising
//! upward, so the lower-left quadrant comes out blue.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, Topology, VertexBuffer};

pub(crate) const VS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) pos: vec2<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = vec4<f32>(pos, 0.0, 1.0);
    vout.pos = pos;
    return vout;
}
";

pub(crate) const FS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) pos: vec2<f32>,
}

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(v.pos, 1.0, 1.0);
}
";

pub struct ClickPoints {
    layout: VertexLayout,
    points: Vec<f32>,
    buffer: Option<VertexBuffer>,
    dirty: bool,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    Program::create(
        ctx,
        &ProgramDesc::new("click points", &source, &[layout.clone()])
            .with_topology(Topology::PointList),
    )?;

    // Start with the familiar three corners so the window is not empty.
    Ok(Box::new(ClickPoints {
        layout,
        points: geometry::triangle(),
        buffer: None,
        dirty: true,
    }))
}

impl Scene for ClickPoints {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        if self.dirty {
            self.buffer = Some(VertexBuffer::upload(
                ctx,
                "click points",
                &self.layout,
                &self.points,
            )?);
            self.dirty = false;
        }
        if let Some(buffer) = &self.buffer {
            let count = (self.points.len() / 2) as u32;
            frame.draw(ctx, &[buffer], 0..count);
        }
        Ok(())
    }

    fn on_click(&mut self, x: f32, y: f32) {
        self.points.push(x);
        self.points.push(y);
        self.dirty = true;
    }
}
