//! Orthographic near and far planes, moved live to clip triangles away.
//!
//! Watch the back triangles vanish as the planes close in. Nothing here
//! depth-tests, so draw order alone decides what is on top.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, SceneKey, VertexBuffer};
use glam::Mat4;

pub(crate) const VS: &str = r"
struct Mvp {
    mvp: mat4x4<f32>,
}

@group(0) @binding(0) var<uniform> u: Mvp;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = u.mvp * vec4<f32>(pos, 1.0);
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

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Mvp {
    mvp: [[f32; 4]; 4],
}

pub struct Ortho {
    program: Program,
    vertices: VertexBuffer,
    near: f32,
    far: f32,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::interleaved(
        6,
        &[
            (0, AttrFormat::Float32x3, 0),
            (1, AttrFormat::Float32x3, 3),
        ],
    )?;
    let program = Program::create(ctx, &ProgramDesc::new("ortho", &source, &[layout.clone()]))?;
    let vertices = VertexBuffer::upload(
        ctx,
        "ortho",
        &layout,
        &geometry::staggered_triangles([-0.4, -0.2, 0.0]),
    )?;
    Ok(Box::new(Ortho {
        program,
        vertices,
        near: 0.0,
        far: 0.5,
    }))
}

impl Scene for Ortho {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, self.near, self.far);
        self.program.write_uniforms(
            ctx,
            &Mvp {
                mvp: proj.to_cols_array_2d(),
            },
        )?;
        frame.draw(ctx, &[&self.vertices], 0..9);
        Ok(())
    }

    fn on_key(&mut self, key: SceneKey) {
        match key {
            SceneKey::ArrowRight => self.near += 0.05,
            SceneKey::ArrowLeft => self.near -= 0.05,
            SceneKey::ArrowUp => self.far += 0.05,
            SceneKey::ArrowDown => self.far -= 0.05,
            SceneKey::Character(_) => return,
        }
        println!("near = {:.2}, far = {:.2}", self.near, self.far);
    }
}
