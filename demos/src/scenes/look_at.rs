//! A camera built from an eye point, orbiting three staggered triangles.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, SceneKey, VertexBuffer};
use glam::{Mat4, Vec3};

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

pub struct LookAt {
    program: Program,
    vertices: VertexBuffer,
    eye_x: f32,
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
    let program = Program::create(ctx, &ProgramDesc::new("look at", &source, &[layout.clone()]))?;
    let vertices = VertexBuffer::upload(
        ctx,
        "look at",
        &layout,
        &geometry::staggered_triangles([-0.4, -0.2, 0.0]),
    )?;
    Ok(Box::new(LookAt {
        program,
        vertices,
        eye_x: 0.25,
    }))
}

impl Scene for LookAt {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let view = Mat4::look_at_rh(Vec3::new(self.eye_x, 0.25, 0.25), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 2.0);
        let model = Mat4::from_rotation_z((-10f32).to_radians());
        self.program.write_uniforms(
            ctx,
            &Mvp {
                mvp: (proj * view * model).to_cols_array_2d(),
            },
        )?;
        frame.draw(ctx, &[&self.vertices], 0..9);
        Ok(())
    }

    fn on_key(&mut self, key: SceneKey) {
        match key {
            SceneKey::ArrowLeft => self.eye_x -= 0.01,
            SceneKey::ArrowRight => self.eye_x += 0.01,
            _ => return,
        }
        println!("eye x = {:.2}", self.eye_x);
    }
}
