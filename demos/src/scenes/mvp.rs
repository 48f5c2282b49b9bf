//! Model, view, and projection composed into one matrix, used twice.
//!
//! The same nine vertices draw two columns of triangles. Each draw sees
//! the model translation written just before it.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{Context, Frame, Program, ProgramDesc, Scene, VertexBuffer};
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

pub struct ModelViewProjection {
    program: Program,
    vertices: VertexBuffer,
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
    let program = Program::create(ctx, &ProgramDesc::new("mvp", &source, &[layout.clone()]))?;
    let vertices = VertexBuffer::upload(
        ctx,
        "mvp",
        &layout,
        &geometry::staggered_triangles([-4.0, -2.0, 0.0]),
    )?;
    Ok(Box::new(ModelViewProjection { program, vertices }))
}

impl Scene for ModelViewProjection {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -100.0), Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);

        for x in [-0.75, 0.75] {
            let model = Mat4::from_translation(Vec3::new(x, 0.0, 0.0));
            self.program.write_uniforms(
                ctx,
                &Mvp {
                    mvp: (proj * view * model).to_cols_array_2d(),
                },
            )?;
            frame.draw(ctx, &[&self.vertices], 0..9);
        }
        Ok(())
    }
}
