//! An indexed cube with the depth test doing its job.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{
    Context, DepthOptions, Frame, IndexBuffer, Program, ProgramDesc, Scene, VertexBuffer,
};
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

pub struct Cube {
    program: Program,
    vertices: VertexBuffer,
    indices: IndexBuffer,
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
    let program = Program::create(
        ctx,
        &ProgramDesc::new("cube", &source, &[layout.clone()]).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )?;
    let (positions, index_data) = geometry::cube();
    let vertices = VertexBuffer::upload(ctx, "cube", &layout, &positions)?;
    let indices = IndexBuffer::upload_u16(ctx, "cube", &index_data);
    Ok(Box::new(Cube {
        program,
        vertices,
        indices,
    }))
}

impl Scene for Cube {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let view = Mat4::look_at_rh(Vec3::new(3.0, 3.0, 7.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);
        self.program.write_uniforms(
            ctx,
            &Mvp {
                mvp: (proj * view).to_cols_array_2d(),
            },
        )?;
        frame.draw_indexed(ctx, &[&self.vertices], &self.indices, 0..36);
        Ok(())
    }
}
