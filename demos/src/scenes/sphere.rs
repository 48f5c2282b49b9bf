//! A directional light on a sphere, lit per vertex.
//!
//! A unit sphere's positions are its own normals, so the one buffer is
//! bound at both attribute slots.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{
    Context, DepthOptions, Frame, IndexBuffer, Program, ProgramDesc, Scene, VertexBuffer,
};
use glam::{Mat4, Vec3};

pub(crate) const VS: &str = r"
struct Uniforms {
    mvp: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
}

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = u.mvp * vec4<f32>(pos, 1.0);
    let diffuse = max(dot(normalize(u.light_dir.xyz), normalize(normal)), 0.0);
    let base = vec3<f32>(1.0, 0.85, 0.7);
    vout.color = base * u.light_color.rgb * diffuse + vec3<f32>(0.08);
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
struct Uniforms {
    mvp: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

pub struct Sphere {
    program: Program,
    vertices: VertexBuffer,
    indices: IndexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layouts = [
        VertexLayout::single(0, AttrFormat::Float32x3),
        VertexLayout::single(1, AttrFormat::Float32x3),
    ];
    let program = Program::create(
        ctx,
        &ProgramDesc::new("sphere", &source, &layouts).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )?;

    let (positions, index_data) = geometry::uv_sphere(13);
    let vertices = VertexBuffer::upload(ctx, "sphere", &layouts[0], &positions)?;
    let indices = IndexBuffer::upload_u32(ctx, "sphere", &index_data);

    Ok(Box::new(Sphere {
        program,
        vertices,
        indices,
    }))
}

impl Scene for Sphere {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, time: f32) -> Result<()> {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 1.5, 4.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);
        let model = Mat4::from_rotation_y(time * 0.4);

        self.program.write_uniforms(
            ctx,
            &Uniforms {
                mvp: (proj * view * model).to_cols_array_2d(),
                light_dir: [2.3, 4.0, 3.5, 0.0],
                light_color: [0.7, 0.7, 0.7, 1.0],
            },
        )?;
        let count = self.indices.count();
        frame.draw_indexed(
            ctx,
            &[&self.vertices, &self.vertices],
            &self.indices,
            0..count,
        );
        Ok(())
    }
}
