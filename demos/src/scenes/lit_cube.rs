//! A point light over a turning cube, with positions, colors, and normals
//! fed from three separate buffers.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{
    Context, DepthOptions, Frame, IndexBuffer, Program, ProgramDesc, Scene, VertexBuffer,
};
use glam::{Mat4, Vec3};

pub(crate) const VS: &str = r"
struct Uniforms {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_mat: mat4x4<f32>,
    light_pos: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
}

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) world_pos: vec3<f32>,
}

@vertex
fn vs_main(
    @location(0) pos: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) normal: vec3<f32>,
) -> VsOut {
    var vout: VsOut;
    vout.position = u.mvp * vec4<f32>(pos, 1.0);
    vout.color = color;
    vout.normal = (u.normal_mat * vec4<f32>(normal, 0.0)).xyz;
    vout.world_pos = (u.model * vec4<f32>(pos, 1.0)).xyz;
    return vout;
}
";

pub(crate) const FS: &str = r"
struct Uniforms {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_mat: mat4x4<f32>,
    light_pos: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
}

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) world_pos: vec3<f32>,
}

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    let to_light = normalize(u.light_pos.xyz - v.world_pos);
    let diffuse = max(dot(to_light, normalize(v.normal)), 0.0);
    let lit = v.color * u.light_color.rgb * diffuse + v.color * u.ambient.rgb;
    return vec4<f32>(lit, 1.0);
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_mat: [[f32; 4]; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

pub struct LitCube {
    program: Program,
    positions: VertexBuffer,
    colors: VertexBuffer,
    normals: VertexBuffer,
    indices: IndexBuffer,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layouts = [
        VertexLayout::single(0, AttrFormat::Float32x3),
        VertexLayout::single(1, AttrFormat::Float32x3),
        VertexLayout::single(2, AttrFormat::Float32x3),
    ];
    let program = Program::create(
        ctx,
        &ProgramDesc::new("lit cube", &source, &layouts).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )?;

    let cube = geometry::cube_faces();
    let positions = VertexBuffer::upload(ctx, "lit cube positions", &layouts[0], &cube.positions)?;
    let colors = VertexBuffer::upload(ctx, "lit cube colors", &layouts[1], &cube.colors)?;
    let normals = VertexBuffer::upload(ctx, "lit cube normals", &layouts[2], &cube.normals)?;
    let indices = IndexBuffer::upload_u16(ctx, "lit cube", &cube.indices);

    Ok(Box::new(LitCube {
        program,
        positions,
        colors,
        normals,
        indices,
    }))
}

impl Scene for LitCube {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, time: f32) -> Result<()> {
        let model = Mat4::from_rotation_y((time * 18.0).to_radians());
        let view = Mat4::look_at_rh(Vec3::new(3.0, 3.0, 7.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);

        self.program.write_uniforms(
            ctx,
            &Uniforms {
                mvp: (proj * view * model).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                normal_mat: model.inverse().transpose().to_cols_array_2d(),
                light_pos: [0.92, 1.6, 1.4, 1.0],
                light_color: [1.0, 1.0, 1.0, 1.0],
                ambient: [0.1, 0.1, 0.1, 1.0],
            },
        )?;
        let count = self.indices.count();
        frame.draw_indexed(
            ctx,
            &[&self.positions, &self.colors, &self.normals],
            &self.indices,
            0..count,
        );
        Ok(())
    }
}
