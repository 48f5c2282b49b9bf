//! Distance fog over a cube, fading into the clear color.
//!
//! Each vertex measures its distance to the eye, and the fragment stage
//! blends toward the fog color between the two fog distances. Backing away
//! sinks the whole cube into the haze.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{
    ClearOptions, Context, DepthOptions, Frame, IndexBuffer, Program, ProgramDesc, Scene,
    SceneKey, VertexBuffer,
};
use glam::{Mat4, Vec3};

const FOG_COLOR: [f32; 3] = [0.137, 0.231, 0.423];

pub(crate) const VS: &str = r"
struct SceneUniforms {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
    eye: vec4<f32>,
}

@group(0) @binding(0) var<uniform> scene: SceneUniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) dist: f32,
}

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = scene.mvp * vec4<f32>(pos, 1.0);
    vout.color = color;
    vout.dist = distance((scene.model * vec4<f32>(pos, 1.0)).xyz, scene.eye.xyz);
    return vout;
}
";

pub(crate) const FS: &str = r"
struct FogUniforms {
    color: vec4<f32>,
    dist: vec2<f32>,
    _pad: vec2<f32>,
}

@group(0) @binding(1) var<uniform> fog: FogUniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) dist: f32,
}

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    let clear = clamp((fog.dist.y - v.dist) / (fog.dist.y - fog.dist.x), 0.0, 1.0);
    return vec4<f32>(mix(fog.color.rgb, v.color, clear), 1.0);
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    eye: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FogUniforms {
    color: [f32; 4],
    dist: [f32; 2],
    _pad: [f32; 2],
}

pub struct Fog {
    program: Program,
    vertices: VertexBuffer,
    indices: IndexBuffer,
    eye_z: f32,
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
        &ProgramDesc::new("fog", &source, &[layout.clone()]).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )?;
    let (positions, index_data) = geometry::cube();
    let vertices = VertexBuffer::upload(ctx, "fog", &layout, &positions)?;
    let indices = IndexBuffer::upload_u16(ctx, "fog", &index_data);
    Ok(Box::new(Fog {
        program,
        vertices,
        indices,
        eye_z: 7.0,
    }))
}

impl Scene for Fog {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let eye = Vec3::new(3.0, 3.0, self.eye_z);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);
        let model = Mat4::IDENTITY;

        self.program.write_block(
            ctx,
            "scene",
            &SceneUniforms {
                mvp: (proj * view * model).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                eye: [eye.x, eye.y, eye.z, 1.0],
            },
        )?;
        self.program.write_block(
            ctx,
            "fog",
            &FogUniforms {
                color: [FOG_COLOR[0], FOG_COLOR[1], FOG_COLOR[2], 1.0],
                // Fog starts at 10 units from the eye and swallows everything
                // by 15, so the cube sits clear until the eye backs away.
                dist: [10.0, 15.0],
                _pad: [0.0, 0.0],
            },
        )?;
        let count = self.indices.count();
        frame.draw_indexed(ctx, &[&self.vertices], &self.indices, 0..count);
        Ok(())
    }

    fn clear(&self) -> ClearOptions {
        ClearOptions::color(
            f64::from(FOG_COLOR[0]),
            f64::from(FOG_COLOR[1]),
            f64::from(FOG_COLOR[2]),
            1.0,
        )
    }

    fn on_key(&mut self, key: SceneKey) {
        match key {
            SceneKey::ArrowUp => self.eye_z += 0.2,
            SceneKey::ArrowDown => self.eye_z -= 0.2,
            _ => return,
        }
        println!("eye z = {:.1}", self.eye_z);
    }
}
