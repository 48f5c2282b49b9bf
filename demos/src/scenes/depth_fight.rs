//! Two coplanar triangles shimmer until polygon offset separates them.
//!
//! Both triangles sit at z = -5, so their depth values round the same way
//! and the test flickers between them. The second program adds a depth
//! bias, which is the fix, and the two draws switch programs mid frame.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout};
use easel_render::{Context, DepthOptions, Frame, Program, ProgramDesc, Scene, VertexBuffer};
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

#[rustfmt::skip]
const VERTICES: [f32; 36] = [
    // Smaller triangle, mostly green.
     0.0,  2.5, -5.0,   0.4, 1.0, 0.4,
    -2.5, -2.5, -5.0,   0.4, 1.0, 0.4,
     2.5, -2.5, -5.0,   1.0, 0.4, 0.4,
    // Larger triangle behind it, mostly yellow, same plane.
     0.0,  3.0, -5.0,   1.0, 0.4, 0.4,
    -3.0, -3.0, -5.0,   1.0, 1.0, 0.4,
     3.0, -3.0, -5.0,   1.0, 1.0, 0.4,
];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Mvp {
    mvp: [[f32; 4]; 4],
}

pub struct DepthFight {
    flat: Program,
    offset: Program,
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
    let flat = Program::create(
        ctx,
        &ProgramDesc::new("depth fight", &source, &[layout.clone()]).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )?;
    let offset = Program::create(
        ctx,
        &ProgramDesc::new("depth fight offset", &source, &[layout.clone()]).with_depth(
            DepthOptions {
                test: true,
                polygon_offset: true,
            },
        ),
    )?;
    let vertices = VertexBuffer::upload(ctx, "depth fight", &layout, &VERTICES)?;
    Ok(Box::new(DepthFight {
        flat,
        offset,
        vertices,
    }))
}

impl Scene for DepthFight {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        let view = Mat4::look_at_rh(Vec3::new(3.06, 2.5, 10.0), Vec3::new(0.0, 0.0, -2.0), Vec3::Y);
        let proj = Mat4::perspective_rh(30f32.to_radians(), frame.aspect(), 1.0, 100.0);
        let mvp = Mvp {
            mvp: (proj * view).to_cols_array_2d(),
        };

        ctx.activate(&self.flat);
        self.flat.write_uniforms(ctx, &mvp)?;
        frame.draw(ctx, &[&self.vertices], 0..3);

        // The offset program pushes its fragments slightly deeper, so the
        // larger triangle cleanly loses where the two overlap.
        ctx.activate(&self.offset);
        self.offset.write_uniforms(ctx, &mvp)?;
        frame.draw(ctx, &[&self.vertices], 3..6);
        Ok(())
    }
}
