//! Two textures multiplied in the fragment stage, clouds through a disc mask.
//!
//! Both images arrive through the loader, so the quad starts out white and
//! fills in as each texture becomes ready.

use anyhow::Result;
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry, pattern};
use easel_render::{
    Context, FilterMode, Frame, PendingTexture, Program, ProgramDesc, Scene, SceneKey, Topology,
    VertexBuffer,
};

pub(crate) const VS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec2<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    var vout: VsOut;
    vout.position = vec4<f32>(pos * 1.6, 0.0, 1.0);
    vout.uv = uv;
    return vout;
}
";

pub(crate) const FS: &str = r"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@group(0) @binding(0) var uClouds: texture_2d<f32>;
@group(0) @binding(1) var uMask: texture_2d<f32>;
@group(0) @binding(2) var uSampler: sampler;

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    let sky = textureSample(uClouds, uSampler, v.uv);
    let mask = textureSample(uMask, uSampler, v.uv);
    return vec4<f32>(sky.rgb * mask.rgb, 1.0);
}
";

pub struct Textured {
    program: Program,
    vertices: VertexBuffer,
    base: PendingTexture,
    mask: PendingTexture,
    filter: FilterMode,
    pending_filter: Option<FilterMode>,
    checker: bool,
    pending_base: Option<PendingTexture>,
}

pub fn build(ctx: &mut Context) -> Result<Box<dyn Scene>> {
    let source = ProgramSource::compile(VS, FS)?;
    let layout = VertexLayout::interleaved(
        4,
        &[
            (0, AttrFormat::Float32x2, 0),
            (1, AttrFormat::Float32x2, 2),
        ],
    )?;
    let program = Program::create(
        ctx,
        &ProgramDesc::new("texture", &source, &[layout.clone()])
            .with_topology(Topology::TriangleStrip)
            .with_filter(FilterMode::Linear),
    )?;
    let vertices = VertexBuffer::upload(ctx, "texture", &layout, &geometry::quad_uv())?;

    let base = PendingTexture::from_image(pattern::clouds(256, 7), "uClouds");
    let mask = PendingTexture::from_image(pattern::disc(256), "uMask");

    Ok(Box::new(Textured {
        program,
        vertices,
        base,
        mask,
        filter: FilterMode::Linear,
        pending_filter: None,
        checker: false,
        pending_base: None,
    }))
}

impl Scene for Textured {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        if let Some(filter) = self.pending_filter.take() {
            self.program.set_filter(ctx, filter);
        }
        if let Some(base) = self.pending_base.take() {
            self.base = base;
        }
        self.base.poll(ctx, &self.program);
        self.mask.poll(ctx, &self.program);
        frame.draw(ctx, &[&self.vertices], 0..4);
        Ok(())
    }

    fn on_key(&mut self, key: SceneKey) {
        match key {
            SceneKey::Character('f') => {
                self.filter = match self.filter {
                    FilterMode::Linear => FilterMode::Nearest,
                    FilterMode::Nearest => FilterMode::Linear,
                };
                self.pending_filter = Some(self.filter);
                println!("filter = {:?}", self.filter);
            }
            // A checkerboard makes the filter difference much easier to see.
            SceneKey::Character('c') => {
                self.checker = !self.checker;
                let image = if self.checker {
                    pattern::checkerboard(256, 16)
                } else {
                    pattern::clouds(256, 7)
                };
                self.pending_base = Some(PendingTexture::from_image(image, "uClouds"));
                println!("base = {}", if self.checker { "checkerboard" } else { "clouds" });
            }
            _ => {}
        }
    }
}
