//! End-to-end tests against a real adapter. Each test renders into an
//! offscreen `Rgba8Unorm` target and asserts exact pixel values. On machines
//! with no usable GPU the tests print a note and pass vacuously.

use bytemuck::{Pod, Zeroable};
use easel_core::{AttrFormat, ProgramSource, VertexLayout, geometry};
use easel_render::{
    ClearOptions, Context, DepthOptions, FilterMode, LoadState, OffscreenTarget, PendingTexture,
    Program, ProgramDesc, Topology, VertexBuffer,
};
use image::RgbaImage;

fn context_or_skip() -> Option<Context> {
    match Context::headless() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping GPU test: {e:#}");
            None
        }
    }
}

fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
    RgbaImage::from_pixel(4, 4, image::Rgba([r, g, b, 255]))
}

const FLAT_RED: (&str, &str) = (
    r"
    @vertex
    fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos, 0.0, 1.0);
    }
    ",
    r"
    @fragment
    fn fs_main() -> @location(0) vec4<f32> {
        return vec4<f32>(1.0, 0.0, 0.0, 1.0);
    }
    ",
);

#[test]
fn fresh_program_draws_without_explicit_activation() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let source = ProgramSource::compile(FLAT_RED.0, FLAT_RED.1).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let _program =
        Program::create(&mut ctx, &ProgramDesc::new("red triangle", &source, &[layout.clone()]))
            .unwrap();
    assert!(ctx.active_program().is_some());

    let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &geometry::triangle()).unwrap();
    let target = OffscreenTarget::new(&ctx, 64, 64, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..3);

    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(32, 32).0, [255, 0, 0, 255]);
    assert_eq!(pixels.get_pixel(2, 2).0, [0, 0, 0, 255]);
}

#[test]
fn draw_without_a_program_leaves_the_clear_color() {
    let Some(ctx) = context_or_skip() else {
        return;
    };

    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &geometry::triangle()).unwrap();
    let target = OffscreenTarget::new(&ctx, 16, 16, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::color(0.0, 0.0, 1.0, 1.0));
    frame.draw(&ctx, &[&vertices], 0..3);

    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(8, 8).0, [0, 0, 255, 255]);
}

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct OffsetColor {
    offset: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

#[test]
fn uniform_writes_land_between_draws() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let vs = r"
    struct Params {
        offset: vec2<f32>,
        _pad: vec2<f32>,
        color: vec4<f32>,
    }
    @group(0) @binding(0) var<uniform> params: Params;

    @vertex
    fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos * 0.5 + params.offset, 0.0, 1.0);
    }
    ";
    let fs = r"
    struct Params {
        offset: vec2<f32>,
        _pad: vec2<f32>,
        color: vec4<f32>,
    }
    @group(0) @binding(0) var<uniform> params: Params;

    @fragment
    fn fs_main() -> @location(0) vec4<f32> {
        return params.color;
    }
    ";
    let source = ProgramSource::compile(vs, fs).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let program =
        Program::create(&mut ctx, &ProgramDesc::new("offset", &source, &[layout.clone()]))
            .unwrap();

    let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &geometry::triangle()).unwrap();
    let target = OffscreenTarget::new(&ctx, 64, 64, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());

    program
        .write_uniforms(
            &ctx,
            &OffsetColor {
                offset: [-0.5, 0.0],
                _pad: [0.0; 2],
                color: [1.0, 0.0, 0.0, 1.0],
            },
        )
        .unwrap();
    frame.draw(&ctx, &[&vertices], 0..3);

    program
        .write_uniforms(
            &ctx,
            &OffsetColor {
                offset: [0.5, 0.0],
                _pad: [0.0; 2],
                color: [0.0, 1.0, 0.0, 1.0],
            },
        )
        .unwrap();
    frame.draw(&ctx, &[&vertices], 0..3);

    // Each draw must see the values written just before it, not the last
    // write of the frame.
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 35).0, [255, 0, 0, 255]);
    assert_eq!(pixels.get_pixel(48, 35).0, [0, 255, 0, 255]);
}

#[test]
fn wrong_size_uniform_write_is_rejected() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let vs = r"
    struct Params { color: vec4<f32> }
    @group(0) @binding(0) var<uniform> params: Params;

    @vertex
    fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos, 0.0, 1.0);
    }
    ";
    let fs = r"
    struct Params { color: vec4<f32> }
    @group(0) @binding(0) var<uniform> params: Params;

    @fragment
    fn fs_main() -> @location(0) vec4<f32> {
        return params.color;
    }
    ";
    let source = ProgramSource::compile(vs, fs).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let program =
        Program::create(&mut ctx, &ProgramDesc::new("sized", &source, &[layout])).unwrap();

    let err = program.write_uniforms(&ctx, &[0.0f32; 2]).unwrap_err();
    assert!(err.to_string().contains("16 bytes"), "{err}");
    program.write_uniforms(&ctx, &[0.0f32; 4]).unwrap();
}

const TEXTURED_QUAD: (&str, &str) = (
    r"
    struct VsOut {
        @builtin(position) position: vec4<f32>,
        @location(0) uv: vec2<f32>,
    }

    @vertex
    fn vs_main(@location(0) pos: vec2<f32>, @location(1) uv: vec2<f32>) -> VsOut {
        var vout: VsOut;
        vout.position = vec4<f32>(pos, 0.0, 1.0);
        vout.uv = uv;
        return vout;
    }
    ",
    r"
    struct VsOut {
        @builtin(position) position: vec4<f32>,
        @location(0) uv: vec2<f32>,
    }

    @group(0) @binding(0) var uTex: texture_2d<f32>;
    @group(0) @binding(1) var uSampler: sampler;

    @fragment
    fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
        return textureSample(uTex, uSampler, v.uv);
    }
    ",
);

fn textured_quad_program(ctx: &mut Context) -> (Program, VertexBuffer) {
    let source = ProgramSource::compile(TEXTURED_QUAD.0, TEXTURED_QUAD.1).unwrap();
    let layout = VertexLayout::interleaved(
        4,
        &[(0, AttrFormat::Float32x2, 0), (1, AttrFormat::Float32x2, 2)],
    )
    .unwrap();
    let program = Program::create(
        ctx,
        &ProgramDesc::new("textured quad", &source, &[layout.clone()])
            .with_topology(Topology::TriangleStrip)
            .with_filter(FilterMode::Nearest),
    )
    .unwrap();
    let vertices = VertexBuffer::upload(ctx, "quad", &layout, &geometry::quad_uv()).unwrap();
    (program, vertices)
}

#[test]
fn texture_bindings_show_the_placeholder_until_ready() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };
    let (program, vertices) = textured_quad_program(&mut ctx);
    let target = OffscreenTarget::new(&ctx, 32, 32, false);

    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..4);
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 16).0, [255, 255, 255, 255]);

    // A failed load keeps the placeholder rather than going black.
    let mut pending = PendingTexture::fetch("/no/such/easel-texture.png", "uTex");
    assert_eq!(pending.wait(&ctx, &program), LoadState::Failed);

    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..4);
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 16).0, [255, 255, 255, 255]);
}

#[test]
fn textures_apply_in_poll_order_not_arrival_order() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };
    let (program, vertices) = textured_quad_program(&mut ctx);

    // Both images are already decoded; what matters is who gets applied
    // last, which is fixed by who is polled last.
    let mut first = PendingTexture::from_image(solid(255, 255, 0), "uTex");
    let mut second = PendingTexture::from_image(solid(0, 0, 255), "uTex");
    assert_eq!(second.poll(&ctx, &program), LoadState::Ready);
    assert_eq!(first.poll(&ctx, &program), LoadState::Ready);

    let target = OffscreenTarget::new(&ctx, 32, 32, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..4);
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 16).0, [255, 255, 0, 255]);
}

#[test]
fn two_bindings_populate_regardless_of_completion_order() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    // Each binding contributes one channel, so a swap between the two
    // would flip the sampled pixel.
    let fs = r"
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
        return vec4<f32>(sky.r, mask.g, 0.0, 1.0);
    }
    ";
    let source = ProgramSource::compile(TEXTURED_QUAD.0, fs).unwrap();
    let layout = VertexLayout::interleaved(
        4,
        &[(0, AttrFormat::Float32x2, 0), (1, AttrFormat::Float32x2, 2)],
    )
    .unwrap();
    let program = Program::create(
        &mut ctx,
        &ProgramDesc::new("two bindings", &source, &[layout.clone()])
            .with_topology(Topology::TriangleStrip),
    )
    .unwrap();
    let vertices = VertexBuffer::upload(&ctx, "quad", &layout, &geometry::quad_uv()).unwrap();

    // The mask finishes first even though the clouds were requested first.
    let mut clouds = PendingTexture::from_image(solid(200, 10, 10), "uClouds");
    let mut mask = PendingTexture::from_image(solid(10, 200, 10), "uMask");
    assert_eq!(mask.poll(&ctx, &program), LoadState::Ready);
    assert_eq!(clouds.poll(&ctx, &program), LoadState::Ready);

    let target = OffscreenTarget::new(&ctx, 32, 32, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..4);
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 16).0, [200, 200, 0, 255]);
}

#[test]
fn unknown_texture_binding_is_ignored() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };
    let (program, vertices) = textured_quad_program(&mut ctx);

    program.set_texture(&ctx, "uTypo", &solid(255, 0, 255));

    let target = OffscreenTarget::new(&ctx, 32, 32, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..4);
    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(16, 16).0, [255, 255, 255, 255]);
}

#[test]
fn depth_test_keeps_nearer_fragments() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let vs = r"
    struct Params { color: vec4<f32> }
    @group(0) @binding(0) var<uniform> params: Params;

    @vertex
    fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos, 1.0);
    }
    ";
    let fs = r"
    struct Params { color: vec4<f32> }
    @group(0) @binding(0) var<uniform> params: Params;

    @fragment
    fn fs_main() -> @location(0) vec4<f32> {
        return params.color;
    }
    ";
    let source = ProgramSource::compile(vs, fs).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x3);
    let program = Program::create(
        &mut ctx,
        &ProgramDesc::new("depth", &source, &[layout.clone()]).with_depth(DepthOptions {
            test: true,
            polygon_offset: false,
        }),
    )
    .unwrap();

    #[rustfmt::skip]
    let data = [
        // near triangle
         0.0,  0.5, 0.2,
        -0.5, -0.5, 0.2,
         0.5, -0.5, 0.2,
        // far triangle, same footprint
         0.0,  0.5, 0.8,
        -0.5, -0.5, 0.8,
         0.5, -0.5, 0.8,
    ];
    let vertices = VertexBuffer::upload(&ctx, "triangles", &layout, &data).unwrap();
    let target = OffscreenTarget::new(&ctx, 64, 64, true);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());

    // Near green first, far red second. Without the depth test red would
    // paint over green.
    program
        .write_uniforms(&ctx, &[0.0f32, 1.0, 0.0, 1.0])
        .unwrap();
    frame.draw(&ctx, &[&vertices], 0..3);
    program
        .write_uniforms(&ctx, &[1.0f32, 0.0, 0.0, 1.0])
        .unwrap();
    frame.draw(&ctx, &[&vertices], 3..6);

    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(32, 35).0, [0, 255, 0, 255]);
}

#[test]
fn depth_testing_program_needs_a_depth_target() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let source = ProgramSource::compile(FLAT_RED.0, FLAT_RED.1).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let _program = Program::create(
        &mut ctx,
        &ProgramDesc::new("depth on flat target", &source, &[layout.clone()]).with_depth(
            DepthOptions {
                test: true,
                polygon_offset: false,
            },
        ),
    )
    .unwrap();

    let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &geometry::triangle()).unwrap();
    let target = OffscreenTarget::new(&ctx, 16, 16, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    // Logged and skipped; the target stays cleared.
    frame.draw(&ctx, &[&vertices], 0..3);

    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(8, 8).0, [0, 0, 0, 255]);
}

#[test]
fn mismatched_buffer_layouts_fail_program_creation() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let vs = r"
    @vertex
    fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos, 1.0);
    }
    ";
    let source = ProgramSource::compile(vs, FLAT_RED.1).unwrap();

    // Two components supplied where the shader wants three.
    let narrow = VertexLayout::single(0, AttrFormat::Float32x2);
    let Err(err) = Program::create(&mut ctx, &ProgramDesc::new("narrow", &source, &[narrow]))
    else {
        panic!("a two-component buffer satisfied a vec3 input");
    };
    assert!(err.to_string().contains("components"), "{err}");

    // No buffer supplies location 0 at all.
    let Err(err) = Program::create(&mut ctx, &ProgramDesc::new("empty", &source, &[])) else {
        panic!("a program with no buffers satisfied a vertex input");
    };
    assert!(err.to_string().contains("not supplied"), "{err}");
}

#[test]
fn draws_past_the_data_are_skipped() {
    let Some(mut ctx) = context_or_skip() else {
        return;
    };

    let source = ProgramSource::compile(FLAT_RED.0, FLAT_RED.1).unwrap();
    let layout = VertexLayout::single(0, AttrFormat::Float32x2);
    let _program =
        Program::create(&mut ctx, &ProgramDesc::new("overdraw", &source, &[layout.clone()]))
            .unwrap();

    let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &geometry::triangle()).unwrap();
    let target = OffscreenTarget::new(&ctx, 16, 16, false);
    let mut frame = target.begin_frame(&ctx, ClearOptions::default());
    frame.draw(&ctx, &[&vertices], 0..6);

    let pixels = target.read_rgba(&ctx).unwrap();
    assert_eq!(pixels.get_pixel(8, 8).0, [0, 0, 0, 255]);
}
