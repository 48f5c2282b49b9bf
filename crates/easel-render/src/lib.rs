//! Easel Render - wgpu realization of Easel programs
//!
//! This crate takes the CPU-side pieces from `easel-core` (compiled shader
//! stages, linked programs, vertex layouts) and makes them drawable: device
//! contexts, vertex and index buffers, uniform writes, textures with
//! background loading, and frames that go to a window or an offscreen
//! target with pixel readback.
//!
//! ## Example
//!
//! ```rust,ignore
//! use easel_core::{AttrFormat, ProgramSource, VertexLayout};
//! use easel_render::{Context, Frame, OffscreenTarget, Program, ProgramDesc, VertexBuffer};
//!
//! let mut ctx = Context::headless()?;
//! let source = ProgramSource::compile(VS, FS)?;
//! let layout = VertexLayout::single(0, AttrFormat::Float32x2);
//! let program = Program::create(&mut ctx, &ProgramDesc::new("triangle", &source, &[layout.clone()]))?;
//!
//! let vertices = VertexBuffer::upload(&ctx, "triangle", &layout, &easel_core::geometry::triangle())?;
//! let target = OffscreenTarget::new(&ctx, 256, 256, false);
//! let mut frame = target.begin_frame(&ctx, Default::default());
//! frame.draw(&ctx, &[&vertices], 0..3);
//! let pixels = target.read_rgba(&ctx)?;
//! ```

pub mod buffers;
pub mod context;
pub mod frame;
pub mod loader;
pub mod offscreen;
pub mod program;
pub mod scene;
pub mod texture;
pub mod window;

// Re-export wgpu and winit for users who need formats, key codes, etc.
pub use wgpu;
pub use winit;

pub use buffers::{IndexBuffer, VertexBuffer};
pub use context::Context;
pub use frame::{ClearOptions, DEPTH_FORMAT, Frame};
pub use loader::{LoadState, PendingTexture};
pub use offscreen::OffscreenTarget;
pub use program::{DepthOptions, Program, ProgramDesc, Topology};
pub use scene::{Scene, SceneBuilder, SceneKey};
pub use texture::FilterMode;
pub use window::{WindowConfig, run_scene};
