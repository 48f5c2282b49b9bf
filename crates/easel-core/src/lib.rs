//! # Easel Core
//!
//! The platform-agnostic half of Easel: everything about a GPU program that
//! can be decided, checked and tested without a GPU.
//!
//! - WGSL stage compilation with real compiler diagnostics
//! - Vertex/fragment linking with interface and binding checks
//! - Vertex buffer layouts counted in buffer elements, not bytes
//! - The geometry and procedural images the demo gallery draws
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use easel_core::{AttrFormat, ProgramSource, VertexLayout};
//!
//! let program = ProgramSource::compile(VERTEX_WGSL, FRAGMENT_WGSL)?;
//! let layout = VertexLayout::interleaved(
//!     6,
//!     &[(0, AttrFormat::Float32x3, 0), (1, AttrFormat::Float32x3, 3)],
//! )?;
//! assert_eq!(program.attribute_location("position"), Some(0));
//! ```
//!
//! ## Conventions
//!
//! - **Layouts**: strides and offsets count f32 elements; bytes are derived
//!   exactly once, on the way to the GPU
//! - **Errors**: compile and link failures are values carrying the full
//!   diagnostic text, never a logged-and-ignored handle
//! - **Coordinates**: clip space and winding follow WebGPU conventions

pub mod geometry;
pub mod layout;
pub mod pattern;
pub mod program;
pub mod stage;

mod error;

pub use error::{Error, Result};
pub use layout::{AttrFormat, Attribute, ELEMENT_SIZE, VertexLayout};
pub use program::{ProgramResource, ProgramSource, StageSet};
pub use stage::{
    ResourceKind, ResourceSlot, ScalarType, ShaderStage, SlotType, StageKind, VaryingSlot,
};
