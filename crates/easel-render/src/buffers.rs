//! Vertex and index buffers.

use easel_core::{AttrFormat, VertexLayout};
use wgpu::util::DeviceExt;

use crate::context::Context;

/// Vertex data uploaded to the GPU under a specific layout.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    layout: VertexLayout,
    vertex_count: u32,
}

impl VertexBuffer {
    /// Upload `data`, first checking it divides evenly into vertices of the
    /// layout's stride.
    pub fn upload(
        ctx: &Context,
        label: &str,
        layout: &VertexLayout,
        data: &[f32],
    ) -> easel_core::Result<Self> {
        let vertex_count = layout.vertex_count(data)?;
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Ok(Self {
            buffer,
            layout: layout.clone(),
            vertex_count,
        })
    }

    /// How many vertices the uploaded data holds.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[must_use]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub(crate) fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Triangle (or line) indices uploaded to the GPU.
pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    format: wgpu::IndexFormat,
    count: u32,
}

impl IndexBuffer {
    pub fn upload_u16(ctx: &Context, label: &str, indices: &[u16]) -> Self {
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            buffer,
            format: wgpu::IndexFormat::Uint16,
            count: indices.len() as u32,
        }
    }

    pub fn upload_u32(ctx: &Context, label: &str, indices: &[u32]) -> Self {
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            buffer,
            format: wgpu::IndexFormat::Uint32,
            count: indices.len() as u32,
        }
    }

    /// How many indices were uploaded.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(crate) fn format(&self) -> wgpu::IndexFormat {
        self.format
    }
}

/// Translate a layout's attributes into wgpu's byte-addressed form.
pub(crate) fn wgpu_attributes(layout: &VertexLayout) -> Vec<wgpu::VertexAttribute> {
    layout
        .attributes()
        .iter()
        .map(|attr| wgpu::VertexAttribute {
            format: wgpu_format(attr.format),
            offset: attr.byte_offset(),
            shader_location: attr.location,
        })
        .collect()
}

pub(crate) fn wgpu_format(format: AttrFormat) -> wgpu::VertexFormat {
    match format {
        AttrFormat::Float32 => wgpu::VertexFormat::Float32,
        AttrFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        AttrFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        AttrFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
    }
}
