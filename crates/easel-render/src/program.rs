//! Live GPU programs: a linked [`ProgramSource`] turned into a pipeline with
//! its buffers, textures and samplers attached.

use std::sync::Arc;

use anyhow::Context as _;
use easel_core::{ProgramSource, ResourceKind, ScalarType, VertexLayout};
use image::RgbaImage;
use parking_lot::{Mutex, MutexGuard};

use crate::buffers;
use crate::context::Context;
use crate::frame::DEPTH_FORMAT;
use crate::texture::{self, FilterMode};

/// How primitives are assembled from the vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    PointList,
    LineList,
    TriangleList,
    TriangleStrip,
}

impl Topology {
    fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::PointList => wgpu::PrimitiveTopology::PointList,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

/// Depth handling for a program's draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthOptions {
    /// Test fragments against the depth buffer and write the survivors.
    pub test: bool,
    /// Nudge fragments away from the camera so coplanar geometry drawn
    /// later loses the depth test. Only meaningful when `test` is set.
    pub polygon_offset: bool,
}

/// Everything needed to turn a [`ProgramSource`] into a live program.
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub source: &'a ProgramSource,
    pub buffers: &'a [VertexLayout],
    pub topology: Topology,
    pub depth: DepthOptions,
    pub filter: FilterMode,
}

impl<'a> ProgramDesc<'a> {
    /// A triangle-list program with no depth test and nearest-texel sampling.
    pub fn new(label: &'a str, source: &'a ProgramSource, buffers: &'a [VertexLayout]) -> Self {
        Self {
            label,
            source,
            buffers,
            topology: Topology::TriangleList,
            depth: DepthOptions::default(),
            filter: FilterMode::Nearest,
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_depth(mut self, depth: DepthOptions) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }
}

struct UniformSlot {
    name: String,
    group: u32,
    binding: u32,
    size: u32,
    buffer: wgpu::Buffer,
}

pub(crate) struct TextureSlot {
    name: String,
    group: u32,
    binding: u32,
    view: wgpu::TextureView,
}

struct SamplerSlot {
    group: u32,
    binding: u32,
}

/// The mutable half of a program: texture views and the sampler can be
/// swapped after creation, which rebuilds the bind groups.
pub(crate) struct BindState {
    textures: Vec<TextureSlot>,
    filter: FilterMode,
    sampler: wgpu::Sampler,
    pub(crate) groups: Vec<wgpu::BindGroup>,
}

struct ProgramInner {
    label: String,
    pipeline: wgpu::RenderPipeline,
    layouts: Vec<wgpu::BindGroupLayout>,
    uniforms: Vec<UniformSlot>,
    samplers: Vec<SamplerSlot>,
    expected_buffers: usize,
    depth_test: bool,
    bind: Mutex<BindState>,
}

impl ProgramInner {
    fn rebuild_groups(&self, ctx: &Context, bind: &mut BindState) {
        let groups = self
            .layouts
            .iter()
            .enumerate()
            .map(|(group, layout)| {
                let group = group as u32;
                let mut entries: Vec<wgpu::BindGroupEntry> = Vec::new();
                for u in self.uniforms.iter().filter(|u| u.group == group) {
                    entries.push(wgpu::BindGroupEntry {
                        binding: u.binding,
                        resource: u.buffer.as_entire_binding(),
                    });
                }
                for t in bind.textures.iter().filter(|t| t.group == group) {
                    entries.push(wgpu::BindGroupEntry {
                        binding: t.binding,
                        resource: wgpu::BindingResource::TextureView(&t.view),
                    });
                }
                for s in self.samplers.iter().filter(|s| s.group == group) {
                    entries.push(wgpu::BindGroupEntry {
                        binding: s.binding,
                        resource: wgpu::BindingResource::Sampler(&bind.sampler),
                    });
                }
                entries.sort_by_key(|e| e.binding);
                ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&self.label),
                    layout,
                    entries: &entries,
                })
            })
            .collect();
        bind.groups = groups;
    }
}

/// A pipeline plus everything bound to it. Clones share the same GPU state,
/// so a clone stored as the context's active program sees later texture and
/// filter changes.
#[derive(Clone)]
pub struct Program {
    inner: Arc<ProgramInner>,
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Program {
    /// Build the pipeline and bindings described by `desc`, then install the
    /// program as the context's active one.
    ///
    /// Fails when the buffer layouts do not line up with the vertex stage's
    /// inputs: a missing or doubly-supplied location, or a component count
    /// that disagrees with the shader.
    pub fn create(ctx: &mut Context, desc: &ProgramDesc<'_>) -> anyhow::Result<Self> {
        let source = desc.source;
        check_buffer_layouts(source, desc.buffers)?;

        let device = ctx.device();

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Vertex Shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(source.vertex().source().into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Fragment Shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(source.fragment().source().into()),
        });

        // One bind group layout per group index, empty where a group is
        // skipped, so layout position always equals group number.
        let group_count = source
            .resources()
            .iter()
            .map(|r| r.group + 1)
            .max()
            .unwrap_or(0);
        let mut layouts = Vec::with_capacity(group_count as usize);
        for group in 0..group_count {
            let mut entries: Vec<wgpu::BindGroupLayoutEntry> = Vec::new();
            for res in source.resources().iter().filter(|r| r.group == group) {
                let mut visibility = wgpu::ShaderStages::NONE;
                if res.stages.vertex {
                    visibility |= wgpu::ShaderStages::VERTEX;
                }
                if res.stages.fragment {
                    visibility |= wgpu::ShaderStages::FRAGMENT;
                }
                let ty = match res.kind {
                    ResourceKind::Uniform { .. } => wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    ResourceKind::Texture2d => wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    ResourceKind::Sampler => {
                        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                    }
                };
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding: res.binding,
                    visibility,
                    ty,
                    count: None,
                });
            }
            layouts.push(device.create_bind_group_layout(
                &wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} Bind Group Layout {group}", desc.label)),
                    entries: &entries,
                },
            ));
        }

        let mut uniforms = Vec::new();
        let mut textures = Vec::new();
        let mut samplers = Vec::new();
        for res in source.resources() {
            match res.kind {
                ResourceKind::Uniform { size } => {
                    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("{} `{}` Uniforms", desc.label, res.name)),
                        size: u64::from(size),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    });
                    uniforms.push(UniformSlot {
                        name: res.name.clone(),
                        group: res.group,
                        binding: res.binding,
                        size,
                        buffer,
                    });
                }
                ResourceKind::Texture2d => textures.push(TextureSlot {
                    name: res.name.clone(),
                    group: res.group,
                    binding: res.binding,
                    view: texture::placeholder_view(ctx),
                }),
                ResourceKind::Sampler => samplers.push(SamplerSlot {
                    group: res.group,
                    binding: res.binding,
                }),
            }
        }

        let layout_refs: Vec<&wgpu::BindGroupLayout> = layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });

        let attr_arrays: Vec<Vec<wgpu::VertexAttribute>> =
            desc.buffers.iter().map(buffers::wgpu_attributes).collect();
        let buffer_layouts: Vec<wgpu::VertexBufferLayout> = desc
            .buffers
            .iter()
            .zip(&attr_arrays)
            .map(|(layout, attrs)| wgpu::VertexBufferLayout {
                array_stride: layout.byte_stride(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let depth_stencil = desc.depth.test.then(|| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: if desc.depth.polygon_offset {
                wgpu::DepthBiasState {
                    constant: 1,
                    slope_scale: 1.0,
                    clamp: 0.0,
                }
            } else {
                wgpu::DepthBiasState::default()
            },
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(source.vertex().entry_point()),
                buffers: &buffer_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(source.fragment().entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: desc.topology.to_wgpu(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let sampler = texture::create_sampler(ctx, desc.filter);
        let inner = ProgramInner {
            label: desc.label.to_owned(),
            pipeline,
            layouts,
            uniforms,
            samplers,
            expected_buffers: desc.buffers.len(),
            depth_test: desc.depth.test,
            bind: Mutex::new(BindState {
                textures,
                filter: desc.filter,
                sampler,
                groups: Vec::new(),
            }),
        };
        inner.rebuild_groups(ctx, &mut inner.bind.lock());

        let program = Self {
            inner: Arc::new(inner),
        };
        ctx.activate(&program);
        Ok(program)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Write `data` into the program's only uniform block.
    ///
    /// Fails when the program has zero or several blocks, or when `data` is
    /// not exactly the block's size. Use [`Program::write_block`] to address
    /// one of several blocks by name.
    pub fn write_uniforms<U: bytemuck::Pod>(&self, ctx: &Context, data: &U) -> anyhow::Result<()> {
        match self.inner.uniforms.as_slice() {
            [slot] => self.write_slot(ctx, slot, bytemuck::bytes_of(data)),
            [] => anyhow::bail!("program `{}` has no uniform block", self.inner.label),
            slots => anyhow::bail!(
                "program `{}` has {} uniform blocks, write one by name",
                self.inner.label,
                slots.len()
            ),
        }
    }

    /// Write `data` into the uniform block declared as `name` in the shaders.
    pub fn write_block<U: bytemuck::Pod>(
        &self,
        ctx: &Context,
        name: &str,
        data: &U,
    ) -> anyhow::Result<()> {
        let slot = self
            .inner
            .uniforms
            .iter()
            .find(|u| u.name == name)
            .with_context(|| {
                format!("program `{}` has no uniform block `{name}`", self.inner.label)
            })?;
        self.write_slot(ctx, slot, bytemuck::bytes_of(data))
    }

    fn write_slot(&self, ctx: &Context, slot: &UniformSlot, bytes: &[u8]) -> anyhow::Result<()> {
        if bytes.len() as u32 != slot.size {
            anyhow::bail!(
                "uniform block `{}` is {} bytes but {} were written",
                slot.name,
                slot.size,
                bytes.len()
            );
        }
        ctx.queue().write_buffer(&slot.buffer, 0, bytes);
        Ok(())
    }

    /// Replace the texture behind the binding declared as `name`.
    ///
    /// An unknown name logs a warning and leaves every binding as it was;
    /// draws keep working either way.
    pub fn set_texture(&self, ctx: &Context, name: &str, image: &RgbaImage) {
        let mut bind = self.inner.bind.lock();
        let Some(slot) = bind.textures.iter_mut().find(|t| t.name == name) else {
            tracing::warn!(
                program = %self.inner.label,
                name,
                "no texture binding with this name, ignoring"
            );
            return;
        };
        slot.view = texture::upload_rgba(
            ctx,
            &format!("{} `{name}` Texture", self.inner.label),
            image,
        );
        self.inner.rebuild_groups(ctx, &mut bind);
    }

    /// Swap the filter used by every sampler binding of this program.
    pub fn set_filter(&self, ctx: &Context, filter: FilterMode) {
        let mut bind = self.inner.bind.lock();
        if bind.filter == filter {
            return;
        }
        bind.filter = filter;
        bind.sampler = texture::create_sampler(ctx, filter);
        self.inner.rebuild_groups(ctx, &mut bind);
    }

    pub(crate) fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.inner.pipeline
    }

    pub(crate) fn expected_buffers(&self) -> usize {
        self.inner.expected_buffers
    }

    pub(crate) fn uses_depth(&self) -> bool {
        self.inner.depth_test
    }

    pub(crate) fn bind_state(&self) -> MutexGuard<'_, BindState> {
        self.inner.bind.lock()
    }
}

fn check_buffer_layouts(source: &ProgramSource, layouts: &[VertexLayout]) -> anyhow::Result<()> {
    let mut provided: Vec<u32> = Vec::new();
    for layout in layouts {
        for attr in layout.attributes() {
            if provided.contains(&attr.location) {
                anyhow::bail!(
                    "vertex attribute @location({}) is supplied by more than one buffer",
                    attr.location
                );
            }
            provided.push(attr.location);
        }
    }

    for input in source.attributes() {
        let attr = layouts
            .iter()
            .flat_map(|l| l.attributes().iter())
            .find(|a| a.location == input.location)
            .with_context(|| {
                format!(
                    "vertex input `{}` @location({}) is not supplied by any buffer layout",
                    input.name, input.location
                )
            })?;
        if input.ty.scalar != ScalarType::F32 {
            anyhow::bail!(
                "vertex input `{}` is {}, only f32 attributes can be fed from buffers",
                input.name,
                input.ty
            );
        }
        if attr.format.components() != input.ty.count {
            anyhow::bail!(
                "vertex input `{}` wants {} but the buffer supplies {} components",
                input.name,
                input.ty,
                attr.format.components()
            );
        }
    }

    for location in provided {
        if !source.attributes().iter().any(|a| a.location == location) {
            tracing::warn!(location, "buffer layout supplies an attribute the shader never reads");
        }
    }
    Ok(())
}
