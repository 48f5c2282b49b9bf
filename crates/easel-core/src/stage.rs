//! WGSL stage compilation and reflection.
//!
//! A [`ShaderStage`] is a single vertex or fragment source that has been
//! parsed and validated, with its interface (attribute inputs, varyings,
//! resource bindings) extracted. Holding one is proof the source is sound,
//! so later pipeline assembly never has to guess whether a stage compiled.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{Error, Result};

/// The programmable pipeline stage a shader source targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Vertex => write!(f, "vertex"),
            StageKind::Fragment => write!(f, "fragment"),
        }
    }
}

/// Component type of a stage input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    F32,
    I32,
    U32,
}

/// Scalar or vector type of a location-bound input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotType {
    pub scalar: ScalarType,
    /// Component count, 1 for scalars and 2..4 for vectors.
    pub count: u32,
}

impl std::fmt::Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scalar = match self.scalar {
            ScalarType::F32 => "f32",
            ScalarType::I32 => "i32",
            ScalarType::U32 => "u32",
        };
        if self.count == 1 {
            write!(f, "{scalar}")
        } else {
            write!(f, "vec{}<{scalar}>", self.count)
        }
    }
}

/// A `@location`-bound input or output of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaryingSlot {
    pub location: u32,
    pub name: String,
    pub ty: SlotType,
}

/// What kind of resource a `@group`/`@binding` pair refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A `var<uniform>` block; `size` is its type's size in bytes.
    Uniform { size: u32 },
    /// A `texture_2d<f32>`.
    Texture2d,
    /// A non-comparison `sampler`.
    Sampler,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Uniform { size } => write!(f, "a {size}-byte uniform block"),
            ResourceKind::Texture2d => write!(f, "a texture_2d<f32>"),
            ResourceKind::Sampler => write!(f, "a sampler"),
        }
    }
}

/// A resource binding referenced by one stage's entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
    pub name: String,
    pub kind: ResourceKind,
}

/// One compiled and validated shader stage.
#[derive(Debug, Clone)]
pub struct ShaderStage {
    kind: StageKind,
    source: String,
    entry_point: String,
    inputs: Vec<VaryingSlot>,
    outputs: Vec<VaryingSlot>,
    resources: Vec<ResourceSlot>,
}

impl ShaderStage {
    /// Compile one WGSL stage.
    ///
    /// The source is parsed and validated in full; on failure the error
    /// carries the compiler's annotated output, source excerpt and all.
    /// Only resources the entry point actually reaches are reflected, so
    /// shared source files with unused declarations stay cheap to bind.
    pub fn compile(kind: StageKind, source: &str) -> Result<Self> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| Error::Compile {
            stage: kind,
            log: e.emit_to_string(source),
        })?;

        let info = Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .map_err(|e| Error::Compile {
                stage: kind,
                log: e.emit_to_string(source),
            })?;

        let (ep_index, entry) = module
            .entry_points
            .iter()
            .enumerate()
            .find(|(_, ep)| ep.stage == kind.to_naga())
            .ok_or(Error::MissingEntryPoint { stage: kind })?;

        let mut inputs = Vec::new();
        for arg in &entry.function.arguments {
            collect_io(
                &module,
                arg.ty,
                arg.binding.as_ref(),
                arg.name.as_deref(),
                &mut inputs,
            );
        }
        inputs.sort_by_key(|slot| slot.location);

        let mut outputs = Vec::new();
        if let Some(result) = &entry.function.result {
            collect_io(&module, result.ty, result.binding.as_ref(), None, &mut outputs);
        }
        outputs.sort_by_key(|slot| slot.location);

        let ep_info = info.get_entry_point(ep_index);
        let mut resources = Vec::new();
        for (handle, var) in module.global_variables.iter() {
            if ep_info[handle].is_empty() {
                continue;
            }
            let Some(res) = &var.binding else { continue };
            let name = var.name.clone().unwrap_or_default();
            let kind_of = match &module.types[var.ty].inner {
                inner @ (naga::TypeInner::Struct { .. }
                | naga::TypeInner::Scalar(_)
                | naga::TypeInner::Vector { .. }
                | naga::TypeInner::Matrix { .. }) => {
                    if var.space == naga::AddressSpace::Uniform {
                        ResourceKind::Uniform {
                            size: inner.size(module.to_ctx()),
                        }
                    } else {
                        return Err(Error::UnsupportedResource(format!(
                            "`{name}` lives in address space {:?}",
                            var.space
                        )));
                    }
                }
                naga::TypeInner::Image {
                    dim: naga::ImageDimension::D2,
                    arrayed: false,
                    class:
                        naga::ImageClass::Sampled {
                            kind: naga::ScalarKind::Float,
                            multi: false,
                        },
                } => ResourceKind::Texture2d,
                naga::TypeInner::Sampler { comparison: false } => ResourceKind::Sampler,
                other => {
                    return Err(Error::UnsupportedResource(format!("`{name}`: {other:?}")));
                }
            };
            resources.push(ResourceSlot {
                group: res.group,
                binding: res.binding,
                name,
                kind: kind_of,
            });
        }
        resources.sort_by_key(|slot| (slot.group, slot.binding));

        Ok(Self {
            kind,
            source: source.to_string(),
            entry_point: entry.name.clone(),
            inputs,
            outputs,
            resources,
        })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the entry point the stage was compiled against.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Location-bound inputs: vertex attributes for a vertex stage,
    /// varyings for a fragment stage.
    pub fn inputs(&self) -> &[VaryingSlot] {
        &self.inputs
    }

    /// Location-bound outputs: varyings for a vertex stage, render
    /// targets for a fragment stage.
    pub fn outputs(&self) -> &[VaryingSlot] {
        &self.outputs
    }

    /// Resource bindings the entry point reaches, ordered by (group, binding).
    pub fn resources(&self) -> &[ResourceSlot] {
        &self.resources
    }
}

fn collect_io(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    name: Option<&str>,
    out: &mut Vec<VaryingSlot>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            // Validation already restricts IO to numeric scalars and vectors.
            if let Some(slot) = slot_type(module, ty) {
                out.push(VaryingSlot {
                    location: *location,
                    name: name.unwrap_or_default().to_string(),
                    ty: slot,
                });
            }
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_io(
                        module,
                        member.ty,
                        member.binding.as_ref(),
                        member.name.as_deref(),
                        out,
                    );
                }
            }
        }
    }
}

fn slot_type(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Option<SlotType> {
    match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => scalar_type(*scalar).map(|s| SlotType { scalar: s, count: 1 }),
        naga::TypeInner::Vector { size, scalar } => scalar_type(*scalar).map(|s| SlotType {
            scalar: s,
            count: *size as u32,
        }),
        _ => None,
    }
}

fn scalar_type(scalar: naga::Scalar) -> Option<ScalarType> {
    match (scalar.kind, scalar.width) {
        (naga::ScalarKind::Float, 4) => Some(ScalarType::F32),
        (naga::ScalarKind::Sint, 4) => Some(ScalarType::I32),
        (naga::ScalarKind::Uint, 4) => Some(ScalarType::U32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_VS: &str = r"
        @vertex
        fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 0.0, 1.0);
        }
    ";

    const PLAIN_FS: &str = r"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    ";

    #[test]
    fn vertex_stage_compiles_and_reflects_inputs() {
        let stage = ShaderStage::compile(StageKind::Vertex, PLAIN_VS).unwrap();
        assert_eq!(stage.kind(), StageKind::Vertex);
        assert_eq!(stage.entry_point(), "vs_main");
        assert_eq!(stage.inputs().len(), 1);
        assert_eq!(stage.inputs()[0].location, 0);
        assert_eq!(stage.inputs()[0].name, "position");
        assert_eq!(
            stage.inputs()[0].ty,
            SlotType {
                scalar: ScalarType::F32,
                count: 2
            }
        );
        assert!(stage.resources().is_empty());
    }

    #[test]
    fn struct_io_is_flattened() {
        let source = r"
            struct VsOut {
                @builtin(position) position: vec4<f32>,
                @location(0) color: vec3<f32>,
                @location(1) uv: vec2<f32>,
            }
            @vertex
            fn vs_main(@location(0) pos: vec2<f32>) -> VsOut {
                var vout: VsOut;
                vout.position = vec4<f32>(pos, 0.0, 1.0);
                vout.color = vec3<f32>(1.0);
                vout.uv = pos;
                return vout;
            }
        ";
        let stage = ShaderStage::compile(StageKind::Vertex, source).unwrap();
        let outputs = stage.outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].name, "color");
        assert_eq!(outputs[0].ty.count, 3);
        assert_eq!(outputs[1].name, "uv");
        assert_eq!(outputs[1].ty.count, 2);
    }

    #[test]
    fn compile_failure_carries_annotated_log() {
        let err = ShaderStage::compile(StageKind::Vertex, "fn vs_main( -> {").unwrap_err();
        match err {
            Error::Compile { stage, log } => {
                assert_eq!(stage, StageKind::Vertex);
                assert!(log.contains("error"), "log should read like compiler output: {log}");
            }
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn validation_failure_is_a_compile_error() {
        // Parses fine, but a vertex entry point must produce @builtin(position).
        let source = r"
            @vertex
            fn vs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(0.0);
            }
        ";
        let err = ShaderStage::compile(StageKind::Vertex, source).unwrap_err();
        assert!(matches!(err, Error::Compile { stage: StageKind::Vertex, .. }));
    }

    #[test]
    fn missing_entry_point_is_its_own_error() {
        let err = ShaderStage::compile(StageKind::Fragment, PLAIN_VS).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingEntryPoint {
                stage: StageKind::Fragment
            }
        ));
    }

    #[test]
    fn fragment_resources_are_reflected_in_binding_order() {
        let source = r"
            struct Params {
                tint: vec4<f32>,
            }
            @group(0) @binding(2) var samp: sampler;
            @group(0) @binding(0) var<uniform> params: Params;
            @group(0) @binding(1) var tex: texture_2d<f32>;

            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(tex, samp, uv) * params.tint;
            }
        ";
        let stage = ShaderStage::compile(StageKind::Fragment, source).unwrap();
        let resources = stage.resources();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].name, "params");
        assert_eq!(resources[0].kind, ResourceKind::Uniform { size: 16 });
        assert_eq!(resources[1].name, "tex");
        assert_eq!(resources[1].kind, ResourceKind::Texture2d);
        assert_eq!(resources[2].name, "samp");
        assert_eq!(resources[2].kind, ResourceKind::Sampler);
    }

    #[test]
    fn unreachable_resources_are_not_reflected() {
        let source = r"
            struct Params {
                tint: vec4<f32>,
            }
            @group(0) @binding(0) var<uniform> used: Params;
            @group(0) @binding(1) var<uniform> ignored: Params;

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return used.tint;
            }
        ";
        let stage = ShaderStage::compile(StageKind::Fragment, source).unwrap();
        assert_eq!(stage.resources().len(), 1);
        assert_eq!(stage.resources()[0].name, "used");
    }

    #[test]
    fn matrix_uniform_size_matches_gpu_layout() {
        let source = r"
            struct Camera {
                mvp: mat4x4<f32>,
            }
            @group(0) @binding(0) var<uniform> camera: Camera;

            @vertex
            fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
                return camera.mvp * vec4<f32>(pos, 1.0);
            }
        ";
        let stage = ShaderStage::compile(StageKind::Vertex, source).unwrap();
        assert_eq!(stage.resources()[0].kind, ResourceKind::Uniform { size: 64 });
    }

    #[test]
    fn fragment_output_is_reflected() {
        let stage = ShaderStage::compile(StageKind::Fragment, PLAIN_FS).unwrap();
        assert_eq!(stage.outputs().len(), 1);
        assert_eq!(stage.outputs()[0].location, 0);
        assert_eq!(stage.outputs()[0].ty.count, 4);
    }
}
