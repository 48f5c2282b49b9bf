//! Linking a vertex/fragment pair into a program source.
//!
//! Linking is where the two stages' interfaces meet: every varying the
//! fragment stage reads must be written by the vertex stage with the same
//! type, and any binding both stages share must mean the same resource.
//! All of that is checked here, on the CPU, before a device ever sees the
//! shaders.

use crate::error::{Error, Result};
use crate::stage::{ResourceKind, ShaderStage, StageKind, VaryingSlot};

/// Which stages reference a linked resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSet {
    pub vertex: bool,
    pub fragment: bool,
}

/// A resource binding merged across both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramResource {
    pub group: u32,
    pub binding: u32,
    pub name: String,
    pub kind: ResourceKind,
    pub stages: StageSet,
}

/// A linked vertex/fragment pair with a merged resource interface.
///
/// When both stages declare the same binding under different names, the
/// vertex stage's name is the one lookups see.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    vertex: ShaderStage,
    fragment: ShaderStage,
    resources: Vec<ProgramResource>,
}

impl ProgramSource {
    /// Compile both stages and link them in one step.
    pub fn compile(vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let vertex = ShaderStage::compile(StageKind::Vertex, vertex_source)?;
        let fragment = ShaderStage::compile(StageKind::Fragment, fragment_source)?;
        Self::link(vertex, fragment)
    }

    /// Link two already-compiled stages.
    ///
    /// Every problem found is reported, not just the first one, so a broken
    /// pair reads like a linker log rather than a scavenger hunt.
    pub fn link(vertex: ShaderStage, fragment: ShaderStage) -> Result<Self> {
        if vertex.kind() != StageKind::Vertex {
            return Err(Error::Link(format!(
                "first stage is a {} stage, expected vertex",
                vertex.kind()
            )));
        }
        if fragment.kind() != StageKind::Fragment {
            return Err(Error::Link(format!(
                "second stage is a {} stage, expected fragment",
                fragment.kind()
            )));
        }

        let mut problems = Vec::new();

        for input in fragment.inputs() {
            match vertex.outputs().iter().find(|o| o.location == input.location) {
                None => problems.push(format!(
                    "fragment input `{}` reads @location({}) but the vertex stage writes nothing there",
                    input.name, input.location
                )),
                Some(output) if output.ty != input.ty => problems.push(format!(
                    "@location({}) is {} out of the vertex stage but {} into the fragment stage",
                    input.location, output.ty, input.ty
                )),
                Some(_) => {}
            }
        }

        let mut resources: Vec<ProgramResource> = vertex
            .resources()
            .iter()
            .map(|slot| ProgramResource {
                group: slot.group,
                binding: slot.binding,
                name: slot.name.clone(),
                kind: slot.kind,
                stages: StageSet {
                    vertex: true,
                    fragment: false,
                },
            })
            .collect();

        for slot in fragment.resources() {
            if let Some(existing) = resources
                .iter_mut()
                .find(|r| r.group == slot.group && r.binding == slot.binding)
            {
                if existing.kind != slot.kind {
                    problems.push(format!(
                        "@group({}) @binding({}) is {} in the vertex stage but {} in the fragment stage",
                        slot.group, slot.binding, existing.kind, slot.kind
                    ));
                }
                existing.stages.fragment = true;
            } else {
                resources.push(ProgramResource {
                    group: slot.group,
                    binding: slot.binding,
                    name: slot.name.clone(),
                    kind: slot.kind,
                    stages: StageSet {
                        vertex: false,
                        fragment: true,
                    },
                });
            }
        }
        resources.sort_by_key(|r| (r.group, r.binding));

        for (i, a) in resources.iter().enumerate() {
            if resources[..i].iter().any(|b| b.name == a.name) {
                problems.push(format!(
                    "resource name `{}` refers to more than one binding",
                    a.name
                ));
            }
        }

        if problems.is_empty() {
            Ok(Self {
                vertex,
                fragment,
                resources,
            })
        } else {
            Err(Error::Link(problems.join("; ")))
        }
    }

    pub fn vertex(&self) -> &ShaderStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &ShaderStage {
        &self.fragment
    }

    /// The vertex stage's attribute inputs.
    pub fn attributes(&self) -> &[VaryingSlot] {
        self.vertex.inputs()
    }

    /// Location of a named vertex attribute. `None` when the name is not an
    /// input of the vertex stage, same as a failed lookup in the old GL days.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.vertex
            .inputs()
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.location)
    }

    /// Merged resource bindings, ordered by (group, binding).
    pub fn resources(&self) -> &[ProgramResource] {
        &self.resources
    }

    /// A named resource binding, if either stage declares it.
    pub fn resource(&self, name: &str) -> Option<&ProgramResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// (group, binding) of a named resource.
    pub fn binding(&self, name: &str) -> Option<(u32, u32)> {
        self.resource(name).map(|r| (r.group, r.binding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS_COLOR: &str = r"
        struct VsOut {
            @builtin(position) position: vec4<f32>,
            @location(0) color: vec3<f32>,
        }
        @vertex
        fn vs_main(@location(0) pos: vec2<f32>, @location(1) color: vec3<f32>) -> VsOut {
            var vout: VsOut;
            vout.position = vec4<f32>(pos, 0.0, 1.0);
            vout.color = color;
            return vout;
        }
    ";

    const FS_COLOR: &str = r"
        @fragment
        fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(color, 1.0);
        }
    ";

    #[test]
    fn matching_pair_links() {
        let program = ProgramSource::compile(VS_COLOR, FS_COLOR).unwrap();
        assert_eq!(program.attribute_location("pos"), Some(0));
        assert_eq!(program.attribute_location("color"), Some(1));
        assert_eq!(program.attribute_location("missing"), None);
        assert!(program.resources().is_empty());
    }

    #[test]
    fn unwritten_varying_fails_to_link() {
        let fs = r"
            @fragment
            fn fs_main(@location(3) color: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(color, 1.0);
            }
        ";
        let err = ProgramSource::compile(VS_COLOR, fs).unwrap_err();
        match err {
            Error::Link(msg) => assert!(msg.contains("@location(3)"), "{msg}"),
            other => panic!("expected a link error, got {other:?}"),
        }
    }

    #[test]
    fn varying_type_mismatch_fails_to_link() {
        let fs = r"
            @fragment
            fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
                return color;
            }
        ";
        let err = ProgramSource::compile(VS_COLOR, fs).unwrap_err();
        match err {
            Error::Link(msg) => {
                assert!(msg.contains("vec3<f32>") && msg.contains("vec4<f32>"), "{msg}");
            }
            other => panic!("expected a link error, got {other:?}"),
        }
    }

    #[test]
    fn extra_vertex_outputs_are_fine() {
        let vs = r"
            struct VsOut {
                @builtin(position) position: vec4<f32>,
                @location(0) color: vec3<f32>,
                @location(1) extra: f32,
            }
            @vertex
            fn vs_main(@location(0) pos: vec2<f32>) -> VsOut {
                var vout: VsOut;
                vout.position = vec4<f32>(pos, 0.0, 1.0);
                vout.color = vec3<f32>(0.5);
                vout.extra = 1.0;
                return vout;
            }
        ";
        assert!(ProgramSource::compile(vs, FS_COLOR).is_ok());
    }

    #[test]
    fn shared_binding_merges_stage_visibility() {
        let vs = r"
            struct Camera { mvp: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> camera: Camera;
            @vertex
            fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
                return camera.mvp * vec4<f32>(pos, 1.0);
            }
        ";
        let fs = r"
            struct Camera { mvp: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> camera: Camera;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return camera.mvp[0];
            }
        ";
        let program = ProgramSource::compile(vs, fs).unwrap();
        assert_eq!(program.resources().len(), 1);
        let res = &program.resources()[0];
        assert!(res.stages.vertex && res.stages.fragment);
        assert_eq!(program.binding("camera"), Some((0, 0)));
    }

    #[test]
    fn shared_binding_kind_conflict_fails_to_link() {
        let vs = r"
            struct Camera { mvp: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> camera: Camera;
            @vertex
            fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
                return camera.mvp * vec4<f32>(pos, 1.0);
            }
        ";
        let fs = r"
            struct Tint { color: vec4<f32> }
            @group(0) @binding(0) var<uniform> tint: Tint;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return tint.color;
            }
        ";
        let err = ProgramSource::compile(vs, fs).unwrap_err();
        assert!(matches!(err, Error::Link(_)));
    }

    #[test]
    fn ambiguous_resource_name_fails_to_link() {
        let vs = r"
            struct Block { v: vec4<f32> }
            @group(0) @binding(0) var<uniform> shared_block: Block;
            @vertex
            fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
                return shared_block.v + vec4<f32>(pos, 1.0);
            }
        ";
        let fs = r"
            struct Block { v: vec4<f32> }
            @group(0) @binding(1) var<uniform> shared_block: Block;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return shared_block.v;
            }
        ";
        let err = ProgramSource::compile(vs, fs).unwrap_err();
        match err {
            Error::Link(msg) => assert!(msg.contains("shared_block"), "{msg}"),
            other => panic!("expected a link error, got {other:?}"),
        }
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let vertex = ShaderStage::compile(StageKind::Vertex, VS_COLOR).unwrap();
        let fragment = ShaderStage::compile(StageKind::Fragment, FS_COLOR).unwrap();
        assert!(matches!(
            ProgramSource::link(fragment, vertex),
            Err(Error::Link(_))
        ));
    }

    #[test]
    fn compile_propagates_stage_errors() {
        let err = ProgramSource::compile("not wgsl", FS_COLOR).unwrap_err();
        assert!(matches!(err, Error::Compile { stage: StageKind::Vertex, .. }));
    }
}
