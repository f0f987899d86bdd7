//! WGSL compilation front-end and interface reflection.
//!
//! Both backends compile through [`compile_wgsl`] so that a shader accepted
//! by the headless context is accepted by the GPU one, with the same
//! diagnostics.  Linking rules live in [`link_stages`].

use std::collections::BTreeMap;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::handle::StageKind;

/// One member of a uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMember {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

/// A `var<uniform>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub size: u32,
    pub members: Vec<UniformMember>,
    /// Whether any linked entry point reads it.
    pub used: bool,
}

/// A texture or sampler binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSlot {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub used: bool,
}

/// Interface of one compiled stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReflection {
    pub kind: StageKind,
    pub entry_point: String,
    /// Location-bound inputs, `(name, location)`.
    pub inputs: Vec<(String, u32)>,
    /// Location-bound outputs.
    pub outputs: Vec<u32>,
    pub uniforms: Vec<UniformBlock>,
    pub textures: Vec<ResourceSlot>,
    pub samplers: Vec<ResourceSlot>,
}

/// Where a named uniform lives inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    /// Index into [`ProgramReflection::uniforms`].
    pub block: usize,
    pub offset: u32,
    pub size: u32,
}

/// Interface of a linked program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramReflection {
    pub stages: Vec<StageKind>,
    pub is_compute: bool,
    pub attributes: BTreeMap<String, u32>,
    pub uniforms: Vec<UniformBlock>,
    /// Sorted by `(group, binding)`; the index is the texture unit.
    pub textures: Vec<ResourceSlot>,
    pub samplers: Vec<ResourceSlot>,
}

impl ProgramReflection {
    /// Resolves `"block"` or `"block.member"`.
    pub fn uniform(&self, name: &str) -> Option<UniformSlot> {
        let (block_name, member) = match name.split_once('.') {
            Some((b, m)) => (b, Some(m)),
            None => (name, None),
        };
        let block = self.uniforms.iter().position(|u| u.name == block_name)?;
        let decl = &self.uniforms[block];
        match member {
            None => Some(UniformSlot { block, offset: 0, size: decl.size }),
            Some(m) => decl
                .members
                .iter()
                .find(|mm| mm.name == m)
                .map(|mm| UniformSlot { block, offset: mm.offset, size: mm.size }),
        }
    }

    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.textures.iter().position(|t| t.name == name).map(|i| i as u32)
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }
}

fn naga_stage(kind: StageKind) -> Option<naga::ShaderStage> {
    match kind {
        StageKind::Vertex => Some(naga::ShaderStage::Vertex),
        StageKind::Fragment => Some(naga::ShaderStage::Fragment),
        StageKind::Compute => Some(naga::ShaderStage::Compute),
        StageKind::Geometry => None,
    }
}

/// Parses, validates and reflects one WGSL stage.  The error is a
/// human-readable compiler log.
pub fn compile_wgsl(kind: StageKind, source: &str) -> Result<StageReflection, String> {
    if source.trim().is_empty() {
        return Err(format!("error: empty {kind} shader source"));
    }
    let Some(stage) = naga_stage(kind) else {
        return Err("error: geometry stages are not supported, WGSL has no geometry entry points"
            .to_string());
    };

    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let Some((ep_index, ep)) = module
        .entry_points
        .iter()
        .enumerate()
        .find(|(_, ep)| ep.stage == stage)
    else {
        return Err(format!("error: no @{kind} entry point found"));
    };
    let ep_info = info.get_entry_point(ep_index);

    let mut inputs = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(&module, arg.binding.as_ref(), arg.ty, arg.name.as_deref(), &mut inputs);
    }
    let mut outputs = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_locations(&module, result.binding.as_ref(), result.ty, None, &mut outputs);
    }

    let mut uniforms = Vec::new();
    let mut textures = Vec::new();
    let mut samplers = Vec::new();
    for (handle, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let name = var
            .name
            .clone()
            .unwrap_or_else(|| format!("group{}_binding{}", rb.group, rb.binding));
        let used = !ep_info[handle].is_empty();
        let inner = &module.types[var.ty].inner;
        match var.space {
            naga::AddressSpace::Uniform => {
                let members = match inner {
                    naga::TypeInner::Struct { members, .. } => members
                        .iter()
                        .map(|m| UniformMember {
                            name: m.name.clone().unwrap_or_default(),
                            offset: m.offset,
                            size: module.types[m.ty].inner.size(module.to_ctx()),
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                uniforms.push(UniformBlock {
                    name,
                    group: rb.group,
                    binding: rb.binding,
                    size: inner.size(module.to_ctx()),
                    members,
                    used,
                });
            }
            naga::AddressSpace::Handle => {
                let slot = ResourceSlot { name, group: rb.group, binding: rb.binding, used };
                match inner {
                    naga::TypeInner::Image { .. } => textures.push(slot),
                    naga::TypeInner::Sampler { .. } => samplers.push(slot),
                    _ => {}
                }
            }
            // storage buffers and push constants are not part of the material interface
            _ => {}
        }
    }

    Ok(StageReflection {
        kind,
        entry_point: ep.name.clone(),
        inputs: inputs.into_iter().map(|(n, l)| (n.unwrap_or_default(), l)).collect(),
        outputs: outputs.into_iter().map(|(_, l)| l).collect(),
        uniforms,
        textures,
        samplers,
    })
}

/// Pushes `(name, location)` for a location binding, or for every
/// location-bound member when the value is an IO struct.
fn collect_locations(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    name: Option<&str>,
    out: &mut Vec<(Option<String>, u32)>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.push((name.map(str::to_string), *location));
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(naga::Binding::Location { location, .. }) = &m.binding {
                        out.push((m.name.clone(), *location));
                    }
                }
            }
        }
    }
}

/// Checks that `stages` form a valid program and merges their interfaces.
pub fn link_stages(stages: &[&StageReflection]) -> Result<ProgramReflection, String> {
    if stages.is_empty() {
        return Err("error: no shader stages attached".to_string());
    }

    let mut kinds: Vec<StageKind> = stages.iter().map(|s| s.kind).collect();
    kinds.sort();
    if let Some(w) = kinds.windows(2).find(|w| w[0] == w[1]) {
        return Err(format!("error: more than one {} stage attached", w[0]));
    }

    let is_compute = kinds.contains(&StageKind::Compute);
    if is_compute && kinds.len() > 1 {
        return Err("error: compute stages cannot be linked with graphics stages".to_string());
    }

    let vertex = stages.iter().find(|s| s.kind == StageKind::Vertex);
    if !is_compute && vertex.is_none() {
        return Err("error: graphics programs need a vertex stage".to_string());
    }

    if let (Some(vs), Some(fs)) = (vertex, stages.iter().find(|s| s.kind == StageKind::Fragment)) {
        for (name, location) in &fs.inputs {
            if !vs.outputs.contains(location) {
                return Err(format!(
                    "error: fragment input `{name}` at location {location} is not written by the vertex stage"
                ));
            }
        }
    }

    let mut uniforms: Vec<UniformBlock> = Vec::new();
    let mut textures: Vec<ResourceSlot> = Vec::new();
    let mut samplers: Vec<ResourceSlot> = Vec::new();
    for stage in stages {
        for block in &stage.uniforms {
            if let Some(existing) = uniforms.iter_mut().find(|u| u.name == block.name) {
                if existing.size != block.size {
                    return Err(format!(
                        "error: uniform `{}` is declared with {} bytes in one stage and {} in another",
                        block.name, existing.size, block.size
                    ));
                }
                existing.used |= block.used;
            } else {
                check_binding_free(&uniforms, &textures, &samplers, &block.name, block.group, block.binding)?;
                uniforms.push(block.clone());
            }
        }
        for (list, incoming) in [(&mut textures, &stage.textures), (&mut samplers, &stage.samplers)] {
            for slot in incoming {
                if let Some(existing) = list.iter_mut().find(|s| s.name == slot.name) {
                    existing.used |= slot.used;
                } else {
                    list.push(slot.clone());
                }
            }
        }
    }
    textures.sort_by_key(|t| (t.group, t.binding));
    samplers.sort_by_key(|s| (s.group, s.binding));

    let attributes = vertex
        .map(|vs| vs.inputs.iter().cloned().collect())
        .unwrap_or_default();

    Ok(ProgramReflection {
        stages: kinds,
        is_compute,
        attributes,
        uniforms,
        textures,
        samplers,
    })
}

fn check_binding_free(
    uniforms: &[UniformBlock],
    textures: &[ResourceSlot],
    samplers: &[ResourceSlot],
    name: &str,
    group: u32,
    binding: u32,
) -> Result<(), String> {
    let clash = uniforms
        .iter()
        .map(|u| (&u.name, u.group, u.binding))
        .chain(textures.iter().chain(samplers).map(|s| (&s.name, s.group, s.binding)))
        .find(|(n, g, b)| *g == group && *b == binding && n.as_str() != name);
    match clash {
        Some((other, ..)) => Err(format!(
            "error: `{name}` and `{other}` both use @group({group}) @binding({binding})"
        )),
        None => Ok(()),
    }
}
