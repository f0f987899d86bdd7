//! CPU-emulated GPU context.
//!
//! `HeadlessDevice` enforces the same ordering rules as a real driver
//! (objects must exist, programs must be linked before use, vertex arrays
//! configured before drawing) and records every draw so tests and headless
//! runs can inspect what would have reached the GPU.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use ferrous_core::ImageData;

use crate::device::{DeviceStats, Primitive, RenderDevice, UniformValue, MAX_TEXTURE_UNITS};
use crate::error::GpuError;
use crate::handle::{ResourceId, ResourceKind, StageKind};
use crate::reflect::{compile_wgsl, link_stages, ProgramReflection, StageReflection};
use crate::vertex::VertexLayout;

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub program: ResourceId,
    pub vertex_array: ResourceId,
    pub primitive: Primitive,
    /// Indices drawn, or vertices for [`Primitive::Points`].
    pub element_count: u32,
    /// Uniform bytes at draw time, keyed by `"block"` and `"block.member"`.
    pub uniforms: BTreeMap<String, Vec<u8>>,
    /// Texture bound to each of the program's texture units, by texture name.
    pub textures: BTreeMap<String, Option<ResourceId>>,
}

impl DrawRecord {
    /// Uniform contents reinterpreted as floats.
    pub fn uniform_f32s(&self, name: &str) -> Option<Vec<f32>> {
        self.uniforms.get(name).map(|bytes| {
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        })
    }
}

struct LinkedProgram {
    reflection: ProgramReflection,
    /// Backing storage of each uniform block.
    blocks: Vec<Vec<u8>>,
}

enum Entry {
    Buffer {
        kind: ResourceKind,
        contents: Vec<u8>,
    },
    VertexArray {
        buffers: Option<(ResourceId, ResourceId)>,
    },
    Stage {
        kind: StageKind,
        compiled: Option<StageReflection>,
    },
    Program {
        linked: Option<LinkedProgram>,
    },
    Texture {
        image: Option<ImageData>,
    },
}

impl Entry {
    fn kind(&self) -> ResourceKind {
        match self {
            Entry::Buffer { kind, .. } => *kind,
            Entry::VertexArray { .. } => ResourceKind::VertexArray,
            Entry::Stage { kind, .. } => ResourceKind::ShaderStage(*kind),
            Entry::Program { .. } => ResourceKind::Program,
            Entry::Texture { .. } => ResourceKind::Texture,
        }
    }

    fn resident_bytes(&self) -> usize {
        match self {
            Entry::Buffer { contents, .. } => contents.len(),
            Entry::Texture { image: Some(image) } => image.pixels().len(),
            _ => 0,
        }
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<ResourceId, Entry>,
    next_id: u32,
    current_program: Option<ResourceId>,
    texture_units: [Option<ResourceId>; MAX_TEXTURE_UNITS as usize],
    draws: Vec<DrawRecord>,
    stats: DeviceStats,
    context_lost: bool,
    memory_budget: Option<usize>,
    resident_bytes: usize,
}

impl State {
    fn check_context(&self) -> Result<(), GpuError> {
        if self.context_lost {
            Err(GpuError::ContextUnavailable)
        } else {
            Ok(())
        }
    }

    fn entry(&self, id: ResourceId) -> Result<&Entry, GpuError> {
        self.entries.get(&id).ok_or(GpuError::UnknownResource(id))
    }

    fn entry_mut(&mut self, id: ResourceId) -> Result<&mut Entry, GpuError> {
        self.entries.get_mut(&id).ok_or(GpuError::UnknownResource(id))
    }

    /// Reserves room for replacing `old` resident bytes with `new`.
    fn reserve(&mut self, old: usize, new: usize) -> Result<(), GpuError> {
        let after = self.resident_bytes - old + new;
        if let Some(budget) = self.memory_budget {
            if after > budget {
                return Err(GpuError::OutOfMemory {
                    requested: new,
                    available: budget - (self.resident_bytes - old),
                });
            }
        }
        self.resident_bytes = after;
        self.stats.uploaded_bytes += new as u64;
        Ok(())
    }

    fn linked(&self, program: ResourceId) -> Result<&LinkedProgram, GpuError> {
        match self.entry(program)? {
            Entry::Program { linked: Some(linked) } => Ok(linked),
            Entry::Program { linked: None } => Err(GpuError::ProgramNotLinked(program)),
            other => Err(wrong_kind(program, "program", other)),
        }
    }
}

fn wrong_kind(id: ResourceId, expected: &'static str, entry: &Entry) -> GpuError {
    GpuError::WrongKind { id, expected, actual: entry.kind() }
}

/// A [`RenderDevice`] that runs entirely on the CPU.
#[derive(Default)]
pub struct HeadlessDevice {
    state: RefCell<State>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that fails uploads once `bytes` are resident.
    pub fn with_memory_budget(bytes: usize) -> Self {
        let device = Self::default();
        device.state.borrow_mut().memory_budget = Some(bytes);
        device
    }

    /// Simulates losing the context; every later call fails with
    /// [`GpuError::ContextUnavailable`].
    pub fn lose_context(&self) {
        log::warn!("headless context lost");
        self.state.borrow_mut().context_lost = true;
    }

    /// Draws recorded so far.
    pub fn draws(&self) -> Vec<DrawRecord> {
        self.state.borrow().draws.clone()
    }

    /// Drains the recorded draws, typically once per frame.
    pub fn take_draws(&self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.state.borrow_mut().draws)
    }

    fn record_draw(
        &self,
        vertex_array: ResourceId,
        count: u32,
        primitive: Primitive,
    ) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        let program = state.current_program.ok_or(GpuError::NoProgramInUse)?;
        let linked = state.linked(program)?;
        if linked.reflection.is_compute {
            return Err(GpuError::Backend(format!(
                "program {program:?} is a compute program and cannot draw"
            )));
        }
        match state.entry(vertex_array)? {
            Entry::VertexArray { buffers: Some(_) } => {}
            Entry::VertexArray { buffers: None } => {
                return Err(GpuError::VertexArrayNotConfigured(vertex_array))
            }
            other => return Err(wrong_kind(vertex_array, "vertex array", other)),
        }

        let mut uniforms = BTreeMap::new();
        for (block, bytes) in linked.reflection.uniforms.iter().zip(&linked.blocks) {
            uniforms.insert(block.name.clone(), bytes.clone());
            for member in &block.members {
                let start = member.offset as usize;
                uniforms.insert(
                    format!("{}.{}", block.name, member.name),
                    bytes[start..start + member.size as usize].to_vec(),
                );
            }
        }
        let textures = linked
            .reflection
            .textures
            .iter()
            .enumerate()
            .map(|(unit, t)| (t.name.clone(), state.texture_units.get(unit).copied().flatten()))
            .collect();

        let record = DrawRecord {
            program,
            vertex_array,
            primitive,
            element_count: count,
            uniforms,
            textures,
        };
        log::trace!("headless {primitive:?} draw {vertex_array:?} with {count} elements");
        if count > 0 {
            state.stats.draw_calls += 1;
        }
        state.draws.push(record);
        Ok(())
    }

    pub fn buffer_contents(&self, buffer: ResourceId) -> Option<Vec<u8>> {
        match self.state.borrow().entries.get(&buffer) {
            Some(Entry::Buffer { contents, .. }) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Size of the texture's uploaded image, if any.
    pub fn texture_size(&self, texture: ResourceId) -> Option<(u32, u32)> {
        match self.state.borrow().entries.get(&texture) {
            Some(Entry::Texture { image: Some(image) }) => Some((image.width(), image.height())),
            _ => None,
        }
    }

    /// Current bytes of a program uniform.
    pub fn uniform_value(&self, program: ResourceId, name: &str) -> Option<Vec<u8>> {
        let state = self.state.borrow();
        let linked = state.linked(program).ok()?;
        let slot = linked.reflection.uniform(name)?;
        let start = slot.offset as usize;
        Some(linked.blocks[slot.block][start..start + slot.size as usize].to_vec())
    }

    pub fn current_program(&self) -> Option<ResourceId> {
        self.state.borrow().current_program
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.state.borrow().entries.contains_key(&id)
    }

    /// Number of live objects of `kind`.
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.state
            .borrow()
            .entries
            .values()
            .filter(|e| e.kind() == kind)
            .count()
    }
}

impl RenderDevice for HeadlessDevice {
    fn backend_name(&self) -> &'static str {
        "headless"
    }

    fn create_resource(&self, kind: ResourceKind) -> Result<ResourceId, GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        state.next_id += 1;
        let id = ResourceId::from_raw(state.next_id).ok_or_else(|| GpuError::ResourceCreation {
            kind,
            reason: "id space exhausted".to_string(),
        })?;
        let entry = match kind {
            ResourceKind::VertexBuffer | ResourceKind::IndexBuffer => {
                Entry::Buffer { kind, contents: Vec::new() }
            }
            ResourceKind::VertexArray => Entry::VertexArray { buffers: None },
            ResourceKind::ShaderStage(kind) => Entry::Stage { kind, compiled: None },
            ResourceKind::Program => Entry::Program { linked: None },
            ResourceKind::Texture => Entry::Texture { image: None },
        };
        state.entries.insert(id, entry);
        state.stats.created += 1;
        state.stats.live_resources = state.entries.len();
        Ok(id)
    }

    fn release_resource(&self, id: ResourceId) {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.entries.remove(&id) else {
            log::warn!("release of unknown resource {id:?}");
            return;
        };
        state.resident_bytes -= entry.resident_bytes();
        if state.current_program == Some(id) {
            state.current_program = None;
        }
        for unit in state.texture_units.iter_mut() {
            if *unit == Some(id) {
                *unit = None;
            }
        }
        state.stats.released += 1;
        state.stats.live_resources = state.entries.len();
    }

    fn upload_buffer(&self, buffer: ResourceId, contents: &[u8]) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        let old = match state.entry(buffer)? {
            Entry::Buffer { contents, .. } => contents.len(),
            other => return Err(wrong_kind(buffer, "buffer", other)),
        };
        state.reserve(old, contents.len())?;
        if let Entry::Buffer { contents: stored, .. } = state.entry_mut(buffer)? {
            stored.clear();
            stored.extend_from_slice(contents);
        }
        Ok(())
    }

    fn configure_vertex_array(
        &self,
        vertex_array: ResourceId,
        vertex_buffer: ResourceId,
        index_buffer: ResourceId,
        layout: &VertexLayout,
    ) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        for (id, expected, name) in [
            (vertex_buffer, ResourceKind::VertexBuffer, "vertex buffer"),
            (index_buffer, ResourceKind::IndexBuffer, "index buffer"),
        ] {
            let entry = state.entry(id)?;
            if entry.kind() != expected {
                return Err(wrong_kind(id, name, entry));
            }
        }
        if layout.stride == 0 {
            return Err(GpuError::Backend("vertex layout has a zero stride".to_string()));
        }
        match state.entry_mut(vertex_array)? {
            Entry::VertexArray { buffers } => {
                *buffers = Some((vertex_buffer, index_buffer));
                Ok(())
            }
            other => {
                let err = wrong_kind(vertex_array, "vertex array", other);
                Err(err)
            }
        }
    }

    fn compile_stage(&self, stage: ResourceId, source: &str) -> Result<StageReflection, String> {
        let mut state = self.state.borrow_mut();
        if state.context_lost {
            return Err(GpuError::ContextUnavailable.to_string());
        }
        let Some(Entry::Stage { kind, compiled }) = state.entries.get_mut(&stage) else {
            return Err(format!("{stage:?} is not a shader stage"));
        };
        let result = compile_wgsl(*kind, source);
        *compiled = result.as_ref().ok().cloned();
        result
    }

    fn link_program(
        &self,
        program: ResourceId,
        stages: &[ResourceId],
    ) -> Result<ProgramReflection, String> {
        let mut state = self.state.borrow_mut();
        if state.context_lost {
            return Err(GpuError::ContextUnavailable.to_string());
        }
        if !matches!(state.entries.get(&program), Some(Entry::Program { .. })) {
            return Err(format!("{program:?} is not a program"));
        }

        let mut compiled = Vec::with_capacity(stages.len());
        let mut failure = None;
        for id in stages {
            match state.entries.get(id) {
                Some(Entry::Stage { compiled: Some(reflection), .. }) => compiled.push(reflection),
                Some(Entry::Stage { kind, compiled: None }) => {
                    failure = Some(format!("error: {kind} stage {id:?} is not compiled"));
                    break;
                }
                _ => {
                    failure = Some(format!("error: {id:?} is not a shader stage"));
                    break;
                }
            }
        }
        let result = match failure {
            Some(log) => Err(log),
            None => link_stages(&compiled),
        };

        let linked = result.as_ref().ok().map(|reflection| LinkedProgram {
            blocks: reflection
                .uniforms
                .iter()
                .map(|u| vec![0; u.size as usize])
                .collect(),
            reflection: reflection.clone(),
        });
        if linked.is_none() && state.current_program == Some(program) {
            state.current_program = None;
        }
        if let Some(Entry::Program { linked: slot }) = state.entries.get_mut(&program) {
            *slot = linked;
        }
        result
    }

    fn use_program(&self, program: ResourceId) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        state.linked(program)?;
        state.current_program = Some(program);
        Ok(())
    }

    fn set_uniform(
        &self,
        program: ResourceId,
        name: &str,
        value: UniformValue,
    ) -> Result<bool, GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        let Some(slot) = state.linked(program)?.reflection.uniform(name) else {
            return Ok(false);
        };
        if slot.size != value.size() {
            return Err(GpuError::UniformMismatch {
                name: name.to_string(),
                expected: slot.size,
                actual: value.size(),
            });
        }
        if let Some(Entry::Program { linked: Some(linked) }) = state.entries.get_mut(&program) {
            let start = slot.offset as usize;
            linked.blocks[slot.block][start..start + slot.size as usize]
                .copy_from_slice(value.as_bytes());
        }
        Ok(true)
    }

    fn upload_texture(&self, texture: ResourceId, image: &ImageData) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        let entry = state.entry(texture)?;
        if !matches!(entry, Entry::Texture { .. }) {
            return Err(wrong_kind(texture, "texture", entry));
        }
        let old = entry.resident_bytes();
        state.reserve(old, image.pixels().len())?;
        if let Entry::Texture { image: stored } = state.entry_mut(texture)? {
            *stored = Some(image.clone());
        }
        Ok(())
    }

    fn bind_texture(&self, unit: u32, texture: ResourceId) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        if unit >= MAX_TEXTURE_UNITS {
            return Err(GpuError::TextureUnitOutOfRange { unit, max: MAX_TEXTURE_UNITS });
        }
        let entry = state.entry(texture)?;
        if !matches!(entry, Entry::Texture { .. }) {
            return Err(wrong_kind(texture, "texture", entry));
        }
        state.texture_units[unit as usize] = Some(texture);
        Ok(())
    }

    fn draw_indexed(&self, vertex_array: ResourceId, index_count: u32) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
        state.check_context()?;
        let program = state.current_program.ok_or(GpuError::NoProgramInUse)?;
        let linked = state.linked(program)?;
        if linked.reflection.is_compute {
            return Err(GpuError::Backend(format!(
                "program {program:?} is a compute program and cannot draw"
            )));
        }
        match state.entry(vertex_array)? {
            Entry::VertexArray { buffers: Some(_) } => {}
            Entry::VertexArray { buffers: None } => {
                return Err(GpuError::VertexArrayNotConfigured(vertex_array))
            }
            other => return Err(wrong_kind(vertex_array, "vertex array", other)),
        }

        let mut uniforms = BTreeMap::new();
        for (block, bytes) in linked.reflection.uniforms.iter().zip(&linked.blocks) {
            uniforms.insert(block.name.clone(), bytes.clone());
            for member in &block.members {
                let start = member.offset as usize;
                uniforms.insert(
                    format!("{}.{}", block.name, member.name),
                    bytes[start..start + member.size as usize].to_vec(),
                );
            }
        }
        let textures = linked
            .reflection
            .textures
            .iter()
            .enumerate()
            .map(|(unit, t)| (t.name.clone(), state.texture_units.get(unit).copied().flatten()))
            .collect();

        let record = DrawRecord {
            program,
            vertex_array,
            primitive: Primitive::Triangles,
            element_count: index_count,
            uniforms,
            textures,
        };
        log::trace!("headless draw {vertex_array:?} with {index_count} elements");
        if index_count > 0 {
            state.stats.draw_calls += 1;
        }
        state.draws.push(record);
        Ok(())
    }

    fn draw_points(&self, vertex_array: ResourceId, vertex_count: u32) -> Result<(), GpuError> {
        self.record_draw(vertex_array, vertex_count, Primitive::Points)
    }

    fn stats(&self) -> DeviceStats {
        self.state.borrow().stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    const VS: &str = r#"
struct Camera { view_proj: mat4x4<f32> }
@group(0) @binding(0) var<uniform> camera: Camera;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return camera.view_proj * vec4<f32>(position, 1.0);
}
"#;

    const FS: &str = r#"
@group(1) @binding(0) var<uniform> tint: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return tint;
}
"#;

    fn linked_program(device: &HeadlessDevice) -> ResourceId {
        let vs = device.create_resource(ResourceKind::ShaderStage(StageKind::Vertex)).unwrap();
        let fs = device.create_resource(ResourceKind::ShaderStage(StageKind::Fragment)).unwrap();
        device.compile_stage(vs, VS).unwrap();
        device.compile_stage(fs, FS).unwrap();
        let program = device.create_resource(ResourceKind::Program).unwrap();
        device.link_program(program, &[vs, fs]).unwrap();
        program
    }

    fn vertex_array(device: &HeadlessDevice) -> ResourceId {
        let vbo = device.create_resource(ResourceKind::VertexBuffer).unwrap();
        let ebo = device.create_resource(ResourceKind::IndexBuffer).unwrap();
        let vao = device.create_resource(ResourceKind::VertexArray).unwrap();
        device.configure_vertex_array(vao, vbo, ebo, &Vertex::LAYOUT).unwrap();
        vao
    }

    #[test]
    fn upload_replaces_contents() {
        let device = HeadlessDevice::new();
        let buffer = device.create_resource(ResourceKind::VertexBuffer).unwrap();
        device.upload_buffer(buffer, &[1, 2, 3, 4]).unwrap();
        device.upload_buffer(buffer, &[9, 9]).unwrap();
        assert_eq!(device.buffer_contents(buffer), Some(vec![9, 9]));
    }

    #[test]
    fn lost_context_refuses_creation() {
        let device = HeadlessDevice::new();
        device.lose_context();
        assert_eq!(
            device.create_resource(ResourceKind::Texture),
            Err(GpuError::ContextUnavailable)
        );
    }

    #[test]
    fn memory_budget_is_enforced() {
        let device = HeadlessDevice::with_memory_budget(8);
        let buffer = device.create_resource(ResourceKind::IndexBuffer).unwrap();
        device.upload_buffer(buffer, &[0; 8]).unwrap();
        // replacing resident data frees the old bytes first
        device.upload_buffer(buffer, &[0; 6]).unwrap();
        let err = device.upload_buffer(buffer, &[0; 12]).unwrap_err();
        assert_eq!(err, GpuError::OutOfMemory { requested: 12, available: 8 });
    }

    #[test]
    fn unlinked_program_cannot_be_used() {
        let device = HeadlessDevice::new();
        let program = device.create_resource(ResourceKind::Program).unwrap();
        assert_eq!(device.use_program(program), Err(GpuError::ProgramNotLinked(program)));
    }

    #[test]
    fn link_survives_stage_release() {
        let device = HeadlessDevice::new();
        let program = linked_program(&device);
        // stages are ids 1 and 2
        for raw in 1..=2 {
            device.release_resource(ResourceId::from_raw(raw).unwrap());
        }
        assert_eq!(device.live_count(ResourceKind::ShaderStage(StageKind::Vertex)), 0);
        device.use_program(program).unwrap();
    }

    #[test]
    fn uniforms_are_checked_and_recorded() {
        let device = HeadlessDevice::new();
        let program = linked_program(&device);
        let vao = vertex_array(&device);
        device.use_program(program).unwrap();

        assert!(device
            .set_uniform(program, "tint", UniformValue::Vec4([1.0, 0.5, 0.25, 1.0]))
            .unwrap());
        assert!(!device.set_uniform(program, "missing", UniformValue::Float(1.0)).unwrap());
        assert!(matches!(
            device.set_uniform(program, "tint", UniformValue::Float(1.0)),
            Err(GpuError::UniformMismatch { expected: 16, actual: 4, .. })
        ));

        device.draw_indexed(vao, 6).unwrap();
        let draws = device.take_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].element_count, 6);
        assert_eq!(draws[0].uniform_f32s("tint"), Some(vec![1.0, 0.5, 0.25, 1.0]));
        assert_eq!(device.stats().draw_calls, 1);
    }

    #[test]
    fn draw_requires_program_and_configured_array() {
        let device = HeadlessDevice::new();
        let vao = device.create_resource(ResourceKind::VertexArray).unwrap();
        assert_eq!(device.draw_indexed(vao, 3), Err(GpuError::NoProgramInUse));

        let program = linked_program(&device);
        device.use_program(program).unwrap();
        assert_eq!(device.draw_indexed(vao, 3), Err(GpuError::VertexArrayNotConfigured(vao)));
    }

    #[test]
    fn zero_count_draw_is_recorded_but_not_counted() {
        let device = HeadlessDevice::new();
        let program = linked_program(&device);
        let vao = vertex_array(&device);
        device.use_program(program).unwrap();
        device.draw_indexed(vao, 0).unwrap();
        assert_eq!(device.draws()[0].element_count, 0);
        assert_eq!(device.stats().draw_calls, 0);
    }

    #[test]
    fn point_draws_are_recorded_with_their_primitive() {
        let device = HeadlessDevice::new();
        let program = linked_program(&device);
        let vao = vertex_array(&device);
        device.use_program(program).unwrap();
        device.draw_indexed(vao, 6).unwrap();
        device.draw_points(vao, 4).unwrap();

        let draws = device.take_draws();
        assert_eq!(draws[0].primitive, Primitive::Triangles);
        assert_eq!((draws[1].primitive, draws[1].element_count), (Primitive::Points, 4));
        assert_eq!(device.stats().draw_calls, 2);
        assert!(device.draws().is_empty());
    }

    #[test]
    fn release_updates_stats() {
        let device = HeadlessDevice::new();
        let id = device.create_resource(ResourceKind::Texture).unwrap();
        device.release_resource(id);
        let stats = device.stats();
        assert_eq!((stats.created, stats.released, stats.live_resources), (1, 1, 0));
        assert!(!device.is_live(id));
    }

    #[test]
    fn texture_units_are_bounded() {
        let device = HeadlessDevice::new();
        let tex = device.create_resource(ResourceKind::Texture).unwrap();
        assert!(matches!(
            device.bind_texture(MAX_TEXTURE_UNITS, tex),
            Err(GpuError::TextureUnitOutOfRange { .. })
        ));
        device.bind_texture(0, tex).unwrap();
    }
}
