//! [`RenderDevice`] backed by a real wgpu device.
//!
//! wgpu has no immediate-mode draw call, so draws are recorded into a
//! [`FrameList`] with everything they need captured at call time (pipeline,
//! buffers, uniform contents, bound textures), and [`WgpuDevice::end_frame`]
//! replays the list into the off-screen target.

mod frame;
mod target;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ferrous_core::context::EngineContext;
use ferrous_core::{Color, ImageData};
use wgpu::util::DeviceExt;

use crate::device::{DeviceStats, Primitive, RenderDevice, UniformValue, MAX_TEXTURE_UNITS};
use crate::error::GpuError;
use crate::handle::{ResourceId, ResourceKind, StageKind};
use crate::reflect::{compile_wgsl, link_stages, ProgramReflection, StageReflection};
use crate::vertex::{Vertex, VertexLayout};

use frame::{DrawCommand, FrameList};
use target::{ColorTarget, DepthTarget};

/// Size and format of the off-screen frame.
#[derive(Debug, Clone, Copy)]
pub struct TargetConfig {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// MSAA sample count (1 = no MSAA).
    pub sample_count: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            sample_count: 1,
        }
    }
}

enum Pipeline {
    Render {
        triangles: Arc<wgpu::RenderPipeline>,
        points: Arc<wgpu::RenderPipeline>,
    },
    Compute(#[allow(dead_code)] Arc<wgpu::ComputePipeline>),
}

struct LinkedProgram {
    pipeline: Pipeline,
    reflection: ProgramReflection,
    blocks: Vec<Vec<u8>>,
}

struct CompiledStage {
    module: Arc<wgpu::ShaderModule>,
    reflection: StageReflection,
}

enum Entry {
    Buffer {
        kind: ResourceKind,
        buffer: Option<Arc<wgpu::Buffer>>,
    },
    VertexArray {
        buffers: Option<(ResourceId, ResourceId)>,
    },
    Stage {
        kind: StageKind,
        compiled: Option<CompiledStage>,
    },
    Program {
        linked: Option<LinkedProgram>,
    },
    Texture {
        view: Option<Arc<wgpu::TextureView>>,
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
}

fn wrong_kind(id: ResourceId, expected: &'static str, entry: &Entry) -> GpuError {
    GpuError::WrongKind { id, expected, actual: entry.kind() }
}

#[derive(Default)]
struct State {
    entries: HashMap<ResourceId, Entry>,
    next_id: u32,
    current_program: Option<ResourceId>,
    texture_units: [Option<Arc<wgpu::TextureView>>; MAX_TEXTURE_UNITS as usize],
    frame: FrameList,
    stats: DeviceStats,
}

impl State {
    fn entry(&self, id: ResourceId) -> Result<&Entry, GpuError> {
        self.entries.get(&id).ok_or(GpuError::UnknownResource(id))
    }

    fn linked(&self, program: ResourceId) -> Result<&LinkedProgram, GpuError> {
        match self.entry(program)? {
            Entry::Program { linked: Some(linked) } => Ok(linked),
            Entry::Program { linked: None } => Err(GpuError::ProgramNotLinked(program)),
            other => Err(wrong_kind(program, "program", other)),
        }
    }

    fn buffer(&self, id: ResourceId) -> Result<Arc<wgpu::Buffer>, GpuError> {
        match self.entry(id)? {
            Entry::Buffer { buffer: Some(buffer), .. } => Ok(buffer.clone()),
            Entry::Buffer { .. } => Err(GpuError::Backend(format!("buffer {id:?} was never uploaded"))),
            other => Err(wrong_kind(id, "buffer", other)),
        }
    }
}

/// A GPU context driving a wgpu device.
pub struct WgpuDevice {
    context: EngineContext,
    target: TargetConfig,
    color: ColorTarget,
    depth: DepthTarget,
    sampler: Arc<wgpu::Sampler>,
    fallback_texture: Arc<wgpu::TextureView>,
    pub clear_color: Color,
    state: RefCell<State>,
}

impl WgpuDevice {
    pub fn new(context: EngineContext, target: TargetConfig) -> Self {
        let device = &context.device;
        let color = ColorTarget::new(
            device,
            target.width,
            target.height,
            target.format,
            target.sample_count,
        );
        let depth = DepthTarget::new(device, target.width, target.height, target.sample_count);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let fallback = create_texture(&context, &ImageData::solid(Color::WHITE));
        log::debug!(
            "wgpu device ready: {}x{} {:?} msaa x{}",
            target.width,
            target.height,
            target.format,
            target.sample_count
        );

        Self {
            color,
            depth,
            sampler: Arc::new(sampler),
            fallback_texture: Arc::new(fallback),
            clear_color: Color::SKY,
            target,
            context,
            state: RefCell::new(State::default()),
        }
    }

    /// Creates a headless [`EngineContext`] and a device on top of it.
    pub fn headless(target: TargetConfig) -> anyhow::Result<Self> {
        let context = pollster::block_on(EngineContext::new())?;
        Ok(Self::new(context, target))
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// The resolved single-sample colour texture of the last frame.
    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color.texture
    }

    /// Replays the draws recorded since the previous call and submits them.
    /// Returns the number of draws submitted.
    pub fn end_frame(&self) -> usize {
        let frame = std::mem::take(&mut self.state.borrow_mut().frame);
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        frame.replay(&mut encoder, &self.color, &self.depth, self.clear_color.to_wgpu());
        self.context.queue.submit(std::iter::once(encoder.finish()));
        log::trace!("submitted {} draws", frame.commands.len());
        frame.commands.len()
    }

    /// Captures a draw with the current program, uniforms and textures.
    fn record_draw(
        &self,
        vertex_array: ResourceId,
        count: u32,
        primitive: Primitive,
    ) -> Result<(), GpuError> {
        let command = {
            let state = self.state.borrow();
            let program_id = state.current_program.ok_or(GpuError::NoProgramInUse)?;
            let program = state.linked(program_id)?;
            let Pipeline::Render { triangles, points } = &program.pipeline else {
                return Err(GpuError::Backend(format!(
                    "program {program_id:?} is a compute program and cannot draw"
                )));
            };
            let (vbo, ebo) = match state.entry(vertex_array)? {
                Entry::VertexArray { buffers: Some(pair) } => *pair,
                Entry::VertexArray { buffers: None } => {
                    return Err(GpuError::VertexArrayNotConfigured(vertex_array))
                }
                other => return Err(wrong_kind(vertex_array, "vertex array", other)),
            };
            if count == 0 {
                return Ok(());
            }
            let (pipeline, index_buffer) = match primitive {
                Primitive::Triangles => (triangles, Some(state.buffer(ebo)?)),
                Primitive::Points => (points, None),
            };
            DrawCommand {
                pipeline: pipeline.clone(),
                bind_groups: self.bind_groups(&state, pipeline, program),
                vertex_buffer: state.buffer(vbo)?,
                index_buffer,
                count,
            }
        };
        let mut state = self.state.borrow_mut();
        state.frame.commands.push(command);
        state.stats.draw_calls += 1;
        Ok(())
    }

    /// Runs `f` inside an error scope and returns the error it raised.
    fn scoped<T>(&self, filter: wgpu::ErrorFilter, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
        self.context.device.push_error_scope(filter);
        let value = f();
        let error = pollster::block_on(self.context.device.pop_error_scope());
        (value, error)
    }

    fn create_render_pipeline(
        &self,
        stages: &[&CompiledStage],
        primitive: Primitive,
    ) -> Result<wgpu::RenderPipeline, String> {
        let find = |kind: StageKind| stages.iter().find(|s| s.reflection.kind == kind);
        let vs = find(StageKind::Vertex).ok_or("error: graphics programs need a vertex stage")?;
        let fs = find(StageKind::Fragment);
        let attributes = Vertex::LAYOUT.wgpu_attributes();
        let targets = [Some(wgpu::ColorTargetState {
            format: self.target.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let (pipeline, error) = self.scoped(wgpu::ErrorFilter::Validation, || {
            self.context
                .device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Program Pipeline"),
                    // derived from the shaders; bind group layouts come back
                    // through `get_bind_group_layout`
                    layout: None,
                    vertex: wgpu::VertexState {
                        module: &vs.module,
                        entry_point: Some(vs.reflection.entry_point.as_str()),
                        buffers: &[wgpu::VertexBufferLayout {
                            array_stride: Vertex::LAYOUT.stride as wgpu::BufferAddress,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &attributes,
                        }],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: fs.map(|fs| wgpu::FragmentState {
                        module: &fs.module,
                        entry_point: Some(fs.reflection.entry_point.as_str()),
                        targets: &targets,
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: match primitive {
                        Primitive::Triangles => wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::TriangleList,
                            front_face: wgpu::FrontFace::Ccw,
                            cull_mode: Some(wgpu::Face::Back),
                            ..Default::default()
                        },
                        Primitive::Points => wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::PointList,
                            ..Default::default()
                        },
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DepthTarget::FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState {
                        count: self.target.sample_count,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                    cache: None,
                })
        });
        match error {
            Some(e) => Err(format!("error: pipeline creation failed: {e}")),
            None => Ok(pipeline),
        }
    }

    fn create_compute_pipeline(&self, stage: &CompiledStage) -> Result<wgpu::ComputePipeline, String> {
        let (pipeline, error) = self.scoped(wgpu::ErrorFilter::Validation, || {
            self.context
                .device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some("Program Compute Pipeline"),
                    layout: None,
                    module: &stage.module,
                    entry_point: Some(stage.reflection.entry_point.as_str()),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    cache: None,
                })
        });
        match error {
            Some(e) => Err(format!("error: pipeline creation failed: {e}")),
            None => Ok(pipeline),
        }
    }

    fn link_compiled(&self, state: &State, stages: &[ResourceId]) -> Result<LinkedProgram, String> {
        let mut compiled = Vec::with_capacity(stages.len());
        for id in stages {
            match state.entries.get(id) {
                Some(Entry::Stage { compiled: Some(stage), .. }) => compiled.push(stage),
                Some(Entry::Stage { kind, .. }) => {
                    return Err(format!("error: {kind} stage {id:?} is not compiled"))
                }
                _ => return Err(format!("error: {id:?} is not a shader stage")),
            }
        }
        let reflections: Vec<&StageReflection> = compiled.iter().map(|c| &c.reflection).collect();
        let reflection = link_stages(&reflections)?;
        let pipeline = if reflection.is_compute {
            Pipeline::Compute(Arc::new(self.create_compute_pipeline(compiled[0])?))
        } else {
            Pipeline::Render {
                triangles: Arc::new(self.create_render_pipeline(&compiled, Primitive::Triangles)?),
                points: Arc::new(self.create_render_pipeline(&compiled, Primitive::Points)?),
            }
        };
        let blocks = reflection
            .uniforms
            .iter()
            .map(|u| vec![0; u.size as usize])
            .collect();
        Ok(LinkedProgram { pipeline, reflection, blocks })
    }

    /// Bind groups for the bindings `program` actually uses, filled with the
    /// current uniform values and texture units.
    fn bind_groups(
        &self,
        state: &State,
        pipeline: &wgpu::RenderPipeline,
        program: &LinkedProgram,
    ) -> Vec<(u32, wgpu::BindGroup)> {
        let device = &self.context.device;
        let reflection = &program.reflection;

        let mut uniform_buffers = BTreeMap::new();
        for (block, bytes) in reflection.uniforms.iter().zip(&program.blocks) {
            if block.used {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(block.name.as_str()),
                    contents: bytes,
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                uniform_buffers.insert((block.group, block.binding), buffer);
            }
        }
        let mut views = BTreeMap::new();
        for (unit, texture) in reflection.textures.iter().enumerate() {
            if texture.used {
                let view = state
                    .texture_units
                    .get(unit)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| self.fallback_texture.clone());
                views.insert((texture.group, texture.binding), view);
            }
        }
        let samplers: Vec<(u32, u32)> = reflection
            .samplers
            .iter()
            .filter(|s| s.used)
            .map(|s| (s.group, s.binding))
            .collect();

        let mut groups: Vec<u32> = uniform_buffers
            .keys()
            .chain(views.keys())
            .chain(samplers.iter())
            .map(|(g, _)| *g)
            .collect();
        groups.sort_unstable();
        groups.dedup();

        groups
            .into_iter()
            .map(|group| {
                let mut entries = Vec::new();
                for ((g, binding), buffer) in &uniform_buffers {
                    if *g == group {
                        entries.push(wgpu::BindGroupEntry {
                            binding: *binding,
                            resource: buffer.as_entire_binding(),
                        });
                    }
                }
                for ((g, binding), view) in &views {
                    if *g == group {
                        entries.push(wgpu::BindGroupEntry {
                            binding: *binding,
                            resource: wgpu::BindingResource::TextureView(&**view),
                        });
                    }
                }
                for (g, binding) in &samplers {
                    if *g == group {
                        entries.push(wgpu::BindGroupEntry {
                            binding: *binding,
                            resource: wgpu::BindingResource::Sampler(&*self.sampler),
                        });
                    }
                }
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Draw Bind Group"),
                    layout: &pipeline.get_bind_group_layout(group),
                    entries: &entries,
                });
                (group, bind_group)
            })
            .collect()
    }
}

fn create_texture(context: &EngineContext, image: &ImageData) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Material Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    context.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.pixels(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(image.row_pitch()),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

impl RenderDevice for WgpuDevice {
    fn backend_name(&self) -> &'static str {
        "wgpu"
    }

    fn create_resource(&self, kind: ResourceKind) -> Result<ResourceId, GpuError> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = ResourceId::from_raw(state.next_id).ok_or_else(|| GpuError::ResourceCreation {
            kind,
            reason: "id space exhausted".to_string(),
        })?;
        let entry = match kind {
            ResourceKind::VertexBuffer | ResourceKind::IndexBuffer => {
                Entry::Buffer { kind, buffer: None }
            }
            ResourceKind::VertexArray => Entry::VertexArray { buffers: None },
            ResourceKind::ShaderStage(kind) => Entry::Stage { kind, compiled: None },
            ResourceKind::Program => Entry::Program { linked: None },
            ResourceKind::Texture => Entry::Texture { view: None },
        };
        state.entries.insert(id, entry);
        state.stats.created += 1;
        state.stats.live_resources = state.entries.len();
        Ok(id)
    }

    fn release_resource(&self, id: ResourceId) {
        let mut state = self.state.borrow_mut();
        if state.entries.remove(&id).is_none() {
            log::warn!("release of unknown resource {id:?}");
            return;
        }
        if state.current_program == Some(id) {
            state.current_program = None;
        }
        state.stats.released += 1;
        state.stats.live_resources = state.entries.len();
    }

    fn upload_buffer(&self, buffer: ResourceId, contents: &[u8]) -> Result<(), GpuError> {
        let usage = match self.state.borrow().entry(buffer)? {
            Entry::Buffer { kind: ResourceKind::IndexBuffer, .. } => wgpu::BufferUsages::INDEX,
            Entry::Buffer { .. } => wgpu::BufferUsages::VERTEX,
            other => return Err(wrong_kind(buffer, "buffer", other)),
        };
        // a fresh buffer per upload, so old and new contents never mix
        let (created, error) = self.scoped(wgpu::ErrorFilter::OutOfMemory, || {
            self.context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Geometry Buffer"),
                    contents,
                    usage,
                })
        });
        if error.is_some() {
            return Err(GpuError::OutOfMemory { requested: contents.len(), available: 0 });
        }

        let mut state = self.state.borrow_mut();
        if let Some(Entry::Buffer { buffer: slot, .. }) = state.entries.get_mut(&buffer) {
            *slot = Some(Arc::new(created));
        }
        state.stats.uploaded_bytes += contents.len() as u64;
        Ok(())
    }

    fn configure_vertex_array(
        &self,
        vertex_array: ResourceId,
        vertex_buffer: ResourceId,
        index_buffer: ResourceId,
        layout: &VertexLayout,
    ) -> Result<(), GpuError> {
        if *layout != Vertex::LAYOUT {
            return Err(GpuError::Backend(
                "pipelines are built for the engine vertex layout only".to_string(),
            ));
        }
        let mut state = self.state.borrow_mut();
        for (id, expected, name) in [
            (vertex_buffer, ResourceKind::VertexBuffer, "vertex buffer"),
            (index_buffer, ResourceKind::IndexBuffer, "index buffer"),
        ] {
            let entry = state.entry(id)?;
            if entry.kind() != expected {
                return Err(wrong_kind(id, name, entry));
            }
        }
        match state.entries.get_mut(&vertex_array) {
            Some(Entry::VertexArray { buffers }) => {
                *buffers = Some((vertex_buffer, index_buffer));
                Ok(())
            }
            Some(other) => Err(wrong_kind(vertex_array, "vertex array", other)),
            None => Err(GpuError::UnknownResource(vertex_array)),
        }
    }

    fn compile_stage(&self, stage: ResourceId, source: &str) -> Result<StageReflection, String> {
        let kind = match self.state.borrow().entries.get(&stage) {
            Some(Entry::Stage { kind, .. }) => *kind,
            _ => return Err(format!("{stage:?} is not a shader stage")),
        };
        let result = compile_wgsl(kind, source).and_then(|reflection| {
            let (module, error) = self.scoped(wgpu::ErrorFilter::Validation, || {
                self.context
                    .device
                    .create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(kind.name()),
                        source: wgpu::ShaderSource::Wgsl(source.into()),
                    })
            });
            match error {
                Some(e) => Err(e.to_string()),
                None => Ok(CompiledStage { module: Arc::new(module), reflection }),
            }
        });

        let mut state = self.state.borrow_mut();
        let reflection = result.as_ref().map(|c| c.reflection.clone()).map_err(Clone::clone);
        if let Some(Entry::Stage { compiled, .. }) = state.entries.get_mut(&stage) {
            *compiled = result.ok();
        }
        reflection
    }

    fn link_program(
        &self,
        program: ResourceId,
        stages: &[ResourceId],
    ) -> Result<ProgramReflection, String> {
        let result = {
            let state = self.state.borrow();
            if !matches!(state.entries.get(&program), Some(Entry::Program { .. })) {
                return Err(format!("{program:?} is not a program"));
            }
            self.link_compiled(&state, stages)
        };

        let mut state = self.state.borrow_mut();
        let reflection = result.as_ref().map(|l| l.reflection.clone()).map_err(Clone::clone);
        if result.is_err() && state.current_program == Some(program) {
            state.current_program = None;
        }
        if let Some(Entry::Program { linked }) = state.entries.get_mut(&program) {
            *linked = result.ok();
        }
        reflection
    }

    fn use_program(&self, program: ResourceId) -> Result<(), GpuError> {
        let mut state = self.state.borrow_mut();
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
        {
            let state = self.state.borrow();
            let entry = state.entry(texture)?;
            if !matches!(entry, Entry::Texture { .. }) {
                return Err(wrong_kind(texture, "texture", entry));
            }
        }
        let view = create_texture(&self.context, image);
        let mut state = self.state.borrow_mut();
        if let Some(Entry::Texture { view: slot }) = state.entries.get_mut(&texture) {
            *slot = Some(Arc::new(view));
        }
        state.stats.uploaded_bytes += image.pixels().len() as u64;
        Ok(())
    }

    fn bind_texture(&self, unit: u32, texture: ResourceId) -> Result<(), GpuError> {
        if unit >= MAX_TEXTURE_UNITS {
            return Err(GpuError::TextureUnitOutOfRange { unit, max: MAX_TEXTURE_UNITS });
        }
        let mut state = self.state.borrow_mut();
        let view = match state.entry(texture)? {
            Entry::Texture { view } => view.clone(),
            other => return Err(wrong_kind(texture, "texture", other)),
        };
        state.texture_units[unit as usize] = view;
        Ok(())
    }

    fn draw_indexed(&self, vertex_array: ResourceId, index_count: u32) -> Result<(), GpuError> {
        self.record_draw(vertex_array, index_count, Primitive::Triangles)
    }

    fn draw_points(&self, vertex_array: ResourceId, vertex_count: u32) -> Result<(), GpuError> {
        self.record_draw(vertex_array, vertex_count, Primitive::Points)
    }

    fn stats(&self) -> DeviceStats {
        self.state.borrow().stats
    }
}
