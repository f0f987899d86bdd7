//! The GPU-context seam.
//!
//! Everything the renderer core does to the GPU goes through
//! [`RenderDevice`].  The trait mirrors a classic immediate-mode graphics
//! API (create / upload / compile / link / use / bind / draw) so that the
//! ordering rules of the core are visible in the calls it makes, while the
//! backends decide how those calls map onto real hardware.

use std::rc::Rc;

use ferrous_core::ImageData;

use crate::error::GpuError;
use crate::handle::{ResourceId, ResourceKind};
use crate::reflect::{ProgramReflection, StageReflection};
use crate::vertex::VertexLayout;

/// Texture units available to a program.
pub const MAX_TEXTURE_UNITS: u32 = 16;

/// Shared reference to the current GPU context.
///
/// `Rc` on purpose: a context belongs to exactly one thread, and a
/// `DeviceRef` must not be sent anywhere else.
pub type DeviceRef = Rc<dyn RenderDevice>;

/// A value written to a program uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4×4 matrix.
    Mat4([f32; 16]),
}

impl UniformValue {
    /// Raw bytes as laid out in a uniform buffer.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformValue::Float(v) => bytemuck::bytes_of(v),
            UniformValue::Int(v) => bytemuck::bytes_of(v),
            UniformValue::UInt(v) => bytemuck::bytes_of(v),
            UniformValue::Vec2(v) => bytemuck::cast_slice(v),
            UniformValue::Vec3(v) => bytemuck::cast_slice(v),
            UniformValue::Vec4(v) => bytemuck::cast_slice(v),
            UniformValue::Mat4(v) => bytemuck::cast_slice(v),
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.as_bytes().len() as u32
    }

    /// All-zero float value occupying `size` bytes, if one exists.
    pub fn zeroed(size: u32) -> Option<Self> {
        match size {
            4 => Some(UniformValue::Float(0.0)),
            8 => Some(UniformValue::Vec2([0.0; 2])),
            12 => Some(UniformValue::Vec3([0.0; 3])),
            16 => Some(UniformValue::Vec4([0.0; 4])),
            64 => Some(UniformValue::Mat4([0.0; 16])),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(m: glam::Mat4) -> Self {
        UniformValue::Mat4(m.to_cols_array())
    }
}

/// How a draw assembles its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primitive {
    /// Indexed triangle list.
    #[default]
    Triangles,
    /// One point per vertex; the index buffer is ignored.
    Points,
}

/// Counters every backend keeps; cheap to copy out once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub live_resources: usize,
    pub created: u64,
    pub released: u64,
    pub uploaded_bytes: u64,
    pub draw_calls: u64,
}

/// A GPU context current on the calling thread.
///
/// Methods take `&self`; implementations keep their mutable state behind a
/// `RefCell`, the way a driver keeps its own bookkeeping.
pub trait RenderDevice {
    /// Short backend label used in logs.
    fn backend_name(&self) -> &'static str;

    /// Creates an empty object of `kind`.  Fails only when no context is
    /// available or the driver refuses the allocation.
    fn create_resource(&self, kind: ResourceKind) -> Result<ResourceId, GpuError>;

    /// Releases an object.  Called exactly once per id, by `GpuHandle::drop`.
    fn release_resource(&self, id: ResourceId);

    /// Replaces the whole contents of a vertex or index buffer.
    fn upload_buffer(&self, buffer: ResourceId, contents: &[u8]) -> Result<(), GpuError>;

    /// Points a vertex array at its vertex and index buffers.
    fn configure_vertex_array(
        &self,
        vertex_array: ResourceId,
        vertex_buffer: ResourceId,
        index_buffer: ResourceId,
        layout: &VertexLayout,
    ) -> Result<(), GpuError>;

    /// Compiles `source` for the stage's fixed kind.  The error string is the
    /// compiler log.
    fn compile_stage(&self, stage: ResourceId, source: &str) -> Result<StageReflection, String>;

    /// Links compiled stages into `program`, copying their compiled state.
    /// The error string is the linker log.
    fn link_program(&self, program: ResourceId, stages: &[ResourceId])
        -> Result<ProgramReflection, String>;

    /// Makes `program` current for subsequent uniform writes and draws.
    fn use_program(&self, program: ResourceId) -> Result<(), GpuError>;

    /// Writes a uniform of `program`.  `Ok(false)` when the program has no
    /// uniform of that name.
    fn set_uniform(&self, program: ResourceId, name: &str, value: UniformValue)
        -> Result<bool, GpuError>;

    /// Replaces the texel data of a texture.
    fn upload_texture(&self, texture: ResourceId, image: &ImageData) -> Result<(), GpuError>;

    /// Binds `texture` to texture unit `unit`.
    fn bind_texture(&self, unit: u32, texture: ResourceId) -> Result<(), GpuError>;

    /// Issues an indexed triangle-list draw using the current program.
    fn draw_indexed(&self, vertex_array: ResourceId, index_count: u32) -> Result<(), GpuError>;

    /// Draws the first `vertex_count` vertices of `vertex_array` as points
    /// using the current program.
    fn draw_points(&self, vertex_array: ResourceId, vertex_count: u32) -> Result<(), GpuError>;

    fn stats(&self) -> DeviceStats;
}
