//! Resource identifiers and the owning [`GpuHandle`].
//!
//! A [`ResourceId`] only *names* an object living in the GPU context.  The
//! object's lifetime is tied to exactly one [`GpuHandle`]: acquiring the
//! handle creates the object, dropping it releases the object.  Handles are
//! neither `Clone` nor `Copy`, so double release cannot be expressed.

use std::fmt;
use std::num::NonZeroU32;

use crate::device::DeviceRef;
use crate::error::GpuError;

/// Opaque identifier of an object inside a GPU context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(NonZeroU32);

impl ResourceId {
    /// Builds an id from a backend counter.  Returns `None` for zero, which
    /// is reserved as "no object".
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed kind of a shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
            StageKind::Geometry => "geometry",
            StageKind::Compute => "compute",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a [`ResourceId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VertexBuffer,
    IndexBuffer,
    /// Binding object tying a vertex buffer, an index buffer and a layout together.
    VertexArray,
    ShaderStage(StageKind),
    Program,
    Texture,
}

/// Exclusive owner of one GPU object.
///
/// The handle keeps the context alive through its [`DeviceRef`] and releases
/// the object in `Drop`.
pub struct GpuHandle {
    device: DeviceRef,
    id: ResourceId,
    kind: ResourceKind,
}

impl GpuHandle {
    /// Creates a new object of `kind` in `device`.
    pub fn acquire(device: &DeviceRef, kind: ResourceKind) -> Result<Self, GpuError> {
        let id = device.create_resource(kind)?;
        log::debug!("acquired {kind:?} {id:?}");
        Ok(Self {
            device: device.clone(),
            id,
            kind,
        })
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    pub fn device(&self) -> &DeviceRef {
        &self.device
    }
}

impl fmt::Debug for GpuHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for GpuHandle {
    fn drop(&mut self) {
        log::debug!("releasing {:?} {:?}", self.kind, self.id);
        self.device.release_resource(self.id);
    }
}
