//! GPU-context seam of the engine.
//!
//! The renderer core talks to the GPU only through [`RenderDevice`].  Two
//! implementations are provided: [`HeadlessDevice`], a CPU emulation used by
//! tests and headless runs, and (with the `wgpu` feature) [`WgpuDevice`].

pub mod device;
pub mod error;
pub mod handle;
pub mod headless;
pub mod reflect;
pub mod vertex;

#[cfg(feature = "wgpu")]
pub mod wgpu_backend;

pub use device::{
    DeviceRef, DeviceStats, Primitive, RenderDevice, UniformValue, MAX_TEXTURE_UNITS,
};
pub use error::GpuError;
pub use handle::{GpuHandle, ResourceId, ResourceKind, StageKind};
pub use headless::{DrawRecord, HeadlessDevice};
pub use reflect::{ProgramReflection, StageReflection, UniformSlot};
pub use vertex::{Vertex, VertexLayout};

#[cfg(feature = "wgpu")]
pub use wgpu_backend::{TargetConfig, WgpuDevice};
