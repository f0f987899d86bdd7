//! `ferrous_renderer`: GPU resource ownership and draw submission.
//!
//! # Module layout
//!
//! | Module      | Responsibility                                           |
//! |-------------|----------------------------------------------------------|
//! | `resources` | `GpuBuffer`, `VertexArray` and `Texture` handle owners   |
//! | `shader`    | Stages, the stage registry, linked programs, sources     |
//! | `material`  | Shading models, presets, per-mesh material tables        |
//! | `geometry`  | Descriptors, `Submesh`, `Mesh`, built-in primitives      |
//! | `shaders`   | Built-in WGSL stages                                     |
//! | `loader`    | Image decoding seam for material textures                |
//!
//! Everything runs on the thread that owns the GPU context; the
//! [`DeviceRef`](ferrous_gpu::DeviceRef) every resource holds is `!Send`.

pub mod error;
pub mod geometry;
pub mod loader;
pub mod material;
pub mod resources;
pub mod shader;
pub mod shaders;
pub mod traits;

pub use ferrous_gpu;
pub use glam;

pub use error::{LoadError, ProgramError, RenderError};
pub use geometry::{primitives, Aabb, Mesh, MeshDescriptor, Submesh, SubmeshDescriptor};
pub use loader::{ImageLoader, NoImages};
pub use material::{
    recover_material, Material, MaterialPreset, MaterialTable, ShadingModel, TextureSlot,
};
pub use resources::{GpuBuffer, Texture, VertexArray};
pub use shader::{MemorySource, ShaderProgram, ShaderRegistry, ShaderSource, ShaderStage, StageKey};
pub use traits::{DrawStats, Drawable, Loadable};

#[cfg(feature = "image")]
pub use loader::ImageFileLoader;
