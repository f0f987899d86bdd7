// ferrous_core: value types shared by the GPU seam, the renderer and the app

pub mod color;
pub mod image;

// wgpu context creation is only compiled when a GPU backend is requested
#[cfg(feature = "gpu")]
pub mod context;

pub use color::Color;
pub use image::{ImageData, ImageError};

#[cfg(feature = "gpu")]
pub use context::{ContextError, ContextOptions, EngineContext};

pub use glam;
