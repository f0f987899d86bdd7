pub mod buffer;
pub mod texture;

pub use buffer::{GpuBuffer, VertexArray};
pub use texture::Texture;
