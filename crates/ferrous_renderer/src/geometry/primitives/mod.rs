//! Built-in geometry, as descriptors ready for [`Mesh`](crate::geometry::Mesh).

mod cube;
mod quad;

pub use cube::cube;
pub use quad::quad;
