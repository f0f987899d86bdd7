//! Geometry and material descriptions handed over by a mesh parser.
//!
//! The core does not read any file format; a loader fills these in and
//! [`Mesh::from_descriptor`](crate::geometry::Mesh::from_descriptor) turns
//! them into GPU resources.

use ferrous_gpu::Vertex;
use glam::Vec3;

use crate::geometry::Aabb;
use crate::material::{ShadingModel, TextureSlot};

/// One submesh: flat vertex floats, triangle indices and a material index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmeshDescriptor {
    /// [`Vertex::FLOATS`] floats per vertex, in [`Vertex`] field order.
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

impl SubmeshDescriptor {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { vertices, indices, material: None }
    }

    pub fn from_vertices(vertices: &[Vertex], indices: Vec<u32>) -> Self {
        Self::new(Vertex::flatten(vertices), indices)
    }

    /// Triangulates quad faces: `a b c d` becomes `a b c` and `a c d`.
    pub fn from_quads(vertices: &[Vertex], quads: &[[u32; 4]]) -> Self {
        let indices = quads
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .collect();
        Self::from_vertices(vertices, indices)
    }

    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Vertex::FLOATS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.vertices
                .chunks_exact(Vertex::FLOATS)
                .map(|v| Vec3::new(v[0], v[1], v[2])),
        )
    }
}

/// A material as described by the source file: parameters plus texture
/// references resolved through an [`ImageLoader`](crate::ImageLoader).
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    pub model: ShadingModel,
    pub textures: Vec<(TextureSlot, String)>,
}

impl MaterialDescriptor {
    pub fn new(name: impl Into<String>, model: ShadingModel) -> Self {
        Self {
            name: name.into(),
            model,
            textures: Vec::new(),
        }
    }

    pub fn with_texture(mut self, slot: TextureSlot, path: impl Into<String>) -> Self {
        self.textures.push((slot, path.into()));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDescriptor {
    pub submeshes: Vec<SubmeshDescriptor>,
    pub materials: Vec<MaterialDescriptor>,
}

impl MeshDescriptor {
    pub fn single(submesh: SubmeshDescriptor) -> Self {
        Self {
            submeshes: vec![submesh],
            materials: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(SubmeshDescriptor::vertex_count).sum()
    }

    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(SubmeshDescriptor::index_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_split_into_two_triangles() {
        let vertices = [Vertex::default(); 4];
        let desc = SubmeshDescriptor::from_quads(&vertices, &[[0, 1, 2, 3]]);
        assert_eq!(desc.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(desc.vertex_count(), 4);
    }

    #[test]
    fn bounding_box_covers_positions() {
        let desc = SubmeshDescriptor::from_vertices(
            &[Vertex::at([-1.0, 0.0, 2.0]), Vertex::at([3.0, -2.0, 0.5])],
            vec![],
        );
        let bounds = desc.bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(bounds.max, Vec3::new(3.0, 0.0, 2.0));
        assert!(SubmeshDescriptor::default().bounding_box().is_none());
    }
}
