use ferrous_gpu::{DeviceRef, GpuError, Primitive, ResourceKind, Vertex};

use crate::error::RenderError;
use crate::geometry::{Aabb, SubmeshDescriptor};
use crate::resources::{GpuBuffer, VertexArray};
use crate::shader::ShaderProgram;
use crate::traits::{DrawStats, Drawable, Loadable};

/// A contiguous piece of a mesh drawn with one material.
///
/// Owns its vertex array, vertex buffer and index buffer.  The staging data
/// is kept after upload so the submesh can be loaded again after a program
/// reload.
pub struct Submesh {
    vertex_array: VertexArray,
    vertices: GpuBuffer<f32>,
    indices: GpuBuffer<u32>,
    material: Option<usize>,
    render_mode: Primitive,
    loaded: bool,
}

impl Submesh {
    pub fn new(device: &DeviceRef, desc: SubmeshDescriptor) -> Result<Self, GpuError> {
        if desc.vertices.len() % Vertex::FLOATS != 0 {
            log::warn!(
                "submesh vertex stream of {} floats is not a multiple of {}; the tail is ignored",
                desc.vertices.len(),
                Vertex::FLOATS
            );
        }
        Ok(Self {
            vertex_array: VertexArray::create(device)?,
            vertices: GpuBuffer::with_data(device, ResourceKind::VertexBuffer, desc.vertices)?,
            indices: GpuBuffer::with_data(device, ResourceKind::IndexBuffer, desc.indices)?,
            material: desc.material,
            render_mode: Primitive::Triangles,
            loaded: false,
        })
    }

    /// Uploads both buffers and configures the vertex array.  Must run
    /// before the first [`draw`](Self::draw); running it again re-uploads.
    pub fn load(&mut self) -> Result<(), GpuError> {
        self.loaded = false;
        self.vertices.upload()?;
        self.indices.upload()?;
        self.vertex_array
            .configure(&self.vertices, &self.indices, &Vertex::LAYOUT)?;
        self.loaded = true;
        Ok(())
    }

    /// Issues the draw with the current program and returns the number of
    /// elements drawn: indices in triangle mode, vertices in point mode.
    /// An empty submesh draws nothing.
    pub fn draw(&self) -> Result<u32, RenderError> {
        if !self.loaded {
            log::error!("submesh {:?} drawn before load", self.vertex_array.id());
            return Err(RenderError::Precondition(
                "submesh drawn before load".to_string(),
            ));
        }
        let count = match self.render_mode {
            Primitive::Triangles => self.index_count() as u32,
            Primitive::Points => self.vertex_count() as u32,
        };
        if count == 0 {
            log::trace!("skipping empty submesh {:?}", self.vertex_array.id());
            return Ok(0);
        }
        match self.render_mode {
            Primitive::Triangles => self.vertex_array.draw(count)?,
            Primitive::Points => self.vertex_array.draw_points(count)?,
        }
        Ok(count)
    }

    pub fn set_render_mode(&mut self, mode: Primitive) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> Primitive {
        self.render_mode
    }

    /// Sets the material index.  Not checked here; the owning mesh checks
    /// it when drawing.
    pub fn set_material_index(&mut self, material: Option<usize>) {
        self.material = material;
    }

    pub fn material_index(&self) -> Option<usize> {
        self.material
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.staging().len() / Vertex::FLOATS
    }

    pub fn index_count(&self) -> usize {
        self.indices.staging().len()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.vertices
                .staging()
                .chunks_exact(Vertex::FLOATS)
                .map(|v| glam::Vec3::new(v[0], v[1], v[2])),
        )
    }

    pub fn vertex_buffer(&self) -> &GpuBuffer<f32> {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &GpuBuffer<u32> {
        &self.indices
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }
}

impl Loadable for Submesh {
    fn load(&mut self, _program: &ShaderProgram) -> Result<(), RenderError> {
        Submesh::load(self).map_err(RenderError::from)
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Drawable for Submesh {
    /// Draws with whatever material state `program` currently holds.
    fn draw(&self, program: &ShaderProgram) -> Result<DrawStats, RenderError> {
        program.use_program()?;
        let elements = Submesh::draw(self)?;
        Ok(DrawStats {
            draw_calls: usize::from(elements > 0),
            elements: elements as u64,
            skipped: 0,
        })
    }
}
