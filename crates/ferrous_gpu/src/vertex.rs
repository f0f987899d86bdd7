/// GPU vertex type shared by every built-in program.
///
/// Position, texture coordinates, normal and tangent are packed as plain
/// `f32` arrays so that `bytemuck` can reinterpret a slice of vertices as the
/// flat float stream the geometry source hands over.  The matching WGSL
/// attribute locations are declared in the renderer's `common.vert.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    pub texcoords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
}

/// One attribute inside an interleaved vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// Interleaved layout of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices.
    pub stride: u32,
    pub attributes: &'static [VertexAttribute],
}

impl Vertex {
    /// Number of floats per vertex in the flat stream.
    pub const FLOATS: usize = std::mem::size_of::<Vertex>() / std::mem::size_of::<f32>();

    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: std::mem::size_of::<Vertex>() as u32,
        attributes: &[
            // @location(0) position
            VertexAttribute { location: 0, components: 3, offset: 0 },
            // @location(1) texcoords
            VertexAttribute { location: 1, components: 2, offset: 12 },
            // @location(2) normal
            VertexAttribute { location: 2, components: 3, offset: 20 },
            // @location(3) tangent
            VertexAttribute { location: 3, components: 3, offset: 32 },
        ],
    };

    /// Vertex with only a position; the other attributes are zero.
    pub fn at(position: [f32; 3]) -> Self {
        Self { position, ..Default::default() }
    }

    /// Reinterprets vertices as the flat float stream submeshes store.
    pub fn flatten(vertices: &[Vertex]) -> Vec<f32> {
        bytemuck::cast_slice(vertices).to_vec()
    }
}

#[cfg(feature = "wgpu")]
impl VertexLayout {
    /// wgpu attributes matching this layout.
    pub(crate) fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: match a.components {
                    1 => wgpu::VertexFormat::Float32,
                    2 => wgpu::VertexFormat::Float32x2,
                    3 => wgpu::VertexFormat::Float32x3,
                    _ => wgpu::VertexFormat::Float32x4,
                },
                offset: a.offset as wgpu::BufferAddress,
                shader_location: a.location,
            })
            .collect()
    }
}
