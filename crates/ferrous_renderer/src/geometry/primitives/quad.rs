use ferrous_gpu::Vertex;

use crate::geometry::SubmeshDescriptor;

/// Unit quad in the XY plane facing +Z, spanning -1..1.
pub fn quad() -> SubmeshDescriptor {
    let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
        position: [x, y, 0.0],
        texcoords: [u, v],
        normal: [0.0, 0.0, 1.0],
        tangent: [1.0, 0.0, 0.0],
    };
    let vertices = [
        corner(-1.0, -1.0, 0.0, 1.0),
        corner(1.0, -1.0, 1.0, 1.0),
        corner(1.0, 1.0, 1.0, 0.0),
        corner(-1.0, 1.0, 0.0, 0.0),
    ];
    SubmeshDescriptor::from_quads(&vertices, &[[0, 1, 2, 3]])
}
