use ferrous_gpu::Vertex;
use glam::Vec3;

use crate::geometry::SubmeshDescriptor;

/// Unit cube centred at the origin, spanning -1..1 on every axis.
///
/// Each face has its own four vertices so normals and tangents stay flat:
/// 24 vertices, 12 triangles.
pub fn cube() -> SubmeshDescriptor {
    // (outward normal, tangent); the bitangent is normal × tangent so
    // corners listed in tangent/bitangent order wind counter-clockwise
    const FACES: [([f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),   // front  (z+)
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]), // back   (z-)
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),  // right  (x+)
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),  // left   (x-)
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),   // top    (y+)
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),  // bottom (y-)
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut quads = Vec::with_capacity(6);
    for (normal, tangent) in FACES {
        let n = Vec3::from(normal);
        let t = Vec3::from(tangent);
        let b = n.cross(t);
        let base = vertices.len() as u32;
        for (u, v) in CORNERS {
            vertices.push(Vertex {
                position: (n + t * u + b * v).to_array(),
                texcoords: [(u + 1.0) * 0.5, (1.0 - v) * 0.5],
                normal,
                tangent,
            });
        }
        quads.push([base, base + 1, base + 2, base + 3]);
    }
    SubmeshDescriptor::from_quads(&vertices, &quads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_counts() {
        let desc = cube();
        assert_eq!(desc.vertex_count(), 24);
        assert_eq!(desc.index_count() / 3, 12);
        let bounds = desc.bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(1.0));
    }

    #[test]
    fn faces_wind_outwards() {
        let desc = cube();
        let position = |i: u32| {
            let v = &desc.vertices[i as usize * Vertex::FLOATS..];
            Vec3::new(v[0], v[1], v[2])
        };
        for tri in desc.indices.chunks_exact(3) {
            let (a, b, c) = (position(tri[0]), position(tri[1]), position(tri[2]));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }
}
