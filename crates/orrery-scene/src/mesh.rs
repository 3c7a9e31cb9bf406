//! Procedural meshes for the planet, moon and ring.

use std::collections::HashMap;

use glam::Vec3;

use crate::bounds::Aabb;

/// CPU-side triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Tight box around the vertex positions.
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }
}

/// Geometry of one scene body, in the body's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    /// Icosphere centred on the origin.
    Sphere { radius: f32, subdivisions: u32 },
    /// Flat annulus in the local XZ plane, facing +Y.
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
    },
}

impl MeshShape {
    /// Generate the triangle mesh for this shape.
    pub fn mesh(&self) -> MeshData {
        match *self {
            MeshShape::Sphere {
                radius,
                subdivisions,
            } => generate_icosphere(radius, subdivisions),
            MeshShape::Ring {
                inner_radius,
                outer_radius,
                segments,
            } => generate_ring(inner_radius, outer_radius, segments),
        }
    }

    /// Analytic local-space box. Contains every vertex [`mesh`](Self::mesh)
    /// produces, without generating it.
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            MeshShape::Sphere { radius, .. } => {
                Aabb::new(Vec3::splat(-radius), Vec3::splat(radius))
            }
            MeshShape::Ring { outer_radius, .. } => Aabb::new(
                Vec3::new(-outer_radius, 0.0, -outer_radius),
                Vec3::new(outer_radius, 0.0, outer_radius),
            ),
        }
    }
}

/// Generate an icosphere of the given radius.
///
/// Each subdivision splits every triangle into four, so the triangle count is
/// `20 * 4^subdivisions`. Normals point outward; UVs are equirectangular.
pub fn generate_icosphere(radius: f32, subdivisions: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut directions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|v| v.normalize())
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        indices = split_triangles(&mut directions, &indices);
    }

    let uvs = directions
        .iter()
        .map(|d| {
            let u = 0.5 + d.z.atan2(d.x) / std::f32::consts::TAU;
            let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
            [u, v]
        })
        .collect();
    let positions = directions.iter().map(|d| *d * radius).collect();

    MeshData {
        positions,
        normals: directions,
        uvs,
        indices,
    }
}

/// Split each triangle into four through its edge midpoints, projected back
/// onto the unit sphere. Shared edges reuse one midpoint vertex.
fn split_triangles(directions: &mut Vec<Vec3>, indices: &[u32]) -> Vec<u32> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut next = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, dirs: &mut Vec<Vec3>| -> u32 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            dirs.push((dirs[a as usize] + dirs[b as usize]).normalize());
            (dirs.len() - 1) as u32
        })
    };

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, directions);
        let bc = midpoint(b, c, directions);
        let ca = midpoint(c, a, directions);

        next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
    }

    next
}

/// Generate a flat annulus in the XZ plane with `segments` quads around it.
///
/// Every vertex lies between `inner_radius` and `outer_radius` from the
/// origin. U runs around the ring, V from inner (0) to outer (1) edge. The
/// seam duplicates the first column so UVs do not wrap.
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let columns = segments + 1;

    let mut mesh = MeshData {
        positions: Vec::with_capacity(columns as usize * 2),
        normals: Vec::with_capacity(columns as usize * 2),
        uvs: Vec::with_capacity(columns as usize * 2),
        indices: Vec::with_capacity(segments as usize * 6),
    };

    for i in 0..columns {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * std::f32::consts::TAU).sin_cos();
        let dir = Vec3::new(cos, 0.0, sin);

        mesh.positions.push(dir * inner_radius);
        mesh.positions.push(dir * outer_radius);
        mesh.normals.extend_from_slice(&[Vec3::Y, Vec3::Y]);
        mesh.uvs.extend_from_slice(&[[u, 0.0], [u, 1.0]]);
    }

    for i in 0..segments {
        let inner = i * 2;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        // counter-clockwise seen from +Y
        mesh.indices
            .extend_from_slice(&[inner, next_outer, outer, inner, next_inner, next_outer]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosphere_vertices_on_radius() {
        let mesh = generate_icosphere(2.5, 3);
        for pos in &mesh.positions {
            assert!(
                (pos.length() - 2.5).abs() < 1e-5,
                "vertex off the sphere: length = {}",
                pos.length()
            );
        }
    }

    #[test]
    fn test_icosphere_triangle_count() {
        for subdivisions in 0..4 {
            let mesh = generate_icosphere(1.0, subdivisions);
            assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(subdivisions));
        }
    }

    #[test]
    fn test_icosphere_is_closed() {
        // Euler characteristic of a sphere: V - E + F = 2
        let mesh = generate_icosphere(1.0, 2);
        let faces = mesh.triangle_count() as i64;
        let edges = faces * 3 / 2;
        assert_eq!(mesh.vertex_count() as i64 - edges + faces, 2);
    }

    #[test]
    fn test_icosphere_indices_valid() {
        let mesh = generate_icosphere(1.0, 3);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
    }

    #[test]
    fn test_icosphere_normals_point_outward() {
        let mesh = generate_icosphere(3.0, 1);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(p.normalize().dot(*n) > 0.9999);
        }
    }

    #[test]
    fn test_ring_vertices_within_radii() {
        let mesh = generate_ring(1.35, 2.1, 64);
        for pos in &mesh.positions {
            let r = pos.length();
            assert!(r >= 1.35 - 1e-5 && r <= 2.1 + 1e-5, "radius {r}");
            assert_eq!(pos.y, 0.0);
        }
    }

    #[test]
    fn test_ring_topology() {
        let mesh = generate_ring(1.0, 2.0, 32);
        assert_eq!(mesh.vertex_count(), 33 * 2);
        assert_eq!(mesh.triangle_count(), 64);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_ring_faces_up() {
        let mesh = generate_ring(1.0, 2.0, 16);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0, "triangle wound away from +Y");
        }
    }

    #[test]
    fn test_shape_bounds_contain_mesh() {
        let shapes = [
            MeshShape::Sphere {
                radius: 0.27,
                subdivisions: 3,
            },
            MeshShape::Ring {
                inner_radius: 1.35,
                outer_radius: 2.1,
                segments: 96,
            },
        ];
        for shape in shapes {
            let analytic = shape.local_bounds();
            let tight = shape.mesh().local_bounds();
            assert!(tight.min.cmpge(analytic.min - 1e-5).all(), "{shape:?}");
            assert!(tight.max.cmple(analytic.max + 1e-5).all(), "{shape:?}");
        }
    }
}
