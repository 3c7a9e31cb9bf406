//! Bounding volumes and view-frustum containment.

use glam::{Mat4, Vec3, Vec4};

/// Axis-aligned bounding box in f32 world or local space.
///
/// An empty box has `min > max` on every axis; unioning anything into it
/// yields the other operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The empty box, identity element for [`union`](Self::union).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from two corners, sorting components so `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point. Empty for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |aabb, p| aabb.expanded_to(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box so it contains `p`.
    pub fn expanded_to(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The eight corners, in no particular winding.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box around this box after an affine transform.
    ///
    /// Transforming the corners is conservative: the result always contains
    /// the transformed geometry, though it may be looser than a box computed
    /// from the vertices themselves.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::from_points(self.corners().iter().map(|&c| matrix.transform_point3(c)))
    }

    /// Sphere centred on the box with radius equal to the half diagonal.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.is_empty() {
            return BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        BoundingSphere {
            center: self.center(),
            radius: self.size().length() * 0.5,
        }
    }
}

/// A sphere used for camera auto-framing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Relative slack for containment tests, so a sphere fitted exactly tangent
/// to a plane still counts as inside.
const CONTAINMENT_EPSILON: f32 = 1e-4;

/// Six clip planes extracted from a reverse-Z view-projection matrix.
///
/// Each plane is `(normal, d)` with the normal pointing into the frustum and
/// normalized, so `dot(normal, p) + d` is the signed distance of `p`.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract planes from a matrix that maps the near plane to depth 1 and
    /// the far plane to depth 0 (the `0 <= z <= w` clip volume).
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        let planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r3 - r2, // near (z <= w)
            r2,      // far (z >= 0)
        ]
        .map(|p| {
            let len = p.truncate().length();
            if len > 0.0 { p / len } else { p }
        });

        Self { planes }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// Signed distance from `point` to each plane, positive inside.
    pub fn distances(&self, point: Vec3) -> [f32; 6] {
        self.planes.map(|p| p.truncate().dot(point) + p.w)
    }

    /// Whether the point lies inside or on every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.distances(point).iter().all(|&d| d >= 0.0)
    }

    /// Whether the whole sphere lies inside the frustum.
    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> bool {
        let slack = CONTAINMENT_EPSILON * sphere.radius.max(1.0);
        self.distances(sphere.center)
            .iter()
            .all(|&d| d >= sphere.radius - slack)
    }
}
