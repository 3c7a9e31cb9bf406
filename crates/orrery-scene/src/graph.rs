//! The fixed planet / ring / moon scene graph.
//!
//! The hierarchy is
//!
//! ```text
//! root
//! ├── planet
//! ├── ring
//! └── moon_orbit
//!     └── moon
//! ```
//!
//! `ring` and `moon_orbit` always share the planet's translation. Fields are
//! private so that invariant can only be changed through
//! [`SceneGraph::set_planet_position`].

use glam::{Mat4, Quat, Vec3};

use crate::bounds::{Aabb, BoundingSphere};
use crate::mesh::MeshShape;

/// Translation, rotation and scale of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface parameters for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGB base colour.
    pub base_color: [f32; 3],
    /// 0 is mirror-like, 1 is fully diffuse.
    pub roughness: f32,
    /// Fraction of the base colour emitted regardless of lighting.
    pub emissive: f32,
}

/// A renderable node payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub shape: MeshShape,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub transform: Transform,
    pub body: Option<Body>,
}

/// Identifies one of the five nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Root,
    Planet,
    Ring,
    MoonOrbit,
    Moon,
}

impl NodeId {
    /// Nodes that carry a [`Body`], in draw order.
    pub const BODIES: [NodeId; 3] = [NodeId::Planet, NodeId::Ring, NodeId::Moon];
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    root: SceneNode,
    planet: SceneNode,
    ring: SceneNode,
    moon_orbit: SceneNode,
    moon: SceneNode,
}

impl SceneGraph {
    /// Assemble the graph. The ring and moon orbit are snapped to the planet's
    /// translation whatever their transforms say.
    pub fn new(
        planet: (Transform, Body),
        ring: (Transform, Body),
        moon_orbit: Transform,
        moon: (Transform, Body),
    ) -> Self {
        let mut graph = Self {
            root: SceneNode {
                transform: Transform::IDENTITY,
                body: None,
            },
            planet: SceneNode {
                transform: planet.0,
                body: Some(planet.1),
            },
            ring: SceneNode {
                transform: ring.0,
                body: Some(ring.1),
            },
            moon_orbit: SceneNode {
                transform: moon_orbit,
                body: None,
            },
            moon: SceneNode {
                transform: moon.0,
                body: Some(moon.1),
            },
        };
        graph.set_planet_position(planet.0.translation);
        graph
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        match id {
            NodeId::Root => &self.root,
            NodeId::Planet => &self.planet,
            NodeId::Ring => &self.ring,
            NodeId::MoonOrbit => &self.moon_orbit,
            NodeId::Moon => &self.moon,
        }
    }

    /// Move the planet together with the ring and the moon orbit.
    pub fn set_planet_position(&mut self, position: Vec3) {
        self.planet.transform.translation = position;
        self.ring.transform.translation = position;
        self.moon_orbit.transform.translation = position;
    }

    pub fn planet_position(&self) -> Vec3 {
        self.planet.transform.translation
    }

    pub fn set_moon_orbit_rotation(&mut self, rotation: Quat) {
        self.moon_orbit.transform.rotation = rotation;
    }

    pub fn moon_orbit_rotation(&self) -> Quat {
        self.moon_orbit.transform.rotation
    }

    /// Vertical offset of the moon inside the orbit node.
    pub fn set_moon_height(&mut self, y: f32) {
        self.moon.transform.translation.y = y;
    }

    pub fn moon_height(&self) -> f32 {
        self.moon.transform.translation.y
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let root = self.root.transform.matrix();
        match id {
            NodeId::Root => root,
            NodeId::Planet => root * self.planet.transform.matrix(),
            NodeId::Ring => root * self.ring.transform.matrix(),
            NodeId::MoonOrbit => root * self.moon_orbit.transform.matrix(),
            NodeId::Moon => {
                root * self.moon_orbit.transform.matrix() * self.moon.transform.matrix()
            }
        }
    }

    /// Every body with its world matrix, in draw order.
    pub fn bodies(&self) -> impl Iterator<Item = (NodeId, &Body, Mat4)> + '_ {
        NodeId::BODIES.into_iter().filter_map(move |id| {
            self.node(id)
                .body
                .as_ref()
                .map(|body| (id, body, self.world_matrix(id)))
        })
    }

    /// Union of every body's local box carried into world space.
    pub fn world_bounds(&self) -> Aabb {
        self.bodies().fold(Aabb::EMPTY, |acc, (_, body, world)| {
            acc.union(&body.shape.local_bounds().transformed(&world))
        })
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.world_bounds().bounding_sphere()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(shape: MeshShape) -> Body {
        Body {
            shape,
            material: Material {
                base_color: [1.0; 3],
                roughness: 1.0,
                emissive: 0.0,
            },
        }
    }

    fn sphere(radius: f32) -> MeshShape {
        MeshShape::Sphere {
            radius,
            subdivisions: 1,
        }
    }

    fn test_graph() -> SceneGraph {
        SceneGraph::new(
            (Transform::IDENTITY, body(sphere(1.0))),
            (
                Transform::from_translation(Vec3::new(9.0, 9.0, 9.0)),
                body(MeshShape::Ring {
                    inner_radius: 1.5,
                    outer_radius: 2.0,
                    segments: 16,
                }),
            ),
            Transform::IDENTITY,
            (
                Transform::from_translation(Vec3::new(3.0, 0.0, 0.0)),
                body(sphere(0.5)),
            ),
        )
    }

    #[test]
    fn test_new_snaps_children_to_planet() {
        let graph = test_graph();
        assert_eq!(graph.node(NodeId::Ring).transform.translation, Vec3::ZERO);
        assert_eq!(
            graph.node(NodeId::MoonOrbit).transform.translation,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_set_planet_position_moves_group() {
        let mut graph = test_graph();
        let pos = Vec3::new(1.0, -2.0, 0.5);
        graph.set_planet_position(pos);
        for id in [NodeId::Planet, NodeId::Ring, NodeId::MoonOrbit] {
            assert_eq!(graph.node(id).transform.translation, pos);
        }
        let moon = graph.world_matrix(NodeId::Moon).transform_point3(Vec3::ZERO);
        assert!((moon - Vec3::new(4.0, -2.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_moon_follows_orbit_rotation() {
        let mut graph = test_graph();
        graph.set_moon_orbit_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let moon = graph.world_matrix(NodeId::Moon).transform_point3(Vec3::ZERO);
        // +X rotated a quarter turn about Y lands on -Z
        assert!((moon - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5, "{moon}");
    }

    #[test]
    fn test_bodies_in_draw_order() {
        let graph = test_graph();
        let ids: Vec<NodeId> = graph.bodies().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![NodeId::Planet, NodeId::Ring, NodeId::Moon]);
    }

    #[test]
    fn test_world_bounds_cover_all_bodies() {
        let graph = test_graph();
        let bounds = graph.world_bounds();
        assert!((bounds.max.x - 3.5).abs() < 1e-5);
        assert!((bounds.min.x + 2.0).abs() < 1e-5);
        assert!((bounds.max.y - 1.0).abs() < 1e-5);
        let sphere = graph.bounding_sphere();
        for id in NodeId::BODIES {
            let p = graph.world_matrix(id).transform_point3(Vec3::ZERO);
            assert!((p - sphere.center).length() <= sphere.radius);
        }
    }
}
