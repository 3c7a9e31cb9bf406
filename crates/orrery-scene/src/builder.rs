//! Construction of the fixed scene.
//!
//! Mesh resolution, colours and material properties are constants here and
//! not configurable at call time. Only the clear colour and the pixel-ratio
//! cap come from the caller.

use glam::{Quat, Vec3};

use crate::animation::MOON_BASELINE_Y;
use crate::camera::CameraState;
use crate::color::Rgba;
use crate::graph::{Body, Material, SceneGraph, Transform};
use crate::mesh::MeshShape;
use crate::viewport::{
    DEFAULT_PIXEL_RATIO_CAP, ViewportSize, effective_pixel_ratio, render_resolution,
};

pub const PLANET_RADIUS: f32 = 1.0;
pub const SPHERE_SUBDIVISIONS: u32 = 4;
pub const RING_INNER_RADIUS: f32 = 1.35;
pub const RING_OUTER_RADIUS: f32 = 2.1;
pub const RING_SEGMENTS: u32 = 128;
pub const RING_TILT_X: f32 = 0.45;
pub const RING_TILT_Z: f32 = 0.2;
pub const MOON_RADIUS: f32 = 0.27;
pub const MOON_ORBIT_DISTANCE: f32 = 2.6;

pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 1.2, 6.0);
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

const PLANET_MATERIAL: Material = Material {
    base_color: [0.18, 0.32, 0.62],
    roughness: 0.75,
    emissive: 0.02,
};

const RING_MATERIAL: Material = Material {
    base_color: [0.72, 0.62, 0.45],
    roughness: 0.55,
    emissive: 0.08,
};

const MOON_MATERIAL: Material = Material {
    base_color: [0.68, 0.68, 0.7],
    roughness: 0.95,
    emissive: 0.0,
};

/// Ambient term applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Light arriving from infinitely far along `-direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing from the light into the scene.
    pub direction: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// The scene's constant lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub rim: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: [0.6, 0.65, 0.8],
                intensity: 0.18,
            },
            key: DirectionalLight {
                direction: Vec3::new(-0.6, -0.35, -0.7).normalize(),
                color: [1.0, 0.96, 0.9],
                intensity: 1.1,
            },
            rim: DirectionalLight {
                direction: Vec3::new(0.7, 0.2, 0.8).normalize(),
                color: [0.45, 0.55, 1.0],
                intensity: 0.5,
            },
        }
    }
}

/// Everything the panel needs after construction.
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub graph: SceneGraph,
    pub camera: CameraState,
    pub lights: LightRig,
    pub clear_color: Rgba,
    /// Container size the scene was built for, in physical pixels.
    pub size: ViewportSize,
    /// Offscreen render resolution after pixel-ratio capping.
    pub render_size: ViewportSize,
    /// Effective (capped) pixel ratio.
    pub pixel_ratio: f64,
    /// Pixel-ratio cap used to derive `pixel_ratio`.
    pub pixel_ratio_cap: f64,
}

/// Builds the planet / ring / moon scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBuilder {
    clear_color: Rgba,
    pixel_ratio_cap: f64,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new(Rgba::from_rgba8(0x10, 0x10, 0x10, 0xff), DEFAULT_PIXEL_RATIO_CAP)
    }
}

impl SceneBuilder {
    pub fn new(clear_color: Rgba, pixel_ratio_cap: f64) -> Self {
        Self {
            clear_color,
            pixel_ratio_cap,
        }
    }

    /// The fixed scene graph, with the moon at angle zero.
    pub fn scene_graph() -> SceneGraph {
        let sphere = |radius| MeshShape::Sphere {
            radius,
            subdivisions: SPHERE_SUBDIVISIONS,
        };

        let planet = Body {
            shape: sphere(PLANET_RADIUS),
            material: PLANET_MATERIAL,
        };
        let ring = Body {
            shape: MeshShape::Ring {
                inner_radius: RING_INNER_RADIUS,
                outer_radius: RING_OUTER_RADIUS,
                segments: RING_SEGMENTS,
            },
            material: RING_MATERIAL,
        };
        let moon = Body {
            shape: sphere(MOON_RADIUS),
            material: MOON_MATERIAL,
        };

        let ring_tilt = Quat::from_rotation_z(RING_TILT_Z) * Quat::from_rotation_x(RING_TILT_X);

        SceneGraph::new(
            (Transform::IDENTITY, planet),
            (Transform::IDENTITY.with_rotation(ring_tilt), ring),
            Transform::IDENTITY,
            (
                Transform::from_translation(Vec3::new(MOON_ORBIT_DISTANCE, MOON_BASELINE_Y, 0.0)),
                moon,
            ),
        )
    }

    /// Camera at its starting pose, aspect taken from `size` when non-empty.
    pub fn initial_camera(size: ViewportSize) -> CameraState {
        CameraState {
            position: CAMERA_START,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: CAMERA_FOV_Y,
            aspect_ratio: size.aspect_ratio().unwrap_or(1.0),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    /// Build the scene for a container of `size` physical pixels.
    pub fn build(&self, size: ViewportSize, device_pixel_ratio: f64) -> SceneSetup {
        SceneSetup {
            graph: Self::scene_graph(),
            camera: Self::initial_camera(size),
            lights: LightRig::default(),
            clear_color: self.clear_color,
            size,
            render_size: render_resolution(size, device_pixel_ratio, self.pixel_ratio_cap),
            pixel_ratio: effective_pixel_ratio(device_pixel_ratio, self.pixel_ratio_cap),
            pixel_ratio_cap: self.pixel_ratio_cap,
        }
    }
}
