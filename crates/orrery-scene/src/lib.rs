//! Scene model for the Orrery panel.
//!
//! Everything here is pure state and math: the fixed planet/ring/moon scene
//! graph, the camera, bounds and frustum helpers, mesh generation, the camera
//! auto-framing fitter, and the per-tick animation driver. Nothing in this
//! crate touches the GPU or the platform.

pub mod animation;
pub mod bounds;
pub mod builder;
pub mod camera;
pub mod color;
pub mod fit;
pub mod graph;
pub mod mesh;
pub mod viewport;

pub use animation::{AnimationDriver, MOON_BASELINE_Y, MOON_BOB_AMPLITUDE, ORBIT_STEP, OrbitAngle};
pub use bounds::{Aabb, BoundingSphere, Frustum};
pub use builder::{AmbientLight, DirectionalLight, LightRig, SceneBuilder, SceneSetup};
pub use camera::CameraState;
pub use color::{ColorError, Rgba};
pub use fit::{DEFAULT_FIT_PADDING, FitResult, ViewportFitter};
pub use graph::{Body, Material, NodeId, SceneGraph, SceneNode, Transform};
pub use mesh::{MeshData, MeshShape, generate_icosphere, generate_ring};
pub use viewport::{DEFAULT_PIXEL_RATIO_CAP, ViewportSize, effective_pixel_ratio, render_resolution};
