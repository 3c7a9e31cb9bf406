//! Camera state for view and projection matrix generation.

use glam::{Mat4, Vec3};

use crate::bounds::Frustum;

/// Perspective camera that always looks at a target point.
///
/// Invariants: `near < far`, and `aspect_ratio` tracks the container's
/// width / height. The projection is derived on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up hint.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl CameraState {
    /// Update the aspect ratio from a pixel size. Zero-area sizes are ignored
    /// so the ratio never becomes 0, infinite or NaN.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect_ratio = width as f32 / height as f32;
        true
    }

    /// Unit vector from the eye to the target, or -Z when they coincide.
    pub fn view_direction(&self) -> Vec3 {
        let dir = (self.target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::NEG_Z } else { dir }
    }

    /// Horizontal field of view derived from the vertical one and the aspect.
    pub fn horizontal_fov(&self) -> f32 {
        2.0 * ((self.fov_y * 0.5).tan() * self.aspect_ratio).atan()
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.view_direction();
        // look_at degenerates when looking straight along the up hint
        let up = if forward.cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.position + forward, up)
    }

    /// Projection matrix with reverse-Z: near maps to depth 1, far to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection_matrix())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
