//! Camera auto-framing.
//!
//! The fitter moves the camera along its current view direction until the
//! scene's bounding sphere fits both the vertical and the horizontal field of
//! view, then pads that distance and derives near/far planes around the
//! sphere.

use glam::Vec3;

use crate::bounds::BoundingSphere;
use crate::camera::CameraState;
use crate::graph::SceneGraph;

/// Padding multiplier used when none is configured.
pub const DEFAULT_FIT_PADDING: f32 = 1.15;

/// Lower bound for the near plane.
pub const MIN_NEAR: f32 = 0.1;

/// Smallest radius the fitter works with, so degenerate scenes still get a
/// usable depth range.
const MIN_RADIUS: f32 = 1e-3;

/// Outcome of one fit, already written into the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

/// Frames a bounding sphere in the camera's view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFitter {
    padding: f32,
}

impl Default for ViewportFitter {
    fn default() -> Self {
        Self {
            padding: DEFAULT_FIT_PADDING,
        }
    }
}

impl ViewportFitter {
    /// Padding below 1.0 is accepted but no longer guarantees the whole
    /// sphere is visible.
    pub fn new(padding: f32) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Unpadded distance from the sphere centre at which a sphere of `radius`
    /// touches the tighter pair of frustum side planes.
    ///
    /// A sphere at distance `d` is tangent to a plane through the eye at half
    /// angle `a` from the axis when `d·sin(a) = radius`. This replaces the
    /// common `radius / tan(a)` estimate, which lets the sphere clip the edges.
    pub fn required_distance(radius: f32, fov_y: f32, aspect_ratio: f32) -> f32 {
        let half_v = fov_y * 0.5;
        let half_h = (half_v.tan() * aspect_ratio).atan();
        let vertical = radius / half_v.sin();
        let horizontal = radius / half_h.sin();
        vertical.max(horizontal)
    }

    /// Place `camera` so `sphere` is framed, preserving the view direction.
    pub fn fit(&self, camera: &mut CameraState, sphere: BoundingSphere) -> FitResult {
        let radius = sphere.radius.max(MIN_RADIUS);
        let distance =
            Self::required_distance(radius, camera.fov_y, camera.aspect_ratio) * self.padding;

        let mut direction = (sphere.center - camera.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = Vec3::NEG_Z;
        }

        let near = (distance - 2.0 * radius).max(MIN_NEAR);
        let far = (distance + 4.0 * radius).max(near * 2.0);

        camera.position = sphere.center - direction * distance;
        camera.target = sphere.center;
        camera.near = near;
        camera.far = far;

        FitResult {
            distance,
            near,
            far,
        }
    }

    /// Fit the camera to the whole scene graph.
    pub fn fit_scene(&self, camera: &mut CameraState, graph: &SceneGraph) -> FitResult {
        self.fit(camera, graph.bounding_sphere())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECTS: [f32; 9] = [0.2, 0.5, 0.75, 1.0, 4.0 / 3.0, 16.0 / 9.0, 2.5, 4.0, 10.0];
    const PADDINGS: [f32; 4] = [1.0, 1.05, 1.15, 2.0];

    fn sphere() -> BoundingSphere {
        BoundingSphere {
            center: Vec3::new(0.3, 0.4, -0.2),
            radius: 2.9,
        }
    }

    fn camera(aspect_ratio: f32) -> CameraState {
        CameraState {
            position: Vec3::new(0.0, 1.2, 6.0),
            aspect_ratio,
            ..Default::default()
        }
    }

    #[test]
    fn test_sphere_inside_frustum_for_all_aspects() {
        for aspect in ASPECTS {
            for padding in PADDINGS {
                let mut cam = camera(aspect);
                ViewportFitter::new(padding).fit(&mut cam, sphere());
                assert!(
                    cam.frustum().contains_sphere(&sphere()),
                    "sphere clipped at aspect {aspect}, padding {padding}"
                );
            }
        }
    }

    #[test]
    fn test_sphere_strictly_between_near_and_far() {
        for aspect in ASPECTS {
            for padding in PADDINGS {
                let mut cam = camera(aspect);
                let s = sphere();
                let fit = ViewportFitter::new(padding).fit(&mut cam, s);
                let depth = (s.center - cam.position).length();
                assert!(fit.near < fit.far);
                assert!(depth - s.radius > fit.near, "near clips at {aspect}/{padding}");
                assert!(depth + s.radius < fit.far, "far clips at {aspect}/{padding}");
            }
        }
    }

    #[test]
    fn test_preserves_view_direction() {
        let mut cam = camera(1.0);
        let s = sphere();
        let before = (s.center - cam.position).normalize();
        ViewportFitter::default().fit(&mut cam, s);
        let after = (s.center - cam.position).normalize();
        assert!(before.dot(after) > 0.99999);
        assert_eq!(cam.target, s.center);
    }

    #[test]
    fn test_camera_at_centre_falls_back_to_positive_z_side() {
        let s = sphere();
        let mut cam = CameraState {
            position: s.center,
            ..camera(1.0)
        };
        let fit = ViewportFitter::default().fit(&mut cam, s);
        let offset = cam.position - s.center;
        assert!((offset - Vec3::Z * fit.distance).length() < 1e-4);
    }

    #[test]
    fn test_padding_scales_distance() {
        let mut a = camera(1.0);
        let mut b = camera(1.0);
        let base = ViewportFitter::new(1.0).fit(&mut a, sphere()).distance;
        let padded = ViewportFitter::new(1.15).fit(&mut b, sphere()).distance;
        assert!((padded / base - 1.15).abs() < 1e-5);
    }

    #[test]
    fn test_tangent_distance_exceeds_tan_estimate() {
        let fov = std::f32::consts::FRAC_PI_4;
        let exact = ViewportFitter::required_distance(1.0, fov, 1.0);
        let estimate = 1.0 / (fov * 0.5).tan();
        assert!((exact - 1.0 / (fov * 0.5).sin()).abs() < 1e-6);
        assert!(exact > estimate);
        assert!((exact / estimate - 1.082).abs() < 1e-3);
    }

    #[test]
    fn test_portrait_is_width_bound() {
        let fov = std::f32::consts::FRAC_PI_4;
        let square = ViewportFitter::required_distance(1.0, fov, 1.0);
        let portrait = ViewportFitter::required_distance(1.0, fov, 0.5);
        let landscape = ViewportFitter::required_distance(1.0, fov, 2.0);
        assert!(portrait > square);
        assert!((landscape - square).abs() < 1e-6, "landscape stays height bound");
    }

    #[test]
    fn test_near_and_far_formula() {
        let mut cam = camera(1.0);
        let s = sphere();
        let fit = ViewportFitter::default().fit(&mut cam, s);
        assert!((fit.near - (fit.distance - 2.0 * s.radius).max(MIN_NEAR)).abs() < 1e-6);
        assert!((fit.far - (fit.distance + 4.0 * s.radius)).abs() < 1e-5);
        assert_eq!(cam.near, fit.near);
        assert_eq!(cam.far, fit.far);
    }

    #[test]
    fn test_zero_radius_keeps_valid_depth_range() {
        let mut cam = camera(1.0);
        let fit = ViewportFitter::default().fit(
            &mut cam,
            BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            },
        );
        assert!(fit.near < fit.far);
        assert!(cam.position.is_finite());
    }
}
