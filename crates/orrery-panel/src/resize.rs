//! Container resize handling.

use orrery_scene::{CameraState, FitResult, SceneGraph, ViewportFitter, ViewportSize};
use tracing::debug;

/// Result of offering a size to the [`ResizeCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// No container, or a zero-area size. Nothing changed.
    Ignored,
    /// Same size and pixel ratio as last time.
    Unchanged,
    /// Camera aspect updated and the scene re-fitted.
    Resized { size: ViewportSize, fit: FitResult },
}

/// Tracks the last applied size and re-frames the camera when it changes.
#[derive(Debug, Clone)]
pub struct ResizeCoordinator {
    size: ViewportSize,
    device_pixel_ratio: f64,
}

impl ResizeCoordinator {
    pub fn new(size: ViewportSize, device_pixel_ratio: f64) -> Self {
        Self {
            size,
            device_pixel_ratio,
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Apply a new container size. The scheduler is not involved: a resize
    /// neither starts nor stops animation.
    pub fn apply(
        &mut self,
        size: Option<ViewportSize>,
        device_pixel_ratio: f64,
        camera: &mut CameraState,
        fitter: &ViewportFitter,
        graph: &SceneGraph,
    ) -> ResizeOutcome {
        let Some(size) = size.filter(|s| !s.is_empty()) else {
            debug!(?size, "Ignoring resize without a drawable area");
            return ResizeOutcome::Ignored;
        };
        if size == self.size && device_pixel_ratio == self.device_pixel_ratio {
            return ResizeOutcome::Unchanged;
        }

        self.size = size;
        self.device_pixel_ratio = device_pixel_ratio;
        camera.set_aspect_ratio(size.width, size.height);
        let fit = fitter.fit_scene(camera, graph);
        debug!(
            width = size.width,
            height = size.height,
            device_pixel_ratio,
            distance = fit.distance,
            "Resized"
        );
        ResizeOutcome::Resized { size, fit }
    }
}
