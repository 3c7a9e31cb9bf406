//! Collaborator traits implemented by the host and the GPU backend.

use std::error::Error;

use orrery_scene::{CameraState, SceneGraph, SceneSetup, ViewportSize};

/// A per-frame render failure.
pub trait RenderFault: Error + Send + Sync + 'static {
    /// Fatal faults end the panel's life (the host should exit). Others skip
    /// one frame and leave scheduling untouched.
    fn is_fatal(&self) -> bool;
}

/// The exclusively owned render resource: surface, device and GPU buffers.
pub trait RenderBackend {
    type Error: RenderFault;

    /// Draw the scene as seen from `camera`.
    fn render(&mut self, graph: &SceneGraph, camera: &CameraState) -> Result<(), Self::Error>;

    /// Match a new container size in physical pixels. `render_size` is the
    /// offscreen resolution after pixel-ratio capping.
    fn resize(&mut self, size: ViewportSize, render_size: ViewportSize);

    /// Release every GPU resource. Consuming `self` makes a second release
    /// impossible.
    fn dispose(self);
}

/// The element hosting the panel.
pub trait Container {
    type Backend: RenderBackend;
    type Error: Error + Send + Sync + 'static;

    /// Current drawable size in physical pixels, or `None` when the container
    /// is gone.
    fn size(&self) -> Option<ViewportSize>;

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f64;

    /// Create and host a renderable surface for `setup`.
    fn create_surface(&mut self, setup: &SceneSetup) -> Result<Self::Backend, Self::Error>;
}
