//! The window as a panel [`Container`].

use std::sync::Arc;

use orrery_panel::{Container, FrameQueue};
use orrery_render::{RenderContextError, SceneRenderer, init_render_context_blocking};
use orrery_scene::{SceneSetup, ViewportSize};
use winit::window::Window;

/// Hosts the panel in a winit window.
pub struct WindowContainer {
    window: Arc<Window>,
}

impl WindowContainer {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// A frame queue whose requests ask the window for a redraw, delivered
    /// back as `RedrawRequested`.
    pub fn frame_queue(&self) -> FrameQueue {
        let window = Arc::clone(&self.window);
        FrameQueue::with_waker(move || window.request_redraw())
    }
}

impl Container for WindowContainer {
    type Backend = SceneRenderer;
    type Error = RenderContextError;

    fn size(&self) -> Option<ViewportSize> {
        let size = self.window.inner_size();
        Some(ViewportSize::new(size.width, size.height))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn create_surface(&mut self, setup: &SceneSetup) -> Result<SceneRenderer, RenderContextError> {
        let context = init_render_context_blocking(Arc::clone(&self.window), setup.size)?;
        Ok(SceneRenderer::new(context, setup))
    }
}
