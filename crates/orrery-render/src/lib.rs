//! wgpu backend for the orrery panel.
//!
//! [`SceneRenderer`] owns the surface, device and every GPU buffer, draws the
//! lit scene into an offscreen target at the capped pixel ratio and blits it
//! onto the window surface.

pub mod blit;
pub mod buffer;
pub mod gpu;
pub mod pipeline;
pub mod renderer;
pub mod target;

pub use blit::BlitPipeline;
pub use buffer::{MeshBuffer, VertexPositionNormalUv};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pipeline::{FrameUniform, LitPipeline, ObjectUniform};
pub use renderer::{ScenePasses, SceneRenderer};
pub use target::RenderTargets;

/// Headless device for GPU tests; `None` when no adapter is available.
#[cfg(test)]
pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
