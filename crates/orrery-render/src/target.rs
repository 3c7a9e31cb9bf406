//! Offscreen colour and reverse-Z depth targets.
//!
//! The scene is drawn at the capped render resolution and later blitted to
//! the full-resolution surface. Depth uses reverse-Z: the near plane maps to
//! 1.0 and the far plane to 0.0.

use orrery_scene::ViewportSize;

/// Colour and depth attachments of the scene pass.
pub struct RenderTargets {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    size: ViewportSize,
}

impl RenderTargets {
    /// Linear-filterable sRGB colour target, sampled by the blit pass.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: the far plane.
    pub const DEPTH_CLEAR_VALUE: f32 = 0.0;

    /// Closer fragments have larger depth values.
    pub const DEPTH_COMPARE: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    /// Allocate targets of `size`, clamped to at least 1×1.
    pub fn new(device: &wgpu::Device, size: ViewportSize) -> Self {
        let size = ViewportSize::new(size.width.max(1), size.height.max(1));
        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };
        let texture = |label, format, usage| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let color = texture(
            "scene-color-target",
            Self::COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth = texture(
            "scene-depth-target",
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            color,
            color_view,
            depth,
            depth_view,
            size,
        }
    }

    /// Reallocate for a new size. Returns `false`, keeping the current
    /// textures, when the clamped size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, size: ViewportSize) -> bool {
        let clamped = ViewportSize::new(size.width.max(1), size.height.max(1));
        if clamped == self.size {
            return false;
        }
        self.destroy();
        *self = Self::new(device, clamped);
        true
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn destroy(&self) {
        self.color.destroy();
        self.depth.destroy();
    }
}
