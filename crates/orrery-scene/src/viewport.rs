//! Container sizes and pixel-ratio capping.

/// Default upper bound for the device pixel ratio used when rendering.
pub const DEFAULT_PIXEL_RATIO_CAP: f64 = 2.0;

/// Size of the container's drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, e.g. a minimised window.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height, or `None` for an empty size.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.width as f32 / self.height as f32)
    }
}

fn positive_or_one(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 1.0 }
}

/// `min(device_pixel_ratio, cap)`. Non-positive or non-finite inputs are
/// treated as 1.0.
pub fn effective_pixel_ratio(device_pixel_ratio: f64, cap: f64) -> f64 {
    positive_or_one(device_pixel_ratio).min(positive_or_one(cap))
}

/// Size of the offscreen render target for a physical surface size.
///
/// The surface already contains `device_pixel_ratio` pixels per logical
/// pixel; the target is scaled down so it contains only the capped ratio.
/// Each side is at least one pixel.
pub fn render_resolution(
    physical: ViewportSize,
    device_pixel_ratio: f64,
    cap: f64,
) -> ViewportSize {
    let dpr = positive_or_one(device_pixel_ratio);
    let scale = effective_pixel_ratio(dpr, cap) / dpr;
    let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    ViewportSize::new(scaled(physical.width), scaled(physical.height))
}
