/// Output surface size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
    /// Device pixels per CSS pixel reported by the host.
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 1.0)
    }
}

impl Viewport {
    /// Viewport with sanitized dimensions (non-finite or negative sizes
    /// become zero, the pixel ratio at least a tiny positive value).
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width: clean(width),
            height: clean(height),
            pixel_ratio,
        }
    }

    /// Width over height, 1 for degenerate viewports.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel ratio after applying the renderer's density cap.
    pub fn effective_pixel_ratio(&self, cap: f32) -> f32 {
        if cap > 0.0 {
            self.pixel_ratio.min(cap)
        } else {
            self.pixel_ratio
        }
    }

    /// Framebuffer size in device pixels under `cap`.
    pub fn framebuffer_size(&self, cap: f32) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio(cap);
        (
            (self.width * ratio).round() as u32,
            (self.height * ratio).round() as u32,
        )
    }
}
