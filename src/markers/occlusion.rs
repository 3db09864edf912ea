//! Framebuffer-alpha occlusion heuristic.
//!
//! A marker counts as "over the model" when any of a small pattern of
//! samples around its projected position hits rendered geometry. Reads are
//! synchronous and may stall the GPU pipeline, so the sample count and
//! the per-marker re-probe interval are the budget. Every failure fails
//! open.

use std::fmt;

use glam::Vec2;
use log::debug;

use super::marker::FloatingMarker;
use crate::input::Viewport;
use crate::options::{DeviceClass, OcclusionOptions, PerformanceLevel};

/// Failure reading the rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The renderer cannot read pixels back.
    Unsupported,
    /// The read itself failed.
    ReadFailed(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "framebuffer readback unsupported"),
            Self::ReadFailed(msg) => write!(f, "framebuffer read failed: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Pixel-level alpha access to the last rendered frame.
pub trait FrameProbe {
    /// Framebuffer size in device pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Alpha (0-255) at a device-pixel coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the pixel cannot be read.
    fn alpha_at(&self, x: u32, y: u32) -> Result<u8, ProbeError>;
}

/// Probe for hosts without readback: always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReadback;

impl FrameProbe for NoReadback {
    fn framebuffer_size(&self) -> (u32, u32) {
        (0, 0)
    }

    fn alpha_at(&self, _x: u32, _y: u32) -> Result<u8, ProbeError> {
        Err(ProbeError::Unsupported)
    }
}

/// CPU copy of a frame's alpha channel, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaFrame {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaFrame {
    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Extract the alpha channel from tightly packed RGBA8 pixels.
    /// Returns `None` when the buffer length does not match.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            alpha: rgba.chunks_exact(4).map(|px| px[3]).collect(),
        })
    }

    /// Set every pixel inside the disc at `(cx, cy)` with radius `r` to
    /// `alpha`.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, r: f32, alpha: u8) {
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.alpha[(y * self.width + x) as usize] = alpha;
                }
            }
        }
    }
}

impl FrameProbe for AlphaFrame {
    fn framebuffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn alpha_at(&self, x: u32, y: u32) -> Result<u8, ProbeError> {
        if x >= self.width || y >= self.height {
            return Err(ProbeError::ReadFailed(format!(
                "({x}, {y}) outside {}x{}",
                self.width, self.height
            )));
        }
        Ok(self.alpha[(y * self.width + x) as usize])
    }
}

/// Offsets of the sample pattern on the unit disc: centre, the four axis
/// points, and (for the dense pattern) four diagonals.
static SPARSE_PATTERN: [Vec2; 5] = [
    Vec2::ZERO,
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
];
static DIAGONALS: [Vec2; 4] = [
    Vec2::new(0.7, 0.7),
    Vec2::new(-0.7, 0.7),
    Vec2::new(0.7, -0.7),
    Vec2::new(-0.7, -0.7),
];

/// Throttled, fail-open occlusion sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionProbe {
    threshold: u8,
    interval_seconds: f64,
    dense: bool,
    radius_px: f32,
}

impl OcclusionProbe {
    /// Probe configured for a device class and tier.
    pub fn new(
        options: &OcclusionOptions,
        device: DeviceClass,
        level: PerformanceLevel,
    ) -> Self {
        let base_ms = if device.is_constrained() {
            options.mobile_interval_ms
        } else {
            options.desktop_interval_ms
        };
        let scale = if level.is_low() {
            options.low_tier_interval_scale
        } else {
            1.0
        };
        Self {
            threshold: options.alpha_threshold,
            interval_seconds: f64::from((base_ms * scale).max(0.0)) / 1000.0,
            dense: !device.is_constrained() && !level.is_low(),
            radius_px: options.sample_radius_px,
        }
    }

    /// Seconds between probes of the same marker.
    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }

    /// Samples per probe.
    pub fn sample_count(&self) -> usize {
        if self.dense {
            SPARSE_PATTERN.len() + DIAGONALS.len()
        } else {
            SPARSE_PATTERN.len()
        }
    }

    fn offsets(&self) -> impl Iterator<Item = Vec2> + '_ {
        let diagonals: &[Vec2] = if self.dense { &DIAGONALS } else { &[] };
        SPARSE_PATTERN.iter().chain(diagonals).copied()
    }

    /// Sample around a CSS-pixel position.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ProbeError`] from the frame.
    pub fn sample(
        &self,
        probe: &dyn FrameProbe,
        at_css: Vec2,
        pixel_ratio: f32,
    ) -> Result<bool, ProbeError> {
        let (width, height) = probe.framebuffer_size();
        if width == 0 || height == 0 {
            return Err(ProbeError::Unsupported);
        }
        let center = at_css * pixel_ratio;
        let radius = self.radius_px * pixel_ratio;
        for offset in self.offsets() {
            let p = center + offset * radius;
            if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x.floor() as u32, p.y.floor() as u32);
            if x >= width || y >= height {
                continue;
            }
            if probe.alpha_at(x, y)? > self.threshold {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether geometry covers a CSS-pixel position. Errors count as not
    /// covered.
    pub fn covered(&self, probe: &dyn FrameProbe, at_css: Vec2, pixel_ratio: f32) -> bool {
        match self.sample(probe, at_css, pixel_ratio) {
            Ok(covered) => covered,
            Err(err) => {
                debug!("occlusion probe failed open: {err}");
                false
            }
        }
    }

    /// Refresh a marker's cached result if its interval has elapsed.
    /// Markers without a screen position are never covered.
    pub fn refresh(
        &self,
        marker: &mut FloatingMarker,
        now: f64,
        probe: &dyn FrameProbe,
        viewport: &Viewport,
        pixel_ratio_cap: f32,
    ) {
        if now < marker.next_probe_at {
            return;
        }
        marker.next_probe_at = now + self.interval_seconds;
        marker.over_model = marker.screen.is_some_and(|at| {
            self.covered(probe, at, viewport.effective_pixel_ratio(pixel_ratio_cap))
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct CountingProbe {
        frame: AlphaFrame,
        reads: Cell<usize>,
    }

    impl FrameProbe for CountingProbe {
        fn framebuffer_size(&self) -> (u32, u32) {
            self.frame.framebuffer_size()
        }

        fn alpha_at(&self, x: u32, y: u32) -> Result<u8, ProbeError> {
            self.reads.set(self.reads.get() + 1);
            self.frame.alpha_at(x, y)
        }
    }

    fn desktop() -> OcclusionProbe {
        OcclusionProbe::new(
            &OcclusionOptions::default(),
            DeviceClass::Desktop,
            PerformanceLevel::High,
        )
    }

    #[test]
    fn budget_follows_device_and_tier() {
        let opts = OcclusionOptions::default();
        let d = desktop();
        assert_eq!(d.sample_count(), 9);
        assert!((d.interval_seconds() - 0.036).abs() < 1e-9);

        let m = OcclusionProbe::new(&opts, DeviceClass::Mobile, PerformanceLevel::High);
        assert_eq!(m.sample_count(), 5);
        assert!((m.interval_seconds() - 0.12).abs() < 1e-9);

        let low = OcclusionProbe::new(&opts, DeviceClass::Desktop, PerformanceLevel::Low);
        assert_eq!(low.sample_count(), 5);
        assert!((low.interval_seconds() - 0.072).abs() < 1e-9);
    }

    #[test]
    fn detects_geometry_under_any_sample() {
        let mut frame = AlphaFrame::transparent(100, 100);
        frame.fill_disc(50.0, 50.0, 3.0, 255);
        let probe = desktop();
        assert!(probe.covered(&frame, Vec2::new(50.0, 50.0), 1.0));
        // only the +x sample lands on the disc
        assert!(probe.covered(&frame, Vec2::new(44.5, 50.0), 1.0));
        assert!(!probe.covered(&frame, Vec2::new(20.0, 20.0), 1.0));
    }

    #[test]
    fn alpha_at_threshold_is_not_covered() {
        let mut frame = AlphaFrame::transparent(10, 10);
        frame.fill_disc(5.0, 5.0, 20.0, 14);
        assert!(!desktop().covered(&frame, Vec2::new(5.0, 5.0), 1.0));
    }

    #[test]
    fn pixel_ratio_scales_lookup() {
        let mut frame = AlphaFrame::transparent(200, 200);
        frame.fill_disc(150.0, 150.0, 2.0, 255);
        let probe = desktop();
        assert!(probe.covered(&frame, Vec2::new(75.0, 75.0), 2.0));
        assert!(!probe.covered(&frame, Vec2::new(75.0, 75.0), 1.0));
    }

    #[test]
    fn failures_fail_open() {
        let probe = desktop();
        assert!(!probe.covered(&NoReadback, Vec2::new(1.0, 1.0), 1.0));
        assert!(probe.sample(&NoReadback, Vec2::ZERO, 1.0).is_err());
    }

    #[test]
    fn samples_are_bounded() {
        let counting = CountingProbe {
            frame: AlphaFrame::transparent(64, 64),
            reads: Cell::new(0),
        };
        let _ = desktop().covered(&counting, Vec2::new(32.0, 32.0), 1.0);
        assert_eq!(counting.reads.get(), 9);
    }

    #[test]
    fn rgba_extraction() {
        let rgba = [0, 0, 0, 10, 255, 255, 255, 200];
        let frame = AlphaFrame::from_rgba8(2, 1, &rgba).unwrap();
        assert_eq!(frame.alpha_at(1, 0), Ok(200));
        assert!(AlphaFrame::from_rgba8(2, 2, &rgba).is_none());
    }
}
