//! Frame delta and FPS tracking from injected timestamps.

use web_time::Instant;

/// Frame timing driven by an injected monotonic clock.
///
/// The engine never reads the wall clock itself: every tick receives a
/// timestamp in seconds, and this type turns consecutive timestamps into
/// frame deltas and a smoothed FPS figure.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Timestamp of the previous frame, `None` before the first frame.
    last_frame: Option<f64>,
    /// Delta of the most recent frame in seconds (unclamped, non-negative).
    last_dt: f32,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a new frame timer with no frames observed yet.
    pub fn new() -> Self {
        Self {
            last_frame: None,
            last_dt: 0.0,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    /* 5% new value, 95% old value for smooth
                                 * display */
        }
    }

    /// Record a frame at `now` (seconds) and return its delta.
    ///
    /// The first frame yields 0. A clock that runs backwards also yields 0
    /// rather than a negative delta.
    pub fn advance(&mut self, now: f64) -> f32 {
        let dt = match self.last_frame {
            Some(prev) if now > prev => (now - prev) as f32,
            _ => 0.0,
        };
        self.last_frame = Some(now);
        self.last_dt = dt;

        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Delta of the most recent frame, clamped to `[0, max_dt]`.
    pub fn clamped_dt(&self, max_dt: f32) -> f32 {
        self.last_dt.clamp(0.0, max_dt.max(0.0))
    }

    /// Forget the previous timestamp so the next frame yields a zero delta.
    pub fn reset(&mut self) {
        self.last_frame = None;
        self.last_dt = 0.0;
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

/// Monotonic seconds since construction, for hosts that want to feed
/// [`FrameTiming`] from the platform clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created.
    pub fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
