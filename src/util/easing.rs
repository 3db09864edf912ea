//! Easing curves and scalar shaping helpers for the morph pipeline.
//!
//! The curves here define the visual contract of the morph: the clock,
//! the bridges, the displacement kernel and the marker fades all shape
//! their inputs through these functions. The WGSL kernel module mirrors
//! [`smoothstep`], [`mix`] and [`fract`] exactly.

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Cubic ease-in-out: `4x³` below the midpoint, mirrored above it.
    CubicInOut,
    /// Cubic ease-out (fast start, slow end): `1 - (1-x)³`.
    CubicOut,
    /// Hermite smoothstep over the unit interval: `x²(3 - 2x)`.
    Smooth,
}

impl EasingFunction {
    /// Default easing function for morph pulses.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicInOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            EasingFunction::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            EasingFunction::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Cubic ease-in-out of `x` (clamped to the unit interval).
#[inline]
#[must_use]
pub fn ease_in_out_cubic(x: f32) -> f32 {
    EasingFunction::CubicInOut.evaluate(x)
}

/// Cubic ease-out of `x` (clamped to the unit interval).
#[inline]
#[must_use]
pub fn ease_out_cubic(x: f32) -> f32 {
    EasingFunction::CubicOut.evaluate(x)
}

/// GLSL/WGSL-compatible smoothstep.
///
/// Degenerate edges (`edge1 <= edge0`) act as a hard step at `edge0`.
#[inline]
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span <= f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend `a + (b - a) * t` without clamping.
#[inline]
#[must_use]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fractional part with shader semantics (`x - floor(x)`, always `>= 0`).
#[inline]
#[must_use]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
