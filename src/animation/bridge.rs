//! Colour-gain and element-scale bridging across representation switches.
//!
//! Absent a bridge, the applied values chase morph-derived targets with
//! exponential smoothing. When point-cloud rendering switches off, two
//! timed ramps take over and carry the applied values back to 1.0 so the
//! assembled surface does not pop in at the particle brightness or size.
//! Colour gain is rate-limited in every case.

use super::clock::MorphState;
use super::gate::GateStep;
use crate::options::BridgeOptions;
use crate::util::easing::{ease_in_out_cubic, ease_out_cubic, mix, smoothstep};

/// Upper bound on the smoothing step in seconds.
pub const MAX_SMOOTHING_DT: f32 = 0.1;

/// Curve applied to a ramp's normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampShape {
    /// `smoothstep(0, duration, elapsed)`.
    Smooth,
    /// `easeOutCubic(smoothstep(0, duration, elapsed))`.
    SmoothEaseOut,
}

/// A one-shot timed ramp from a start value to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeRamp {
    from: f32,
    started_at: f64,
    duration: f32,
    shape: RampShape,
}

impl BridgeRamp {
    /// Ramp starting at `now` from `from`.
    pub fn new(from: f32, now: f64, duration: f32, shape: RampShape) -> Self {
        Self {
            from,
            started_at: now,
            duration: duration.max(0.0),
            shape,
        }
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f32 {
        let elapsed = (now - self.started_at).max(0.0) as f32;
        let t = smoothstep(0.0, self.duration, elapsed);
        match self.shape {
            RampShape::Smooth => t,
            RampShape::SmoothEaseOut => ease_out_cubic(t),
        }
    }

    /// Ramp value at `now`.
    pub fn value(&self, now: f64) -> f32 {
        mix(self.from, 1.0, self.progress(now))
    }

    /// Whether the ramp has reached 1.0.
    pub fn finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Morph-derived targets for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendTargets {
    /// Colour gain to converge to.
    pub color_gain: f32,
    /// Element scale to converge to.
    pub element_scale: f32,
    /// Blend between assembled and particle gain.
    pub point_cloud_blend: f32,
}

/// Thresholds the targets are shaped around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetShape {
    /// Gate enter threshold.
    pub enter: f32,
    /// Gate exit threshold.
    pub exit: f32,
    /// Reveal-window start.
    pub reveal_start: f32,
    /// Element-scale multiplier while in point-cloud on constrained devices.
    pub constrained_boost: Option<f32>,
}

/// Compute gain and scale targets for a morph state and gate step.
pub fn blend_targets(
    state: &MorphState,
    gate: &GateStep,
    shape: &TargetShape,
) -> BlendTargets {
    let morph = state.morph;
    let convergence = 1.0 - smoothstep(0.0, 0.24, morph);
    let model_gain = 1.0 - 0.08 * convergence;
    let particle_gain = 1.2 + 0.14 * convergence;

    let reveal_hold = 1.0 - gate.reveal_blend;
    let directional = if state.dispersing {
        smoothstep(0.6 * shape.enter, shape.enter, morph)
    } else {
        smoothstep(shape.exit, shape.enter, morph)
    };
    let point_cloud_blend = directional * reveal_hold;

    let fill = if state.dispersing {
        0.0
    } else {
        (1.0 - smoothstep(shape.reveal_start, 1.0, morph)) * reveal_hold
    };

    let mut element_scale = 1.0
        + 0.22 * ease_in_out_cubic(morph) * smoothstep(0.03, 0.18, morph)
        + 0.26 * fill;
    if gate.point_cloud {
        if let Some(boost) = shape.constrained_boost {
            element_scale *= boost;
        }
    }

    BlendTargets {
        color_gain: mix(model_gain, particle_gain, point_cloud_blend),
        element_scale,
        point_cloud_blend,
    }
}

/// Exponential approach factor for a step of `dt` with time constant `tau`.
fn approach(dt: f32, tau: f32) -> f32 {
    if tau <= 0.0 {
        1.0
    } else {
        1.0 - (-dt / tau).exp()
    }
}

/// Applied colour gain and element scale, smoothed and bridged.
#[derive(Debug, Clone)]
pub struct TransitionBridge {
    options: BridgeOptions,
    color_gain: f32,
    element_scale: f32,
    luminance: Option<BridgeRamp>,
    scale: Option<BridgeRamp>,
}

impl TransitionBridge {
    /// Bridge at neutral values (gain 1, scale 1).
    pub fn new(options: &BridgeOptions) -> Self {
        Self {
            options: options.clone(),
            color_gain: 1.0,
            element_scale: 1.0,
            luminance: None,
            scale: None,
        }
    }

    /// Applied colour gain.
    pub fn color_gain(&self) -> f32 {
        self.color_gain
    }

    /// Applied element scale.
    pub fn element_scale(&self) -> f32 {
        self.element_scale
    }

    /// Whether either ramp is running.
    pub fn is_bridging(&self) -> bool {
        self.luminance.is_some() || self.scale.is_some()
    }

    /// Arm both ramps from the current applied values.
    pub fn arm(&mut self, now: f64) {
        self.luminance = Some(BridgeRamp::new(
            self.color_gain,
            now,
            self.options.luminance_seconds,
            RampShape::SmoothEaseOut,
        ));
        self.scale = Some(BridgeRamp::new(
            self.element_scale.min(self.options.scale_bridge_cap),
            now,
            self.options.scale_seconds,
            RampShape::Smooth,
        ));
    }

    /// Drop any running ramp, keeping the applied values.
    pub fn cancel(&mut self) {
        self.luminance = None;
        self.scale = None;
    }

    /// Drop ramps and return to neutral values.
    pub fn reset(&mut self) {
        self.cancel();
        self.color_gain = 1.0;
        self.element_scale = 1.0;
    }

    /// Advance the applied values toward `targets` by `dt` seconds.
    ///
    /// Returns the applied `(color_gain, element_scale)`.
    pub fn update(&mut self, now: f64, dt: f32, targets: &BlendTargets) -> (f32, f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_SMOOTHING_DT)
        } else {
            0.0
        };

        let desired_gain = match self.luminance {
            Some(ramp) => {
                if ramp.finished(now) {
                    self.luminance = None;
                }
                ramp.value(now)
            }
            None => {
                self.color_gain
                    + (targets.color_gain - self.color_gain)
                        * approach(dt, self.options.gain_tau)
            }
        };
        let delta = (desired_gain - self.color_gain).clamp(
            -self.options.max_gain_fall * dt,
            self.options.max_gain_rise * dt,
        );
        self.color_gain += delta;

        self.element_scale = match self.scale {
            Some(ramp) => {
                if ramp.finished(now) {
                    self.scale = None;
                }
                ramp.value(now)
            }
            None => {
                self.element_scale
                    + (targets.element_scale - self.element_scale)
                        * approach(dt, self.options.scale_tau)
            }
        };

        if !self.color_gain.is_finite() {
            self.color_gain = 1.0;
        }
        if !self.element_scale.is_finite() {
            self.element_scale = 1.0;
        }
        (self.color_gain, self.element_scale)
    }
}
