//! Per-element displacement kernel.
//!
//! The formulas here are the visual contract of the morph and are mirrored
//! line for line by `assets/shaders/modules/morph.wgsl`. The CPU path is
//! used by [`PointCloudAsset`](crate::scene::PointCloudAsset), by tests and
//! by hosts that animate points without a GPU compute pass.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::mode::AnimationMode;
use crate::scene::SceneFrame;
use crate::util::easing::{mix, smoothstep};
use crate::util::hash::element_seed;

/// Lengths below this are treated as zero before normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Structured parameters handed to the displacement extension slot each
/// frame. Layout matches the `MorphParams` uniform in the WGSL module.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelParams {
    /// Scene centre in world space.
    pub center: [f32; 3],
    /// Scene radius (always positive).
    pub radius: f32,
    /// Kernel time in seconds since the morph loop started.
    pub time: f32,
    /// [`AnimationMode::kernel_id`] of the active mode.
    pub mode: u32,
    /// Morph scalar in `[0, 1]`.
    pub morph: f32,
    /// Applied colour gain.
    pub color_gain: f32,
    /// Frame-wide displacement strength.
    pub strength: f32,
    /// Applied element scale.
    pub element_scale: f32,
    /// 1 while point-cloud rendering is enabled.
    pub point_cloud: u32,
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl KernelParams {
    /// Neutral parameters: no morph, unit gain and scale.
    #[must_use]
    pub fn neutral(frame: SceneFrame) -> Self {
        Self {
            center: frame.center.to_array(),
            radius: frame.radius,
            time: 0.0,
            mode: AnimationMode::None.kernel_id(),
            morph: 0.0,
            color_gain: 1.0,
            strength: 0.0,
            element_scale: 1.0,
            point_cloud: 0,
            _pad: 0.0,
        }
    }

    /// Resolve the mode id back to an [`AnimationMode`].
    #[must_use]
    pub fn animation_mode(&self) -> AnimationMode {
        AnimationMode::ALL
            .get(self.mode as usize)
            .copied()
            .unwrap_or(AnimationMode::None)
    }
}

/// Receives kernel parameters from the controller every frame.
///
/// This is the explicit extension point on the rendering side: a GPU
/// implementation uploads the struct to a uniform buffer, a CPU
/// implementation re-evaluates [`DisplacementKernel`] over its points.
pub trait DisplacementSlot {
    /// Publish this frame's parameters.
    fn write_params(&mut self, params: &KernelParams);
}

/// Normalize `v`, or return `fallback` when `v` is (nearly) zero-length.
#[inline]
#[must_use]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Gate that keeps small morph values from producing mode motion.
#[inline]
#[must_use]
pub fn motion_gate(morph: f32) -> f32 {
    smoothstep(0.12, 0.35, morph)
}

/// Frame-wide displacement strength for `mode` at `morph`.
#[inline]
#[must_use]
pub fn frame_strength(mode: AnimationMode, morph: f32) -> f32 {
    let morph = morph.clamp(0.0, 1.0);
    let base = if mode.is_animated() {
        0.35 + 0.65 * morph
    } else {
        0.0
    };
    base * morph * motion_gate(morph)
}

/// Stable pseudo-random unit direction for an element seed.
#[inline]
#[must_use]
pub fn grain_dir(seed: f32) -> Vec3 {
    let v = Vec3::new(
        (seed * 91.7).sin(),
        (seed * 47.3 + 1.3).sin(),
        (seed * 63.1 + 2.1).cos(),
    );
    safe_normalize(v, Vec3::Y)
}

/// Explode term: bursts along the outward direction.
#[inline]
#[must_use]
pub fn explode_offset(
    from_center: Vec3,
    phase: f32,
    strength: f32,
    radius: f32,
) -> Vec3 {
    let burst = (phase * 0.8).sin().max(0.0);
    let burst = burst * burst;
    safe_normalize(from_center, Vec3::ZERO) * burst * strength * 0.28 * radius
}

/// Sum-of-sines wobble vector (unscaled).
#[inline]
#[must_use]
pub fn noise_wobble(phase: f32, from_center: Vec3) -> Vec3 {
    let fc = from_center;
    Vec3::new(
        (phase * 1.3 + fc.y * 0.21).sin()
            + 0.5 * (phase * 2.1 + fc.z * 0.17).sin(),
        (phase * 1.7 + fc.z * 0.19).sin()
            + 0.5 * (phase * 2.6 + fc.x * 0.23).sin(),
        (phase * 1.1 + fc.x * 0.15).sin()
            + 0.5 * (phase * 2.3 + fc.y * 0.13).sin(),
    )
}

/// Frame-constant evaluator for the displacement of individual elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementKernel {
    center: Vec3,
    radius: f32,
    time: f32,
    mode: AnimationMode,
    morph: f32,
    strength: f32,
}

impl DisplacementKernel {
    /// Kernel for one frame.
    #[must_use]
    pub fn new(
        frame: SceneFrame,
        mode: AnimationMode,
        time: f32,
        morph: f32,
    ) -> Self {
        let morph = morph.clamp(0.0, 1.0);
        Self {
            center: frame.center,
            radius: frame.radius.max(NORMALIZE_EPSILON),
            time,
            mode,
            morph,
            strength: frame_strength(mode, morph),
        }
    }

    /// Kernel matching published [`KernelParams`].
    #[must_use]
    pub fn from_params(params: &KernelParams) -> Self {
        Self::new(
            SceneFrame::new(Vec3::from_array(params.center), params.radius),
            params.animation_mode(),
            params.time,
            params.morph,
        )
    }

    /// Displacement strength for this frame.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Displaced position of element `index` with base position `base`.
    #[must_use]
    pub fn displace(&self, index: u32, base: Vec3) -> Vec3 {
        if !self.mode.is_animated() || self.morph <= 0.0 {
            return base;
        }

        let radius = self.radius;
        let morph = self.morph;
        let strength = self.strength;
        let seed = element_seed(index);
        let from_center = base - self.center;
        let radius_norm = (from_center.length() / radius).clamp(0.0, 1.0);
        let phase = self.time * 1.2 + seed * TAU;

        let mut p = base
            + grain_dir(seed)
                * smoothstep(0.05, 0.85, morph)
                * mix(0.01, 0.09, radius_norm)
                * radius;

        match self.mode {
            AnimationMode::None => {}
            AnimationMode::Wave => {
                let ripple =
                    phase + from_center.dot(Vec3::new(0.11, 0.07, 0.13)) * 3.0;
                p.z += ripple.sin()
                    * strength
                    * mix(0.03, 0.16, radius_norm)
                    * radius;
                p.y += (phase * 0.8 + radius_norm * 5.0).cos()
                    * strength
                    * 0.02
                    * radius;
            }
            AnimationMode::Swirl => {
                let angle =
                    (phase + from_center.y * 0.08).sin() * 1.15 * strength;
                let (s, c) = angle.sin_cos();
                let rel = p - self.center;
                p = self.center
                    + Vec3::new(
                        rel.x * c - rel.z * s,
                        rel.y,
                        rel.x * s + rel.z * c,
                    );
                let radial = Vec2::new(from_center.x, from_center.z).length();
                p.y += (phase * 0.9 + radial * 0.06).sin()
                    * 0.03
                    * strength
                    * radius;
            }
            AnimationMode::Noise => {
                p += noise_wobble(phase, from_center) * 0.03 * strength * radius;
            }
            AnimationMode::Breathe => {
                let rel = p - self.center;
                p = self.center
                    + rel * (1.0 + (phase * 0.9).sin() * 0.12 * strength);
            }
            AnimationMode::Explode => {
                p += explode_offset(from_center, phase, strength, radius);
            }
        }

        base.lerp(p, morph)
    }

    /// Displace every element of `base` into `out` (resized to match).
    pub fn displace_all(&self, base: &[Vec3], out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(
            base.iter()
                .enumerate()
                .map(|(i, &p)| self.displace(i as u32, p)),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn unit_frame() -> SceneFrame {
        SceneFrame::new(Vec3::ZERO, 1.0)
    }

    #[test]
    fn mode_none_leaves_elements_in_place() {
        let kernel =
            DisplacementKernel::new(unit_frame(), AnimationMode::None, 3.0, 0.8);
        let p = Vec3::new(0.3, -0.2, 0.5);
        assert_eq!(kernel.displace(17, p), p);
        assert_eq!(kernel.strength(), 0.0);
    }

    #[test]
    fn zero_morph_leaves_elements_in_place() {
        for mode in AnimationMode::ALL {
            let kernel = DisplacementKernel::new(unit_frame(), mode, 1.0, 0.0);
            let p = Vec3::new(0.4, 0.1, -0.7);
            assert_eq!(kernel.displace(3, p), p);
        }
    }

    #[test]
    fn strength_formula() {
        // below the motion gate nothing moves
        assert_eq!(frame_strength(AnimationMode::Wave, 0.1), 0.0);
        // fully gated at morph 1: (0.35 + 0.65) * 1 * 1
        assert!((frame_strength(AnimationMode::Wave, 1.0) - 1.0).abs() < 1e-6);
        let m = 0.5;
        let expected = (0.35 + 0.65 * m) * m * smoothstep(0.12, 0.35, m);
        assert!((frame_strength(AnimationMode::Swirl, m) - expected).abs() < 1e-6);
    }

    #[test]
    fn explode_magnitude_at_burst_peak() {
        // sin(phase * 0.8) = 1
        let phase = FRAC_PI_2 / 0.8;
        let strength = 0.6;
        let offset = explode_offset(Vec3::new(2.0, 0.0, 0.0), phase, strength, 1.0);
        assert!((offset.length() - strength * 0.28).abs() < 1e-5);
        assert!(offset.normalize().dot(Vec3::X) > 0.9999);
    }

    #[test]
    fn explode_at_center_is_stable() {
        let offset = explode_offset(Vec3::ZERO, 1.0, 1.0, 1.0);
        assert_eq!(offset, Vec3::ZERO);
    }

    #[test]
    fn breathe_scales_about_center() {
        let frame = SceneFrame::new(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let kernel = DisplacementKernel::new(frame, AnimationMode::Breathe, 0.7, 1.0);
        let base = Vec3::new(2.0, 2.0, 3.0);
        let out = kernel.displace(5, base);
        assert!(out.is_finite());
        // stays within breathing range plus breakup grain
        let r = (out - frame.center).length();
        assert!(r > 0.8 && r < 1.35, "radius {r}");
    }

    #[test]
    fn wave_moves_depth_more_than_height() {
        let kernel = DisplacementKernel::new(unit_frame(), AnimationMode::Wave, 0.0, 1.0);
        let mut dz = 0.0;
        let mut dy = 0.0;
        for i in 0..200 {
            let base = Vec3::new(0.9, 0.0, 0.0);
            let out = kernel.displace(i, base);
            let grain = grain_dir(element_seed(i)) * 0.09;
            dz += (out.z - base.z - grain.z).abs();
            dy += (out.y - base.y - grain.y).abs();
        }
        assert!(dz > dy);
    }

    #[test]
    fn displacement_is_bounded_by_scene_radius() {
        for mode in AnimationMode::ALL {
            let kernel = DisplacementKernel::new(unit_frame(), mode, 2.3, 1.0);
            for i in 0..64 {
                let base = grain_dir(element_seed(i + 1000)) * 0.8;
                let out = kernel.displace(i, base);
                assert!(out.is_finite());
                assert!((out - base).length() < 1.0, "{mode} moved too far");
            }
        }
    }

    #[test]
    fn displace_all_matches_per_element() {
        let kernel = DisplacementKernel::new(unit_frame(), AnimationMode::Noise, 1.1, 0.7);
        let base: Vec<Vec3> = (0..10).map(|i| Vec3::splat(i as f32 * 0.05)).collect();
        let mut out = Vec::new();
        kernel.displace_all(&base, &mut out);
        assert_eq!(out.len(), base.len());
        for (i, p) in base.iter().enumerate() {
            assert_eq!(out[i], kernel.displace(i as u32, *p));
        }
    }

    #[test]
    fn params_round_trip_mode() {
        let mut params = KernelParams::neutral(unit_frame());
        params.mode = AnimationMode::Swirl.kernel_id();
        assert_eq!(params.animation_mode(), AnimationMode::Swirl);
        params.mode = 99;
        assert_eq!(params.animation_mode(), AnimationMode::None);
        assert_eq!(size_of::<KernelParams>(), 48);
    }
}
