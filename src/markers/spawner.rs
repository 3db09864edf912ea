//! Spawn scheduling, classification and placement.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use super::marker::{MarkerKind, MarkerTraits};
use crate::animation::kernel::safe_normalize;
use crate::options::{DeviceClass, MarkerOptions, PerformanceLevel};
use crate::scene::SceneFrame;

/// Uniform sample in `[range[0], range[1]]` that tolerates empty or
/// reversed ranges.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    range[0] + (range[1] - range[0]) * rng.random::<f32>()
}

/// Uniform sample in `[-1, 1)`.
pub fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

/// Uniformly distributed unit direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Two unit vectors orthogonal to `dir` and to each other.
pub fn tangent_basis(dir: Vec3) -> (Vec3, Vec3) {
    // parallel to Y: the cross product vanishes and X is orthogonal anyway
    let first = safe_normalize(dir.cross(Vec3::Y), Vec3::X);
    let second = safe_normalize(dir.cross(first), Vec3::Z);
    (first, second)
}

/// Where a new marker starts and how it is launched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Spawn position in world space.
    pub position: Vec3,
    /// Unit direction away from the scene centre.
    pub outward: Vec3,
    /// Initial velocity.
    pub velocity: Vec3,
    /// Outward pushes applied because the spot was covered.
    pub pushes: u32,
    /// Whether the unverified fallback push was used.
    pub fell_back: bool,
}

/// Decides when and where markers appear.
#[derive(Debug, Clone, Default)]
pub struct MarkerSpawner {
    next_spawn_at: Option<f64>,
}

impl MarkerSpawner {
    /// Spawner with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the next scheduled spawn.
    pub fn next_spawn_at(&self) -> Option<f64> {
        self.next_spawn_at
    }

    /// Gap multiplier for the device and tier.
    pub fn gap_scale(
        options: &MarkerOptions,
        device: DeviceClass,
        level: PerformanceLevel,
    ) -> f32 {
        let mut scale = 1.0;
        if device.is_constrained() {
            scale *= options.mobile_gap_scale;
        }
        if level.is_low() {
            scale *= options.low_tier_gap_scale;
        }
        scale
    }

    /// Schedule the next spawn a random gap after `now`.
    pub fn schedule<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        rng: &mut R,
        options: &MarkerOptions,
        device: DeviceClass,
        level: PerformanceLevel,
    ) {
        let gap = uniform(rng, [options.min_gap_seconds, options.max_gap_seconds])
            * Self::gap_scale(options, device, level);
        self.next_spawn_at = Some(now + f64::from(gap.max(0.0)));
    }

    /// Drop the pending spawn (an active marker suspends scheduling).
    pub fn suspend(&mut self) {
        self.next_spawn_at = None;
    }

    /// Whether a spawn is scheduled at or before `now`.
    pub fn is_due(&self, now: f64) -> bool {
        self.next_spawn_at.is_some_and(|at| now >= at)
    }

    /// Pick the kind of the next marker.
    pub fn classify<R: Rng + ?Sized>(
        rng: &mut R,
        messages: &[Arc<str>],
        live_text: usize,
        text_cap: usize,
        text_probability: f32,
    ) -> MarkerKind {
        if messages.is_empty() || live_text >= text_cap {
            return MarkerKind::Plain;
        }
        if rng.random::<f32>() < text_probability {
            let pick = rng.random_range(0..messages.len());
            MarkerKind::Text(Arc::clone(&messages[pick]))
        } else {
            MarkerKind::Plain
        }
    }

    /// Draw per-marker constants.
    pub fn traits<R: Rng + ?Sized>(
        rng: &mut R,
        options: &MarkerOptions,
        frame: SceneFrame,
    ) -> MarkerTraits {
        let color = if options.palette.is_empty() {
            [1.0; 3]
        } else {
            options.palette[rng.random_range(0..options.palette.len())]
        };
        MarkerTraits {
            seed: rng.random::<f32>(),
            life_seconds: uniform(rng, options.life_seconds).max(0.1),
            drift_radius: uniform(rng, options.drift_radius) * frame.radius,
            outward_accel: uniform(rng, options.outward_accel) * frame.radius,
            start_scale: uniform(rng, options.start_scale),
            end_scale: uniform(rng, options.end_scale),
            max_alpha: uniform(rng, options.max_alpha).clamp(0.0, 1.0),
            color,
        }
    }

    /// Choose a spawn point on the shell around the scene and push it
    /// outward while `covered` reports geometry under it.
    ///
    /// Retries are bounded by `retries`; when they run out the point gets
    /// one more push that is not re-checked, so a marker can still start
    /// over dense geometry.
    pub fn place<R: Rng + ?Sized>(
        rng: &mut R,
        options: &MarkerOptions,
        frame: SceneFrame,
        retries: u32,
        mut covered: impl FnMut(Vec3) -> bool,
    ) -> Placement {
        let radius = frame.radius;
        let outward = random_direction(rng);
        let (t1, t2) = tangent_basis(outward);

        let jitter = (t1 * signed_unit(rng) + t2 * signed_unit(rng))
            * options.placement_jitter
            * radius;
        let mut position =
            frame.center + outward * radius * options.placement_radius_factor + jitter;

        let mut pushes = 0;
        let mut fell_back = false;
        while covered(position) {
            if pushes >= retries {
                position += outward * options.fallback_push * radius;
                fell_back = true;
                break;
            }
            position += outward * options.placement_push * radius;
            pushes += 1;
        }

        let velocity = outward * options.launch_speed * radius
            + t1 * signed_unit(rng) * options.launch_jitter * radius
            + t2 * signed_unit(rng) * options.launch_jitter * radius;

        Placement {
            position,
            outward,
            velocity,
            pushes,
            fell_back,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn schedule_respects_gap_range_and_scales() {
        let options = MarkerOptions::default();
        let mut rng = rng();
        let mut spawner = MarkerSpawner::new();
        for _ in 0..100 {
            spawner.schedule(10.0, &mut rng, &options, DeviceClass::Desktop, PerformanceLevel::High);
            let gap = spawner.next_spawn_at().unwrap() - 10.0;
            assert!((0.9 - 1e-6..=2.4 + 1e-6).contains(&gap));
        }
        let scale = MarkerSpawner::gap_scale(&options, DeviceClass::Mobile, PerformanceLevel::Low);
        assert!((scale - 1.4 * 1.5).abs() < 1e-6);
    }

    #[test]
    fn suspend_clears_the_schedule() {
        let mut spawner = MarkerSpawner::new();
        spawner.schedule(0.0, &mut rng(), &MarkerOptions::default(), DeviceClass::Desktop, PerformanceLevel::High);
        assert!(spawner.is_due(100.0));
        spawner.suspend();
        assert!(!spawner.is_due(100.0));
    }

    #[test]
    fn classification_honours_pool_and_cap() {
        let mut rng = rng();
        let messages: Vec<Arc<str>> = vec![Arc::from("hi"), Arc::from("there")];
        assert_eq!(MarkerSpawner::classify(&mut rng, &[], 0, 3, 1.0), MarkerKind::Plain);
        assert_eq!(MarkerSpawner::classify(&mut rng, &messages, 3, 3, 1.0), MarkerKind::Plain);
        assert!(MarkerSpawner::classify(&mut rng, &messages, 0, 3, 1.0).is_text());
        assert_eq!(MarkerSpawner::classify(&mut rng, &messages, 0, 3, 0.0), MarkerKind::Plain);
    }

    #[test]
    fn placement_lands_on_the_shell() {
        let options = MarkerOptions::default();
        let frame = SceneFrame::new(Vec3::new(1.0, 0.0, -2.0), 2.0);
        let mut rng = rng();
        for _ in 0..50 {
            let p = MarkerSpawner::place(&mut rng, &options, frame, 6, |_| false);
            let d = (p.position - frame.center).length();
            assert!(d > 2.0 * 1.0 && d < 2.0 * 1.1, "distance {d}");
            assert_eq!(p.pushes, 0);
            assert!(p.velocity.dot(p.outward) > 0.0);
        }
    }

    #[test]
    fn covered_placement_retries_then_falls_back() {
        let options = MarkerOptions::default();
        let frame = SceneFrame::new(Vec3::ZERO, 1.0);
        let mut checks = 0;
        let p = MarkerSpawner::place(&mut rng(), &options, frame, 3, |_| {
            checks += 1;
            true
        });
        assert_eq!(p.pushes, 3);
        assert!(p.fell_back);
        assert_eq!(checks, 4);
        let d = p.position.length();
        assert!(d > 1.02 + 3.0 * 0.08, "distance {d}");
    }

    #[test]
    fn tangent_basis_is_orthonormal() {
        for dir in [Vec3::X, Vec3::Y, Vec3::NEG_Y, Vec3::new(0.3, 0.4, 0.5).normalize()] {
            let (a, b) = tangent_basis(dir);
            assert!(a.dot(dir).abs() < 1e-5);
            assert!(b.dot(dir).abs() < 1e-5);
            assert!(a.dot(b).abs() < 1e-5);
            assert!((a.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn traits_scale_with_scene_radius() {
        let options = MarkerOptions::default();
        let t = MarkerSpawner::traits(&mut rng(), &options, SceneFrame::new(Vec3::ZERO, 10.0));
        assert!((13.5..=18.0).contains(&t.drift_radius));
        assert!((7.0..=11.0).contains(&t.life_seconds));
    }
}
