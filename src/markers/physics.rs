//! Marker force model and screen mapping.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::marker::FloatingMarker;
use super::spawner::signed_unit;
use crate::animation::kernel::safe_normalize;
use crate::camera::Projector;
use crate::input::Viewport;
use crate::options::PhysicsOptions;
use crate::scene::SceneFrame;
use crate::util::easing::{ease_out_cubic, mix, smoothstep};

/// Smoothly wandering wind direction for a marker seed.
pub fn wind_direction(now: f32, seed: f32) -> Vec3 {
    let wt = now * 0.21 + seed * 17.0;
    let v = Vec3::new(
        wt.sin() + 0.5 * (wt * 2.3 + 1.7).sin(),
        0.35 * (wt * 1.7 + 0.6).sin(),
        (wt * 0.9).cos() + 0.5 * (wt * 1.9 + 2.1).cos(),
    );
    safe_normalize(v, Vec3::X)
}

/// Gust magnitude in `[0.45, 1]`.
pub fn gust(now: f32, seed: f32) -> f32 {
    let a = 0.5 + 0.5 * (now * 0.53 + seed * 11.0).sin();
    let b = 0.5 + 0.5 * (now * 1.37 + seed * 3.0).sin();
    0.45 + 0.55 * a * b
}

/// Advance one marker by `dt` seconds (already clamped by the caller).
pub fn integrate<R: Rng + ?Sized>(
    marker: &mut FloatingMarker,
    now: f64,
    dt: f32,
    frame: SceneFrame,
    options: &PhysicsOptions,
    rng: &mut R,
) {
    if dt <= 0.0 {
        return;
    }
    let radius = frame.radius;
    let seed = marker.traits.seed;
    // phases run on marker age so large host timestamps keep f32 precision
    let t = (now - marker.born_at).max(0.0) as f32;
    let mut velocity = marker.velocity;

    let push = 1.0
        - smoothstep(options.push_fade[0], options.push_fade[1], marker.life_ratio);
    velocity += marker.outward_dir
        * marker.traits.outward_accel
        * options.outward_gain
        * push
        * dt;

    velocity += wind_direction(t, seed) * options.wind_accel * radius * gust(t, seed) * dt;

    let jitter = Vec3::new(
        signed_unit(rng),
        signed_unit(rng) * options.vertical_jitter_scale,
        signed_unit(rng),
    );
    velocity += jitter * options.brownian_accel * radius * dt;

    velocity.y += (t * 2.3 + seed * 9.0).sin() * options.flutter_accel * radius * dt;

    velocity *= (-dt * options.damping).exp();

    let position = marker.position + velocity * dt;

    let rel = position - frame.center;
    let dist = rel.length();
    let dir = safe_normalize(rel, marker.outward_dir);
    let inner = options.inner_shell * radius;
    if dist < inner {
        velocity += dir * (inner - dist) * options.inner_stiffness * dt;
    }
    let outer = marker.traits.drift_radius;
    if dist > outer {
        velocity -= dir * (dist - outer) * options.outer_stiffness * dt;
    }

    marker.velocity = velocity;
    marker.position = position;
}

/// Project `world` to CSS pixels. `None` when outside clip bounds.
pub fn project_to_screen(
    projector: &dyn Projector,
    viewport: &Viewport,
    world: Vec3,
) -> Option<Vec2> {
    let ndc = projector.world_to_ndc(world)?;
    let inside = ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z);
    if !inside {
        return None;
    }
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.width,
        (0.5 - ndc.y * 0.5) * viewport.height,
    ))
}

/// Fade factor near the viewport edges.
pub fn edge_fade(at: Vec2, viewport: &Viewport, options: &PhysicsOptions) -> f32 {
    let nearest = at
        .x
        .min(at.y)
        .min(viewport.width - at.x)
        .min(viewport.height - at.y);
    smoothstep(
        options.edge_margin_px,
        options.edge_margin_px + options.edge_fade_px,
        nearest,
    )
}

/// Refresh screen position, opacity and scale for this frame.
pub fn update_visual(
    marker: &mut FloatingMarker,
    projector: &dyn Projector,
    viewport: &Viewport,
    options: &PhysicsOptions,
) {
    if marker.screen.is_some() {
        marker.last_screen = marker.screen;
    }
    marker.screen = project_to_screen(projector, viewport, marker.position);
    marker.edge_fade = marker
        .screen
        .map_or(0.0, |at| edge_fade(at, viewport, options));

    let life = marker.life_ratio.clamp(0.0, 1.0);
    marker.alpha = marker.traits.max_alpha
        * smoothstep(0.0, options.fade_in_end, life)
        * marker.edge_fade;
    marker.scale = mix(
        marker.traits.start_scale,
        marker.traits.end_scale,
        ease_out_cubic(life),
    );
}

/// Whether the marker's simulation state is usable.
pub fn is_finite(marker: &FloatingMarker) -> bool {
    marker.position.is_finite() && marker.velocity.is_finite()
}
