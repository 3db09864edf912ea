use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::performance::TierTable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Markers", inline)]
#[serde(default)]
/// Floating-marker scheduling, classification, and appearance.
pub struct MarkerOptions {
    /// Minimum seconds between spawns (desktop, high tier).
    #[schemars(title = "Min Spawn Gap", range(min = 0.05, max = 30.0), extend("step" = 0.05))]
    pub min_gap_seconds: f32,
    /// Maximum seconds between spawns (desktop, high tier).
    #[schemars(title = "Max Spawn Gap", range(min = 0.05, max = 30.0), extend("step" = 0.05))]
    pub max_gap_seconds: f32,
    /// Gap multiplier on mobile-class devices.
    #[schemars(skip)]
    pub mobile_gap_scale: f32,
    /// Additional gap multiplier on the low performance tier.
    #[schemars(skip)]
    pub low_tier_gap_scale: f32,
    /// Probability that an eligible spawn becomes a text marker.
    #[schemars(title = "Text Probability", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub text_probability: f32,
    /// Maximum simultaneous text markers.
    #[schemars(skip)]
    pub text_cap: TierTable<usize>,
    /// Maximum simultaneous markers.
    #[schemars(skip)]
    pub capacity: TierTable<usize>,
    /// Lifetime range in seconds.
    #[schemars(skip)]
    pub life_seconds: [f32; 2],
    /// Fade-in reveal after spawning, in seconds.
    #[schemars(skip)]
    pub spawn_reveal_seconds: f32,
    /// Spawn shell radius as a multiple of the scene radius.
    #[schemars(skip)]
    pub placement_radius_factor: f32,
    /// Tangential placement jitter as a fraction of the scene radius.
    #[schemars(skip)]
    pub placement_jitter: f32,
    /// Outward pushes attempted while the spawn point is covered.
    #[schemars(skip)]
    pub placement_retries: TierTable<u32>,
    /// Outward push per retry, as a fraction of the scene radius.
    #[schemars(skip)]
    pub placement_push: f32,
    /// Unconditional push after retries run out, as a fraction of the
    /// scene radius.
    #[schemars(skip)]
    pub fallback_push: f32,
    /// Outward launch speed as a fraction of the scene radius per second.
    #[schemars(skip)]
    pub launch_speed: f32,
    /// Tangential launch jitter as a fraction of the scene radius per second.
    #[schemars(skip)]
    pub launch_jitter: f32,
    /// Drift containment radius range, as multiples of the scene radius.
    #[schemars(skip)]
    pub drift_radius: [f32; 2],
    /// Outward acceleration range, as multiples of the scene radius.
    #[schemars(skip)]
    pub outward_accel: [f32; 2],
    /// Scale at spawn.
    #[schemars(skip)]
    pub start_scale: [f32; 2],
    /// Scale at end of life.
    #[schemars(skip)]
    pub end_scale: [f32; 2],
    /// Peak opacity range.
    #[schemars(skip)]
    pub max_alpha: [f32; 2],
    /// Hit radius of a text marker at scale 1, in CSS pixels.
    #[schemars(skip)]
    pub text_hit_radius_px: f32,
    /// Hit radius of a plain marker at scale 1, in CSS pixels.
    #[schemars(skip)]
    pub plain_hit_radius_px: f32,
    /// Marker colours (linear RGB).
    #[schemars(skip)]
    pub palette: Vec<[f32; 3]>,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            min_gap_seconds: 0.9,
            max_gap_seconds: 2.4,
            mobile_gap_scale: 1.4,
            low_tier_gap_scale: 1.5,
            text_probability: 0.42,
            text_cap: TierTable {
                desktop_high: 3,
                desktop_low: 2,
                mobile_high: 2,
                mobile_low: 1,
            },
            capacity: TierTable {
                desktop_high: 14,
                desktop_low: 8,
                mobile_high: 8,
                mobile_low: 5,
            },
            life_seconds: [7.0, 11.0],
            spawn_reveal_seconds: 0.35,
            placement_radius_factor: 1.02,
            placement_jitter: 0.06,
            placement_retries: TierTable {
                desktop_high: 6,
                desktop_low: 3,
                mobile_high: 3,
                mobile_low: 2,
            },
            placement_push: 0.08,
            fallback_push: 0.12,
            launch_speed: 0.12,
            launch_jitter: 0.05,
            drift_radius: [1.35, 1.8],
            outward_accel: [0.35, 0.6],
            start_scale: [0.55, 0.75],
            end_scale: [1.0, 1.25],
            max_alpha: [0.55, 0.9],
            text_hit_radius_px: 44.0,
            plain_hit_radius_px: 20.0,
            palette: vec![
                [0.62, 0.84, 1.0],
                [1.0, 0.78, 0.55],
                [0.78, 1.0, 0.82],
                [0.95, 0.7, 1.0],
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Marker Physics", inline)]
#[serde(default)]
/// Force constants for marker motion and screen-space fading.
pub struct PhysicsOptions {
    /// Upper bound on the integration step in seconds.
    #[schemars(skip)]
    pub max_dt: f32,
    /// Gain on the outward push term.
    #[schemars(skip)]
    pub outward_gain: f32,
    /// Life-ratio window over which the outward push fades out.
    #[schemars(skip)]
    pub push_fade: [f32; 2],
    /// Wind acceleration as a fraction of the scene radius.
    #[schemars(title = "Wind", range(min = 0.0, max = 1.0), extend("step" = 0.005))]
    pub wind_accel: f32,
    /// Brownian jitter acceleration as a fraction of the scene radius.
    #[schemars(title = "Jitter", range(min = 0.0, max = 1.0), extend("step" = 0.005))]
    pub brownian_accel: f32,
    /// Vertical share of Brownian jitter.
    #[schemars(skip)]
    pub vertical_jitter_scale: f32,
    /// Vertical flutter acceleration as a fraction of the scene radius.
    #[schemars(skip)]
    pub flutter_accel: f32,
    /// Velocity damping rate per second.
    #[schemars(title = "Damping", range(min = 0.0, max = 10.0), extend("step" = 0.05))]
    pub damping: f32,
    /// Inner repulsion shell as a multiple of the scene radius.
    #[schemars(skip)]
    pub inner_shell: f32,
    /// Stiffness of the inner repulsion shell.
    #[schemars(skip)]
    pub inner_stiffness: f32,
    /// Stiffness of the soft outer containment.
    #[schemars(skip)]
    pub outer_stiffness: f32,
    /// Life ratio at which the fade-in completes.
    #[schemars(skip)]
    pub fade_in_end: f32,
    /// Screen edge margin in CSS pixels.
    #[schemars(skip)]
    pub edge_margin_px: f32,
    /// Width of the edge fade band beyond the margin, in CSS pixels.
    #[schemars(skip)]
    pub edge_fade_px: f32,
    /// Alpha below which a faded marker counts as invisible.
    #[schemars(skip)]
    pub invisible_alpha: f32,
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        Self {
            max_dt: 0.05,
            outward_gain: 0.28,
            push_fade: [0.3, 0.78],
            wind_accel: 0.05,
            brownian_accel: 0.03,
            vertical_jitter_scale: 0.58,
            flutter_accel: 0.02,
            damping: 2.05,
            inner_shell: 0.78,
            inner_stiffness: 4.0,
            outer_stiffness: 1.6,
            fade_in_end: 0.78,
            edge_margin_px: 12.0,
            edge_fade_px: 36.0,
            invisible_alpha: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Occlusion", inline)]
#[serde(default)]
/// Framebuffer probe budget and coverage threshold.
pub struct OcclusionOptions {
    /// Alpha above which a sample counts as covered (0-255).
    #[schemars(title = "Alpha Threshold", range(min = 0, max = 255))]
    pub alpha_threshold: u8,
    /// Re-probe interval on desktop, in milliseconds.
    #[schemars(skip)]
    pub desktop_interval_ms: f32,
    /// Re-probe interval on mobile, in milliseconds.
    #[schemars(skip)]
    pub mobile_interval_ms: f32,
    /// Interval multiplier on the low performance tier.
    #[schemars(skip)]
    pub low_tier_interval_scale: f32,
    /// Sample pattern radius in CSS pixels (scaled by pixel density).
    #[schemars(skip)]
    pub sample_radius_px: f32,
}

impl Default for OcclusionOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 14,
            desktop_interval_ms: 36.0,
            mobile_interval_ms: 120.0,
            low_tier_interval_scale: 2.0,
            sample_radius_px: 6.0,
        }
    }
}
