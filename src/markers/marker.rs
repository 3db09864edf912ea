//! Marker records and the presentation surface they are drawn through.

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3};

/// Stable identifier of a marker for the lifetime of a
/// [`MarkerField`](super::MarkerField).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// What a marker shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// Decorative bubble.
    Plain,
    /// Bubble carrying a message that opens on click.
    Text(Arc<str>),
}

impl MarkerKind {
    /// Whether this is a text marker.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The message, for text markers.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Plain => None,
            Self::Text(message) => Some(message),
        }
    }
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerPhase {
    /// Fading in; exempt from occlusion and edge dismissal.
    Spawning,
    /// Drifting, fading, dismissible.
    Alive,
    /// Text marker held open by the user; never expires.
    Active,
    /// Leaving; removed with a burst on the next sweep.
    Dissipating,
}

/// Per-marker constants drawn at spawn time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerTraits {
    /// Stable noise seed in `[0, 1)`.
    pub seed: f32,
    /// Lifetime in seconds.
    pub life_seconds: f32,
    /// Soft containment radius in world units.
    pub drift_radius: f32,
    /// Outward acceleration in world units per second squared.
    pub outward_accel: f32,
    /// Scale at spawn.
    pub start_scale: f32,
    /// Scale at end of life.
    pub end_scale: f32,
    /// Peak opacity.
    pub max_alpha: f32,
    /// Linear RGB colour.
    pub color: [f32; 3],
}

/// A floating marker and its simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingMarker {
    pub(crate) id: MarkerId,
    pub(crate) kind: MarkerKind,
    pub(crate) phase: MarkerPhase,
    pub(crate) traits: MarkerTraits,
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) outward_dir: Vec3,
    pub(crate) born_at: f64,
    pub(crate) reveal_until: f64,
    pub(crate) life_ratio: f32,
    pub(crate) screen: Option<Vec2>,
    pub(crate) last_screen: Option<Vec2>,
    pub(crate) edge_fade: f32,
    pub(crate) alpha: f32,
    pub(crate) scale: f32,
    pub(crate) over_model: bool,
    pub(crate) next_probe_at: f64,
}

impl FloatingMarker {
    /// New marker in [`MarkerPhase::Spawning`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: MarkerId,
        kind: MarkerKind,
        traits: MarkerTraits,
        position: Vec3,
        velocity: Vec3,
        outward_dir: Vec3,
        now: f64,
        reveal_seconds: f32,
    ) -> Self {
        Self {
            id,
            kind,
            phase: MarkerPhase::Spawning,
            traits,
            position,
            velocity,
            outward_dir,
            born_at: now,
            reveal_until: now + f64::from(reveal_seconds.max(0.0)),
            life_ratio: 0.0,
            screen: None,
            last_screen: None,
            edge_fade: 0.0,
            alpha: 0.0,
            scale: traits.start_scale,
            over_model: false,
            next_probe_at: now,
        }
    }

    /// Identifier.
    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Kind and message.
    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> MarkerPhase {
        self.phase
    }

    /// Spawn-time constants.
    pub fn traits(&self) -> &MarkerTraits {
        &self.traits
    }

    /// World position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Age over lifetime; may exceed 1 while active.
    pub fn life_ratio(&self) -> f32 {
        self.life_ratio
    }

    /// Projected position in CSS pixels, `None` when culled.
    pub fn screen(&self) -> Option<Vec2> {
        self.screen
    }

    /// Current opacity.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Current scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Cached occlusion result.
    pub fn over_model(&self) -> bool {
        self.over_model
    }

    /// Whether the marker is still on screen in any form.
    pub fn is_live(&self) -> bool {
        self.phase != MarkerPhase::Dissipating
    }

    /// Update the life ratio for `now`.
    pub(crate) fn age(&mut self, now: f64) {
        let life = f64::from(self.traits.life_seconds.max(1e-3));
        self.life_ratio = ((now - self.born_at).max(0.0) / life) as f32;
    }

    /// Presentation snapshot.
    pub fn visual(&self) -> Option<MarkerVisual> {
        let at = self.screen?;
        Some(MarkerVisual {
            id: self.id,
            message: match &self.kind {
                MarkerKind::Text(message) => Some(Arc::clone(message)),
                MarkerKind::Plain => None,
            },
            x: at.x,
            y: at.y,
            scale: self.scale,
            alpha: self.alpha,
            color: self.traits.color,
            phase: self.phase,
        })
    }
}

/// Where and how to draw one marker this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisual {
    /// Marker identifier.
    pub id: MarkerId,
    /// Message for text markers.
    pub message: Option<Arc<str>>,
    /// Horizontal position in CSS pixels from the left edge.
    pub x: f32,
    /// Vertical position in CSS pixels from the top edge.
    pub y: f32,
    /// Scale relative to the marker's base size.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Linear RGB colour.
    pub color: [f32; 3],
    /// Lifecycle phase (surfaces style active markers differently).
    pub phase: MarkerPhase,
}

/// One-shot decorative effect emitted when a marker is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstEffect {
    /// Marker that burst.
    pub id: MarkerId,
    /// Horizontal position in CSS pixels.
    pub x: f32,
    /// Vertical position in CSS pixels.
    pub y: f32,
    /// Marker scale at removal.
    pub scale: f32,
    /// Linear RGB colour.
    pub color: [f32; 3],
}

/// Presentation surface for markers.
pub trait MarkerSurface {
    /// Draw this frame's markers, replacing the previous frame's.
    fn present(&mut self, visuals: &[MarkerVisual]);

    /// Play a burst effect.
    fn burst(&mut self, effect: &BurstEffect);

    /// Remove everything from the surface.
    fn clear(&mut self);
}
