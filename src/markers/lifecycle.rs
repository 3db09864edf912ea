//! Marker phase transitions.
//!
//! `Spawning -> Alive -> Dissipating -> removed`, with text markers able to
//! go `Alive -> Active -> Dissipating`. Every transition goes through the
//! methods here so the rules live in one place.

use std::fmt;

use super::marker::{BurstEffect, FloatingMarker, MarkerPhase};

/// Why a marker started dissipating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DissipateReason {
    /// Lifetime ran out.
    Expired,
    /// Clicked (plain marker).
    Dismissed,
    /// Sat over rendered geometry.
    Occluded,
    /// Culled or faded out at the screen edge.
    OffScreen,
    /// Closed by the host or by a click elsewhere.
    Closed,
    /// Another text marker was opened.
    Displaced,
    /// Removed to stay within capacity.
    Evicted,
    /// Simulation state became non-finite.
    Invalid,
}

impl fmt::Display for DissipateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Expired => "expired",
            Self::Dismissed => "dismissed",
            Self::Occluded => "occluded",
            Self::OffScreen => "off screen",
            Self::Closed => "closed",
            Self::Displaced => "displaced",
            Self::Evicted => "evicted",
            Self::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

impl FloatingMarker {
    /// Start dissipating. Returns `false` if already dissipating.
    pub(crate) fn dissipate(&mut self, reason: DissipateReason) -> bool {
        if self.phase == MarkerPhase::Dissipating {
            return false;
        }
        log::trace!("{} dissipating: {reason}", self.id);
        self.phase = MarkerPhase::Dissipating;
        true
    }

    /// Open a text marker. Only alive text markers can be activated; the
    /// reveal is held open indefinitely.
    pub(crate) fn activate(&mut self) -> bool {
        if self.phase != MarkerPhase::Alive || !self.kind.is_text() {
            return false;
        }
        self.phase = MarkerPhase::Active;
        self.reveal_until = f64::INFINITY;
        true
    }

    /// Finish the spawn reveal once `now` passes it.
    pub(crate) fn settle(&mut self, now: f64) {
        if self.phase == MarkerPhase::Spawning && now >= self.reveal_until {
            self.phase = MarkerPhase::Alive;
        }
    }

    /// Lifetime exhausted and not held open.
    pub(crate) fn expired(&self) -> bool {
        self.life_ratio >= 1.0 && self.phase != MarkerPhase::Active
    }

    /// Apply the automatic `Alive -> Dissipating` rules.
    ///
    /// Expiry applies to every non-active marker; occlusion and edge
    /// invisibility only to alive ones, so spawning markers get their
    /// reveal.
    pub(crate) fn auto_dissipate(&mut self, invisible_alpha: f32) -> Option<DissipateReason> {
        let reason = if self.expired() {
            DissipateReason::Expired
        } else if self.phase != MarkerPhase::Alive {
            return None;
        } else if self.over_model {
            DissipateReason::Occluded
        } else if self.screen.is_none()
            || self.edge_fade * self.traits.max_alpha <= invisible_alpha
        {
            DissipateReason::OffScreen
        } else {
            return None;
        };
        self.dissipate(reason).then_some(reason)
    }

    /// Burst at the last known screen position, if the marker was ever
    /// on screen.
    pub(crate) fn burst(&self) -> Option<BurstEffect> {
        let at = self.screen.or(self.last_screen)?;
        Some(BurstEffect {
            id: self.id,
            x: at.x,
            y: at.y,
            scale: self.scale,
            color: self.traits.color,
        })
    }
}
