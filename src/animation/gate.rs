//! Point-cloud representation gate.

use super::clock::MorphState;
use crate::options::MorphOptions;
use crate::util::easing::smoothstep;

/// Outcome of one gate update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateStep {
    /// Point-cloud rendering after this update.
    pub point_cloud: bool,
    /// Reveal-window blend in `[0, 1]`; zero outside the window.
    pub reveal_blend: f32,
    /// The reveal window is open this update.
    pub in_reveal: bool,
    /// Point-cloud switched from on to off in this update.
    pub switched_off: bool,
    /// Point-cloud switched from off to on in this update.
    pub switched_on: bool,
}

/// Decides when the asset renders as discrete points instead of an
/// assembled surface.
///
/// Dispersal switches to points at the enter threshold and reassembly
/// switches back at the exit threshold. The reveal window forces the
/// assembled representation early so the bridges can pre-stage its look.
#[derive(Debug, Clone)]
pub struct RenderModeGate {
    point_cloud: bool,
    enter_threshold: f32,
    exit_threshold: f32,
    reveal_start_morph: f32,
}

impl RenderModeGate {
    /// Gate with thresholds from `options`, starting assembled.
    pub fn new(options: &MorphOptions) -> Self {
        Self {
            point_cloud: false,
            enter_threshold: options.enter_threshold,
            exit_threshold: options.exit_threshold,
            reveal_start_morph: options.reveal_start_morph,
        }
    }

    /// Current point-cloud flag.
    pub fn point_cloud_enabled(&self) -> bool {
        self.point_cloud
    }

    /// Morph at which dispersal enters point-cloud rendering.
    pub fn enter_threshold(&self) -> f32 {
        self.enter_threshold
    }

    /// Morph at which reassembly leaves point-cloud rendering.
    pub fn exit_threshold(&self) -> f32 {
        self.exit_threshold
    }

    /// Morph below which the reveal window is open while reassembling.
    pub fn reveal_start_morph(&self) -> f32 {
        self.reveal_start_morph
    }

    /// Force the assembled representation without reporting a switch.
    /// Used for mode none and state invalidation; no bridge is armed.
    pub fn force_off(&mut self) {
        self.point_cloud = false;
    }

    /// Advance the gate with this tick's morph state.
    pub fn update(&mut self, state: &MorphState) -> GateStep {
        let was = self.point_cloud;
        let morph = state.morph;
        let mut reveal_blend = 0.0;
        let mut in_reveal = false;

        if state.dispersing {
            if morph >= self.enter_threshold {
                self.point_cloud = true;
            }
        } else if self.reveal_start_morph > 0.0 && morph <= self.reveal_start_morph
        {
            self.point_cloud = false;
            in_reveal = true;
            reveal_blend = 1.0 - smoothstep(0.0, self.reveal_start_morph, morph);
        } else if morph <= self.exit_threshold {
            self.point_cloud = false;
        }

        GateStep {
            point_cloud: self.point_cloud,
            reveal_blend,
            in_reveal,
            switched_off: was && !self.point_cloud,
            switched_on: !was && self.point_cloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(morph: f32, dispersing: bool) -> MorphState {
        MorphState {
            elapsed_seconds: 0.0,
            phase: if dispersing { 0.25 } else { 0.75 },
            dispersing,
            morph,
        }
    }

    #[test]
    fn dispersal_enters_point_cloud_at_threshold() {
        let mut gate = RenderModeGate::new(&MorphOptions::default());
        assert!(!gate.update(&state(0.2, true)).point_cloud);
        let step = gate.update(&state(0.38, true));
        assert!(step.point_cloud);
        assert!(step.switched_on);
        assert!(!gate.update(&state(0.9, true)).switched_on);
    }

    #[test]
    fn reveal_window_forces_assembled_and_reports_switch() {
        let mut gate = RenderModeGate::new(&MorphOptions::default());
        let _ = gate.update(&state(0.5, true));
        let held = gate.update(&state(0.5, false));
        assert!(held.point_cloud);
        assert_eq!(held.reveal_blend, 0.0);
        assert!(!held.in_reveal);

        let step = gate.update(&state(0.3, false));
        assert!(!step.point_cloud);
        assert!(step.switched_off);
        assert!(step.in_reveal);
        assert!(step.reveal_blend > 0.0 && step.reveal_blend < 1.0);

        let later = gate.update(&state(0.0, false));
        assert!(!later.switched_off);
        assert!((later.reveal_blend - 1.0).abs() < 1e-6);
    }

    #[test]
    fn exit_threshold_applies_without_reveal_window() {
        let options = MorphOptions {
            reveal_start_morph: 0.0,
            ..MorphOptions::default()
        };
        let mut gate = RenderModeGate::new(&options);
        let _ = gate.update(&state(0.6, true));
        assert!(gate.update(&state(0.1, false)).point_cloud);
        let step = gate.update(&state(0.02, false));
        assert!(step.switched_off);
        assert_eq!(step.reveal_blend, 0.0);
    }

    #[test]
    fn force_off_is_silent() {
        let mut gate = RenderModeGate::new(&MorphOptions::default());
        let _ = gate.update(&state(0.6, true));
        gate.force_off();
        assert!(!gate.point_cloud_enabled());
        let step = gate.update(&state(0.1, true));
        assert!(!step.switched_off);
    }
}
