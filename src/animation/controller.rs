//! Per-frame morph pipeline: clock, gate, bridge, kernel parameters.

use log::info;

use super::bridge::{blend_targets, TargetShape, TransitionBridge};
use super::clock::{MorphClock, MorphState};
use super::gate::{GateStep, RenderModeGate};
use super::kernel::{frame_strength, KernelParams};
use super::mode::AnimationMode;
use crate::options::{BridgeOptions, DeviceClass, MorphOptions};
use crate::scene::SceneFrame;

/// Everything the morph pipeline produced for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphFrame {
    /// Clock sample shared by every stage of this tick.
    pub state: MorphState,
    /// Gate outcome.
    pub gate: GateStep,
    /// Parameters for the displacement slot.
    pub params: KernelParams,
}

impl MorphFrame {
    /// Whether point-cloud rendering is on this tick.
    pub fn point_cloud(&self) -> bool {
        self.gate.point_cloud
    }

    /// Applied colour gain.
    pub fn color_gain(&self) -> f32 {
        self.params.color_gain
    }

    /// Applied element scale.
    pub fn element_scale(&self) -> f32 {
        self.params.element_scale
    }
}

/// Owns the morph state machine.
///
/// The clock is sampled exactly once per [`tick`](Self::tick) and that
/// single [`MorphState`] feeds the gate, the bridge and the kernel
/// parameters.
#[derive(Debug, Clone)]
pub struct MorphController {
    mode: AnimationMode,
    clock: MorphClock,
    gate: RenderModeGate,
    bridge: TransitionBridge,
    reveal_open: bool,
    constrained_boost: f32,
    device: DeviceClass,
}

impl MorphController {
    /// Controller in mode none, clock started at `now`.
    pub fn new(
        morph: &MorphOptions,
        bridge: &BridgeOptions,
        device: DeviceClass,
        now: f64,
    ) -> Self {
        Self {
            mode: AnimationMode::None,
            clock: MorphClock::new(morph.loop_seconds, now),
            gate: RenderModeGate::new(morph),
            bridge: TransitionBridge::new(bridge),
            reveal_open: false,
            constrained_boost: bridge.constrained_scale_boost,
            device,
        }
    }

    /// Current canonical mode.
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Switch modes. Restarts the loop at morph 0 with the assembled
    /// representation. Entering or leaving mode none returns to neutral
    /// values; between animated modes a point cloud that was on hands
    /// off through the bridges like any other switch-off.
    ///
    /// Returns the previous mode.
    pub fn set_mode(&mut self, mode: AnimationMode, now: f64) -> AnimationMode {
        let previous = self.mode;
        self.mode = mode;
        self.clock.reset(now);
        self.reveal_open = false;
        if previous.is_animated() != mode.is_animated() {
            self.gate.force_off();
            self.bridge.reset();
        } else if self.gate.point_cloud_enabled() {
            self.gate.force_off();
            self.bridge.arm(now);
        } else {
            self.bridge.cancel();
        }
        if previous != mode {
            info!("animation mode {previous} -> {mode}");
        }
        previous
    }

    /// Update the device class used for the constrained scale boost.
    pub fn set_device(&mut self, device: DeviceClass) {
        self.device = device;
    }

    /// Move the loop start to `now` without touching gate or bridge.
    pub fn restart_clock(&mut self, now: f64) {
        self.clock.reset(now);
    }

    /// Drop all blend state (asset reloads). The mode is kept.
    pub fn invalidate(&mut self, now: f64) {
        self.clock.reset(now);
        self.gate.force_off();
        self.bridge.reset();
        self.reveal_open = false;
    }

    /// Advance one frame. `dt` is the time since the previous tick.
    pub fn tick(&mut self, now: f64, dt: f32, frame: SceneFrame) -> MorphFrame {
        if !self.mode.is_animated() {
            self.gate.force_off();
            self.bridge.reset();
            self.reveal_open = false;
            return MorphFrame {
                state: MorphState::IDLE,
                gate: GateStep::default(),
                params: KernelParams::neutral(frame),
            };
        }

        let state = self.clock.sample(now);
        let step = self.gate.update(&state);
        let reveal_opened = step.in_reveal && !self.reveal_open;
        self.reveal_open = step.in_reveal;
        if step.switched_off {
            self.bridge.arm(now);
        } else if step.switched_on || reveal_opened {
            // the window pre-empts a hand-off still running from earlier
            self.bridge.cancel();
        }

        let shape = TargetShape {
            enter: self.gate.enter_threshold(),
            exit: self.gate.exit_threshold(),
            reveal_start: self.gate.reveal_start_morph(),
            constrained_boost: self
                .device
                .is_constrained()
                .then_some(self.constrained_boost),
        };
        let targets = blend_targets(&state, &step, &shape);
        let (color_gain, element_scale) = self.bridge.update(now, dt, &targets);

        let params = KernelParams {
            time: state.elapsed_seconds,
            mode: self.mode.kernel_id(),
            morph: state.morph,
            color_gain,
            strength: frame_strength(self.mode, state.morph),
            element_scale,
            point_cloud: u32::from(step.point_cloud),
            ..KernelParams::neutral(frame)
        };

        MorphFrame {
            state,
            gate: step,
            params,
        }
    }
}
