//! Mode, performance and options setters for [`MorphEngine`].

use log::{info, warn};

use super::MorphEngine;
use crate::animation::{AnimationMode, MorphController};
use crate::options::{DeviceClass, Options, PerformanceLevel};

impl MorphEngine {
    /// Resolve `name` through the alias table and switch to it. Unknown
    /// names select mode none. The morph loop restarts at the next tick.
    ///
    /// Returns the mode actually applied, which is none while the loaded
    /// asset lacks a displacement slot.
    pub fn set_animation_mode(&mut self, name: &str) -> AnimationMode {
        let mut mode = AnimationMode::resolve(name);
        if mode.is_animated() && !self.kernel_available {
            warn!("animation mode {mode} requested without a displacement slot; staying at none");
            mode = AnimationMode::None;
        }
        let _ = self.controller.set_mode(mode, self.clock_now());
        self.restart_pending = true;
        mode
    }

    /// Change the performance tier. Capacity, spawn cadence, probe budget
    /// and pixel density follow immediately.
    pub fn set_performance_level(&mut self, level: PerformanceLevel) {
        if self.options.performance.level == level {
            return;
        }
        self.options.performance.level = level;
        self.markers
            .set_performance(self.options.performance.device, level);
        info!("performance level -> {level:?}");
    }

    /// Change the device class.
    pub fn set_device_class(&mut self, device: DeviceClass) {
        if self.options.performance.device == device {
            return;
        }
        self.options.performance.device = device;
        self.controller.set_device(device);
        self.markers
            .set_performance(device, self.options.performance.level);
        info!("device class -> {device:?}");
    }

    /// Replace all options. The current mode survives; blend state and
    /// the morph loop restart.
    pub fn set_options(&mut self, new: Options) {
        self.options = new;
        self.apply_options();
    }

    /// Push the current option values to the morph controller and the
    /// marker field.
    pub fn apply_options(&mut self) {
        let mode = self.controller.mode();
        let now = self.clock_now();
        self.controller = MorphController::new(
            &self.options.morph,
            &self.options.bridge,
            self.options.performance.device,
            now,
        );
        let _ = self.controller.set_mode(mode, now);
        self.restart_pending = true;
        self.markers.reconfigure(&self.options);
    }
}
