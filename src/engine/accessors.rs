//! Read-only queries for [`MorphEngine`].

use super::MorphEngine;
use crate::animation::AnimationMode;
use crate::camera::core::Camera;
use crate::markers::MarkerField;
use crate::options::{DeviceClass, Options, PerformanceLevel};
use crate::scene::SceneFrame;

impl MorphEngine {
    /// Current animation mode.
    pub fn animation_mode(&self) -> AnimationMode {
        self.controller.mode()
    }

    /// Current performance tier.
    pub fn performance_level(&self) -> PerformanceLevel {
        self.options.performance.level
    }

    /// Current device class.
    pub fn device_class(&self) -> DeviceClass {
        self.options.performance.device
    }

    /// Active options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The marker field.
    pub fn markers(&self) -> &MarkerField {
        &self.markers
    }

    /// Frame of the loaded asset.
    pub fn scene_frame(&self) -> Option<SceneFrame> {
        self.scene.as_ref().map(|scene| scene.frame())
    }

    /// Whether an asset is loaded.
    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// Version of the most recent load.
    pub fn load_version(&self) -> u64 {
        self.load_version
    }

    /// Whether the loaded asset accepts displacement parameters.
    pub fn kernel_available(&self) -> bool {
        self.kernel_available
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Camera framing the loaded asset (or the unit sphere) at `aspect`.
    pub fn framing_camera(&self, aspect: f32) -> Camera {
        Camera::framing(self.scene_frame().unwrap_or_default(), aspect)
    }

    /// Smoothed frames per second over recent ticks.
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }
}
