//! The engine facade: owns the morph controller, the marker field and the
//! loaded asset, and advances all of them once per host frame.
//!
//! Methods are split by concern across the submodules; [`MorphEngine::tick`]
//! and [`MorphEngine::dispose`] live here.

mod accessors;
pub mod command;
mod input;
mod options;
mod scene_management;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use self::command::EngineCommand;
pub use self::scene_management::{LoadOutcome, LoadTicket};
use crate::animation::{AnimationMode, KernelParams, MorphController};
use crate::camera::Projector;
use crate::error::MorphoError;
use crate::input::Viewport;
use crate::markers::{FrameProbe, MarkerField, MarkerStats, MarkerTick};
use crate::options::Options;
use crate::scene::{SceneFrame, SceneTarget};
use crate::util::frame_timing::FrameTiming;

/// Per-frame inputs for [`MorphEngine::tick`].
pub struct FrameInput<'a> {
    /// Monotonic time in seconds, supplied by the host.
    pub now: f64,
    /// Output surface geometry in CSS pixels.
    pub viewport: Viewport,
    /// World to normalized-device mapping of the active camera.
    pub projector: &'a dyn Projector,
    /// Alpha access to the last rendered frame.
    pub probe: &'a dyn FrameProbe,
}

/// Snapshot published after every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Mode the kernel ran in.
    pub mode: AnimationMode,
    /// Parameters written to the displacement slot.
    pub params: KernelParams,
    /// Whether the asset renders as a point cloud.
    pub point_cloud: bool,
    /// Applied colour gain.
    pub color_gain: f32,
    /// Applied element scale.
    pub element_scale: f32,
    /// Device-pixel-ratio cap for the renderer.
    pub pixel_ratio_cap: f32,
    /// Marker counters.
    pub markers: MarkerStats,
}

/// The morph and floating-marker controller.
///
/// Owns the morph pipeline, the marker field and the currently loaded
/// asset. Everything runs on the caller's thread: one
/// [`tick`](Self::tick) per rendered frame, with time injected through
/// [`FrameInput::now`].
///
/// # Loading
///
/// [`load_asset`](Self::load_asset) fetches and installs an asset in one
/// call. Hosts that drive their own executor can split it into
/// [`begin_load`](Self::begin_load) and
/// [`complete_load`](Self::complete_load); a load that completes after a
/// newer one began is released and reported as
/// [`LoadOutcome::Superseded`].
///
/// # Teardown
///
/// [`dispose`](Self::dispose) releases the asset and detaches the marker
/// surface. It is idempotent and runs on drop.
pub struct MorphEngine {
    options: Options,
    controller: MorphController,
    markers: MarkerField,
    scene: Option<Box<dyn SceneTarget>>,
    timing: FrameTiming,
    load_version: u64,
    /// Time of the most recent tick.
    last_now: Option<f64>,
    /// Re-anchor the morph loop at the next tick.
    restart_pending: bool,
    /// Cleared when the loaded asset has no displacement slot.
    kernel_available: bool,
    disposed: bool,
}

impl std::fmt::Debug for MorphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphEngine")
            .field("mode", &self.controller.mode())
            .field("markers", &self.markers)
            .field("has_scene", &self.scene.is_some())
            .field("load_version", &self.load_version)
            .field("kernel_available", &self.kernel_available)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl MorphEngine {
    /// Engine with no asset, mode none and no marker surface.
    ///
    /// Randomness is seeded from `options.performance.seed` when set, or
    /// from the OS otherwise.
    pub fn new(options: Options) -> Self {
        let rng = match options.performance.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let controller = MorphController::new(
            &options.morph,
            &options.bridge,
            options.performance.device,
            0.0,
        );
        let markers = MarkerField::new(&options, rng);
        info!(
            "morph engine ready ({:?}, {:?})",
            options.performance.device, options.performance.level
        );
        Self {
            options,
            controller,
            markers,
            scene: None,
            timing: FrameTiming::new(),
            load_version: 0,
            last_now: None,
            restart_pending: true,
            kernel_available: true,
            disposed: false,
        }
    }

    /// Advance one frame: sample the morph clock, apply the render mode
    /// and element scale to the asset, publish kernel parameters, then
    /// run the marker field.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::Disposed`] after [`dispose`](Self::dispose).
    pub fn tick(&mut self, input: &FrameInput<'_>) -> Result<FrameOutput, MorphoError> {
        if self.disposed {
            return Err(MorphoError::Disposed);
        }
        let now = input.now;
        let dt = self.timing.advance(now);
        self.last_now = Some(now);
        if std::mem::take(&mut self.restart_pending) {
            self.controller.restart_clock(now);
        }

        let frame = self
            .scene
            .as_ref()
            .map_or_else(SceneFrame::default, |scene| scene.frame());
        let morph = self.controller.tick(now, dt, frame);

        let mut slot_missing = false;
        if let Some(scene) = self.scene.as_deref_mut() {
            scene.set_point_cloud(morph.point_cloud());
            scene.set_element_scale(morph.element_scale());
            match scene.displacement_slot() {
                Some(slot) => slot.write_params(&morph.params),
                None => slot_missing = true,
            }
        }
        if slot_missing && self.kernel_available {
            self.degrade_animation("asset lost its displacement slot");
        }

        let markers = if self.scene.is_some() {
            self.markers.tick(&MarkerTick {
                now,
                dt,
                frame,
                viewport: input.viewport,
                projector: input.projector,
                probe: input.probe,
            })
        } else {
            MarkerStats::default()
        };

        Ok(FrameOutput {
            mode: self.controller.mode(),
            params: morph.params,
            point_cloud: morph.point_cloud(),
            color_gain: morph.color_gain(),
            element_scale: morph.element_scale(),
            pixel_ratio_cap: self.markers.pixel_ratio_cap(),
            markers,
        })
    }

    /// Release the asset and detach the marker surface. Later calls are
    /// no-ops; later ticks and loads fail with [`MorphoError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.load_version += 1;
        if let Some(mut scene) = self.scene.take() {
            scene.release();
        }
        self.markers.detach_surface();
        let _ = self.controller.set_mode(AnimationMode::None, self.clock_now());
        info!("morph engine disposed");
    }

    /// Log a [`MorphoError::KernelPatch`] and fall back to mode none.
    fn degrade_animation(&mut self, reason: &str) {
        let err = MorphoError::KernelPatch(reason.to_owned());
        error!("{err}; animation disabled");
        self.kernel_available = false;
        let _ = self.controller.set_mode(AnimationMode::None, self.clock_now());
    }

    fn clock_now(&self) -> f64 {
        self.last_now.unwrap_or(0.0)
    }
}

impl Drop for MorphEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
