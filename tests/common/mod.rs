//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;
use morpho::animation::{DisplacementSlot, KernelParams};
use morpho::camera::core::Camera;
use morpho::engine::{FrameInput, FrameOutput, MorphEngine};
use morpho::input::Viewport;
use morpho::markers::{BurstEffect, FrameProbe, MarkerSurface, MarkerVisual};
use morpho::options::Options;
use morpho::scene::{SceneFrame, SceneTarget, SphereLoader};

pub const DT: f64 = 1.0 / 60.0;

/// Everything a [`RecordingSurface`] saw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub last_frame: Vec<MarkerVisual>,
    pub presents: usize,
    pub bursts: Vec<BurstEffect>,
    pub clears: usize,
}

/// Surface that records into shared state the test keeps a handle to.
pub struct RecordingSurface(pub Rc<RefCell<Recorded>>);

impl RecordingSurface {
    pub fn new() -> (Box<dyn MarkerSurface>, Rc<RefCell<Recorded>>) {
        let shared = Rc::new(RefCell::new(Recorded::default()));
        (Box::new(Self(Rc::clone(&shared))), shared)
    }
}

impl MarkerSurface for RecordingSurface {
    fn present(&mut self, visuals: &[MarkerVisual]) {
        let mut rec = self.0.borrow_mut();
        rec.last_frame = visuals.to_vec();
        rec.presents += 1;
    }

    fn burst(&mut self, effect: &BurstEffect) {
        self.0.borrow_mut().bursts.push(*effect);
    }

    fn clear(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.last_frame.clear();
        rec.clears += 1;
    }
}

/// Observable state of a [`TrackedAsset`].
#[derive(Debug, Default)]
pub struct AssetLog {
    pub released: Cell<bool>,
    pub point_cloud: Cell<bool>,
    pub element_scale: Cell<f32>,
    pub params: RefCell<Vec<KernelParams>>,
}

struct ParamSink(Rc<AssetLog>);

impl DisplacementSlot for ParamSink {
    fn write_params(&mut self, params: &KernelParams) {
        self.0.params.borrow_mut().push(*params);
    }
}

/// Scene target whose effects stay visible after the engine takes it.
pub struct TrackedAsset {
    frame: SceneFrame,
    slot: Option<ParamSink>,
    log: Rc<AssetLog>,
}

impl TrackedAsset {
    pub fn new(radius: f32, with_slot: bool) -> (Box<dyn SceneTarget>, Rc<AssetLog>) {
        let log = Rc::new(AssetLog::default());
        let asset = Self {
            frame: SceneFrame::new(Vec3::ZERO, radius),
            slot: with_slot.then(|| ParamSink(Rc::clone(&log))),
            log: Rc::clone(&log),
        };
        (Box::new(asset), log)
    }
}

impl SceneTarget for TrackedAsset {
    fn frame(&self) -> SceneFrame {
        self.frame
    }

    fn set_point_cloud(&mut self, enabled: bool) {
        self.log.point_cloud.set(enabled);
    }

    fn set_element_scale(&mut self, scale: f32) {
        self.log.element_scale.set(scale);
    }

    fn displacement_slot(&mut self) -> Option<&mut dyn DisplacementSlot> {
        match &mut self.slot {
            Some(sink) => Some(sink),
            None => None,
        }
    }

    fn release(&mut self) {
        self.log.released.set(true);
    }
}

/// Options with a fixed seed and fast marker turnover.
pub fn test_options(seed: u64) -> Options {
    let mut options = Options::default();
    options.performance.seed = Some(seed);
    options.markers.min_gap_seconds = 0.05;
    options.markers.max_gap_seconds = 0.1;
    options
}

/// Engine with a unit sphere loaded.
pub fn loaded_engine(options: Options) -> MorphEngine {
    let mut engine = MorphEngine::new(options);
    let _ = pollster::block_on(engine.load_asset(&SphereLoader::default(), "sphere:400"))
        .unwrap();
    engine
}

/// Fixed camera and viewport that tick an engine forward in time.
pub struct Driver {
    pub now: f64,
    pub viewport: Viewport,
    pub camera: Camera,
}

impl Driver {
    pub fn new(start: f64) -> Self {
        let viewport = Viewport::new(1280.0, 720.0, 1.0);
        Self {
            now: start,
            viewport,
            camera: Camera::framing(SceneFrame::new(Vec3::ZERO, 1.0), viewport.aspect()),
        }
    }

    pub fn tick(&mut self, engine: &mut MorphEngine, probe: &dyn FrameProbe) -> FrameOutput {
        let output = engine
            .tick(&FrameInput {
                now: self.now,
                viewport: self.viewport,
                projector: &self.camera,
                probe,
            })
            .unwrap();
        self.now += DT;
        output
    }

    /// Tick `frames` times, checking `each` after every frame.
    pub fn run(
        &mut self,
        engine: &mut MorphEngine,
        probe: &dyn FrameProbe,
        frames: usize,
        mut each: impl FnMut(&MorphEngine, &FrameOutput),
    ) -> Option<FrameOutput> {
        let mut last = None;
        for _ in 0..frames {
            let out = self.tick(engine, probe);
            each(engine, &out);
            last = Some(out);
        }
        last
    }
}
