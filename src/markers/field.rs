//! The marker subsystem: owns every floating marker and runs spawning,
//! physics, occlusion, lifecycle and presentation once per frame.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;

use super::lifecycle::DissipateReason;
use super::marker::{
    FloatingMarker, MarkerId, MarkerPhase, MarkerSurface, MarkerVisual,
};
use super::occlusion::{FrameProbe, OcclusionProbe};
use super::physics;
use super::spawner::MarkerSpawner;
use crate::camera::Projector;
use crate::input::{PointerEvent, Viewport};
use crate::options::{
    DeviceClass, MarkerOptions, OcclusionOptions, Options, PerformanceLevel,
    PhysicsOptions, TierTable,
};
use crate::scene::SceneFrame;

/// Per-frame inputs for [`MarkerField::tick`].
pub struct MarkerTick<'a> {
    /// Injected monotonic time in seconds.
    pub now: f64,
    /// Seconds since the previous tick (clamped internally).
    pub dt: f32,
    /// Bounding frame of the current asset.
    pub frame: SceneFrame,
    /// Output surface geometry.
    pub viewport: Viewport,
    /// World to screen mapping.
    pub projector: &'a dyn Projector,
    /// Rendered-frame alpha access.
    pub probe: &'a dyn FrameProbe,
}

/// Counters from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerStats {
    /// Markers alive after the tick.
    pub live: usize,
    /// Markers presented on screen.
    pub visible: usize,
    /// Markers spawned this tick.
    pub spawned: usize,
    /// Markers removed this tick (swept or evicted).
    pub removed: usize,
}

/// Owns the floating markers.
pub struct MarkerField {
    markers: Vec<FloatingMarker>,
    spawner: MarkerSpawner,
    probe: OcclusionProbe,
    rng: StdRng,
    options: MarkerOptions,
    physics: PhysicsOptions,
    occlusion: OcclusionOptions,
    pixel_ratio_caps: TierTable<f32>,
    device: DeviceClass,
    level: PerformanceLevel,
    messages: Vec<Arc<str>>,
    surface: Option<Box<dyn MarkerSurface>>,
    next_id: u64,
}

impl fmt::Debug for MarkerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerField")
            .field("markers", &self.markers.len())
            .field("device", &self.device)
            .field("level", &self.level)
            .field("messages", &self.messages.len())
            .field("has_surface", &self.surface.is_some())
            .field("next_spawn_at", &self.spawner.next_spawn_at())
            .finish_non_exhaustive()
    }
}

impl MarkerField {
    /// Empty field configured from `options`, drawing randomness from `rng`.
    pub fn new(options: &Options, rng: StdRng) -> Self {
        let device = options.performance.device;
        let level = options.performance.level;
        Self {
            markers: Vec::new(),
            spawner: MarkerSpawner::new(),
            probe: OcclusionProbe::new(&options.occlusion, device, level),
            rng,
            options: options.markers.clone(),
            physics: options.physics.clone(),
            occlusion: options.occlusion.clone(),
            pixel_ratio_caps: options.performance.pixel_ratio_cap,
            device,
            level,
            messages: Vec::new(),
            surface: None,
            next_id: 0,
        }
    }

    /// All markers, oldest first (dissipating ones until the next sweep).
    pub fn markers(&self) -> &[FloatingMarker] {
        &self.markers
    }

    /// Markers not yet dissipating.
    pub fn live_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_live()).count()
    }

    /// The open text marker, if any.
    pub fn active_marker(&self) -> Option<&FloatingMarker> {
        self.markers
            .iter()
            .find(|m| m.phase() == MarkerPhase::Active)
    }

    /// Marker by id.
    pub fn get(&self, id: MarkerId) -> Option<&FloatingMarker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    /// Live marker cap for the current device and tier.
    pub fn capacity(&self) -> usize {
        self.options.capacity.get(self.device, self.level)
    }

    /// Device-pixel-ratio cap for the current device and tier.
    pub fn pixel_ratio_cap(&self) -> f32 {
        self.pixel_ratio_caps.get(self.device, self.level)
    }

    /// Time of the next scheduled spawn.
    pub fn next_spawn_at(&self) -> Option<f64> {
        self.spawner.next_spawn_at()
    }

    /// Whether a presentation surface is attached.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Replace the presentation surface and the text pool. Existing
    /// markers are cleared from the old surface and dropped.
    pub fn set_surface<I, S>(&mut self, surface: Box<dyn MarkerSurface>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear();
        self.messages = messages
            .into_iter()
            .map(|m| m.as_ref().trim().to_owned())
            .filter(|m| !m.is_empty())
            .map(Arc::from)
            .collect();
        self.surface = Some(surface);
        info!("marker surface attached with {} messages", self.messages.len());
    }

    /// Detach and clear the presentation surface.
    pub fn detach_surface(&mut self) {
        self.clear();
        self.surface = None;
    }

    /// Drop every marker and the pending spawn.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.spawner.suspend();
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.clear();
        }
    }

    /// Apply a device class and tier: capacity, probe budget and pixel
    /// density change immediately.
    pub fn set_performance(&mut self, device: DeviceClass, level: PerformanceLevel) {
        self.device = device;
        self.level = level;
        self.probe = OcclusionProbe::new(&self.occlusion, device, level);
        let evicted = self.enforce_capacity();
        if evicted > 0 {
            debug!("evicted {evicted} markers after performance change");
        }
    }

    /// Adopt new tuning. Live markers keep their traits; capacity and the
    /// probe budget apply immediately.
    pub fn reconfigure(&mut self, options: &Options) {
        self.options = options.markers.clone();
        self.physics = options.physics.clone();
        self.occlusion = options.occlusion.clone();
        self.pixel_ratio_caps = options.performance.pixel_ratio_cap;
        self.set_performance(options.performance.device, options.performance.level);
    }

    /// React to a pointer event. Returns `true` when a marker consumed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let at = event.position();
        match event {
            PointerEvent::Press { .. } => {
                let Some(active) = self.active_index() else {
                    return false;
                };
                if self.hits(&self.markers[active], at) {
                    return true;
                }
                self.markers[active].dissipate(DissipateReason::Closed)
            }
            PointerEvent::Click { .. } => match self.hit_test(at) {
                Some(idx) => {
                    let marker = &self.markers[idx];
                    match marker.phase() {
                        MarkerPhase::Active => true,
                        MarkerPhase::Alive if marker.kind().is_text() => {
                            self.activate(idx);
                            true
                        }
                        MarkerPhase::Alive => {
                            let popped =
                                self.markers[idx].dissipate(DissipateReason::Dismissed);
                            self.close_active() || popped
                        }
                        MarkerPhase::Spawning | MarkerPhase::Dissipating => {
                            self.close_active()
                        }
                    }
                }
                None => self.close_active(),
            },
        }
    }

    /// Close the open text marker. Returns `false` if none was open.
    pub fn close_active(&mut self) -> bool {
        match self.active_index() {
            Some(idx) => self.markers[idx].dissipate(DissipateReason::Closed),
            None => false,
        }
    }

    fn active_index(&self) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| m.phase() == MarkerPhase::Active)
    }

    fn hit_radius(&self, marker: &FloatingMarker) -> f32 {
        let base = if marker.kind().is_text() {
            self.options.text_hit_radius_px
        } else {
            self.options.plain_hit_radius_px
        };
        base * marker.scale().max(0.1)
    }

    fn hits(&self, marker: &FloatingMarker, at: Vec2) -> bool {
        marker
            .screen()
            .is_some_and(|s| s.distance(at) <= self.hit_radius(marker))
    }

    /// Topmost (newest) interactive marker under `at`.
    fn hit_test(&self, at: Vec2) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, m)| {
                matches!(m.phase(), MarkerPhase::Alive | MarkerPhase::Active)
            })
            .find(|(_, m)| self.hits(m, at))
            .map(|(idx, _)| idx)
    }

    fn activate(&mut self, idx: usize) {
        for (i, marker) in self.markers.iter_mut().enumerate() {
            if i != idx && marker.is_live() {
                let _ = marker.dissipate(DissipateReason::Displaced);
            }
        }
        if self.markers[idx].activate() {
            self.spawner.suspend();
            info!("{} opened", self.markers[idx].id());
        }
    }

    /// Remove the oldest non-active markers until the live count fits the
    /// capacity. Returns how many were removed.
    fn enforce_capacity(&mut self) -> usize {
        let capacity = self.capacity();
        let mut removed = 0;
        while self.live_count() > capacity {
            let Some(idx) = self
                .markers
                .iter()
                .position(|m| m.is_live() && m.phase() != MarkerPhase::Active)
            else {
                break;
            };
            let marker = self.markers.remove(idx);
            if let (Some(surface), Some(burst)) =
                (self.surface.as_deref_mut(), marker.burst())
            {
                surface.burst(&burst);
            }
            trace!("{} removed: {}", marker.id(), DissipateReason::Evicted);
            removed += 1;
        }
        removed
    }

    /// Remove dissipating markers, bursting each at its last position.
    fn sweep(&mut self) -> usize {
        let before = self.markers.len();
        let surface = &mut self.surface;
        self.markers.retain(|m| {
            if m.is_live() {
                return true;
            }
            if let (Some(surface), Some(burst)) = (surface.as_deref_mut(), m.burst()) {
                surface.burst(&burst);
            }
            false
        });
        before - self.markers.len()
    }

    fn spawn(&mut self, tick: &MarkerTick<'_>) {
        let live_text = self
            .markers
            .iter()
            .filter(|m| m.is_live() && m.kind().is_text())
            .count();
        let text_cap = self.options.text_cap.get(self.device, self.level);
        let kind = MarkerSpawner::classify(
            &mut self.rng,
            &self.messages,
            live_text,
            text_cap,
            self.options.text_probability,
        );
        let traits = MarkerSpawner::traits(&mut self.rng, &self.options, tick.frame);

        let retries = self.options.placement_retries.get(self.device, self.level);
        let ratio = tick
            .viewport
            .effective_pixel_ratio(self.pixel_ratio_caps.get(self.device, self.level));
        let probe = &self.probe;
        let placement = MarkerSpawner::place(
            &mut self.rng,
            &self.options,
            tick.frame,
            retries,
            |p| {
                physics::project_to_screen(tick.projector, &tick.viewport, p)
                    .is_some_and(|at| probe.covered(tick.probe, at, ratio))
            },
        );
        if placement.fell_back {
            debug!("marker placement exhausted {} retries", placement.pushes);
        }

        let id = MarkerId(self.next_id);
        self.next_id += 1;
        let mut marker = FloatingMarker::new(
            id,
            kind,
            traits,
            placement.position,
            placement.velocity,
            placement.outward,
            tick.now,
            self.options.spawn_reveal_seconds,
        );
        physics::update_visual(&mut marker, tick.projector, &tick.viewport, &self.physics);
        trace!("{id} spawned ({:?})", marker.kind());
        self.markers.push(marker);
    }

    fn update_markers(&mut self, tick: &MarkerTick<'_>, dt: f32) {
        let cap = self.pixel_ratio_caps.get(self.device, self.level);
        for marker in &mut self.markers {
            if !marker.is_live() {
                continue;
            }
            marker.age(tick.now);
            physics::integrate(marker, tick.now, dt, tick.frame, &self.physics, &mut self.rng);
            if !physics::is_finite(marker) {
                warn!("{} has non-finite state; dissipating", marker.id());
                let _ = marker.dissipate(DissipateReason::Invalid);
                continue;
            }
            physics::update_visual(marker, tick.projector, &tick.viewport, &self.physics);
            marker.settle(tick.now);
            if marker.phase() == MarkerPhase::Alive {
                self.probe
                    .refresh(marker, tick.now, tick.probe, &tick.viewport, cap);
            }
            let _ = marker.auto_dissipate(self.physics.invisible_alpha);
        }
    }

    fn schedule_spawns(&mut self, tick: &MarkerTick<'_>) -> usize {
        if self.active_marker().is_some() {
            self.spawner.suspend();
            return 0;
        }
        match self.spawner.next_spawn_at() {
            None => {
                self.spawner.schedule(
                    tick.now,
                    &mut self.rng,
                    &self.options,
                    self.device,
                    self.level,
                );
                0
            }
            Some(_) if self.spawner.is_due(tick.now) => {
                self.spawn(tick);
                self.spawner.schedule(
                    tick.now,
                    &mut self.rng,
                    &self.options,
                    self.device,
                    self.level,
                );
                1
            }
            Some(_) => 0,
        }
    }

    /// Advance every marker one frame and present the result.
    pub fn tick(&mut self, tick: &MarkerTick<'_>) -> MarkerStats {
        let dt = if tick.dt.is_finite() {
            tick.dt.clamp(0.0, self.physics.max_dt)
        } else {
            0.0
        };

        self.update_markers(tick, dt);
        let mut removed = self.sweep();

        let spawned = if self.surface.is_some() {
            self.schedule_spawns(tick)
        } else {
            0
        };
        removed += self.enforce_capacity();

        let visuals: Vec<MarkerVisual> = self
            .markers
            .iter()
            .filter(|m| m.is_live())
            .filter_map(FloatingMarker::visual)
            .collect();
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.present(&visuals);
        }

        MarkerStats {
            live: self.live_count(),
            visible: visuals.len(),
            spawned,
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;

    use super::*;
    use crate::markers::marker::{MarkerKind, MarkerTraits};

    fn placed(id: u64, kind: MarkerKind, phase: MarkerPhase, at: Vec2) -> FloatingMarker {
        let traits = MarkerTraits {
            seed: 0.5,
            life_seconds: 9.0,
            drift_radius: 1.5,
            outward_accel: 0.0,
            start_scale: 1.0,
            end_scale: 1.0,
            max_alpha: 1.0,
            color: [1.0; 3],
        };
        let mut marker = FloatingMarker::new(
            MarkerId(id),
            kind,
            traits,
            Vec3::X,
            Vec3::ZERO,
            Vec3::X,
            0.0,
            0.0,
        );
        marker.phase = phase;
        marker.screen = Some(at);
        marker
    }

    fn field_with_open_text() -> MarkerField {
        let mut field = MarkerField::new(&Options::default(), StdRng::seed_from_u64(9));
        field.markers.push(placed(
            1,
            MarkerKind::Text("hello".into()),
            MarkerPhase::Active,
            Vec2::new(100.0, 100.0),
        ));
        field.markers.push(placed(
            2,
            MarkerKind::Plain,
            MarkerPhase::Alive,
            Vec2::new(600.0, 400.0),
        ));
        field
    }

    #[test]
    fn popping_a_plain_marker_closes_the_open_one() {
        let mut field = field_with_open_text();
        assert!(field.handle_pointer(PointerEvent::Click { x: 600.0, y: 400.0 }));
        assert!(field.active_marker().is_none());
        assert_eq!(field.live_count(), 0);
    }

    #[test]
    fn clicking_the_open_marker_keeps_it() {
        let mut field = field_with_open_text();
        assert!(field.handle_pointer(PointerEvent::Click { x: 100.0, y: 100.0 }));
        assert_eq!(field.active_marker().map(FloatingMarker::id), Some(MarkerId(1)));
        assert_eq!(field.live_count(), 2);
    }

    #[test]
    fn clicking_empty_space_closes_the_open_marker() {
        let mut field = field_with_open_text();
        assert!(field.handle_pointer(PointerEvent::Click { x: 1000.0, y: 50.0 }));
        assert!(field.active_marker().is_none());
        assert_eq!(field.live_count(), 1);
    }
}
