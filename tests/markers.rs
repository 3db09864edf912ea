//! Floating markers through the engine: capacity, expiry, activation,
//! dismissal and occlusion probing.

mod common;

use common::{loaded_engine, test_options, Driver, RecordingSurface};
use glam::Vec2;
use morpho::engine::MorphEngine;
use morpho::input::PointerEvent;
use morpho::markers::{AlphaFrame, FloatingMarker, MarkerId, MarkerPhase, NoReadback};
use morpho::options::{Options, PerformanceLevel, TierTable};

const MESSAGES: [&str; 3] = ["first", "second", "third"];

fn transparent() -> AlphaFrame {
    AlphaFrame::transparent(1280, 720)
}

fn opaque() -> AlphaFrame {
    let mut frame = AlphaFrame::transparent(1280, 720);
    frame.fill_disc(640.0, 360.0, 2000.0, 255);
    frame
}

fn text_only(seed: u64) -> Options {
    let mut options = test_options(seed);
    options.markers.text_probability = 1.0;
    options.markers.text_cap = TierTable {
        desktop_high: 14,
        desktop_low: 8,
        mobile_high: 8,
        mobile_low: 5,
    };
    options
}

fn active_count(engine: &MorphEngine) -> usize {
    engine
        .markers()
        .markers()
        .iter()
        .filter(|m| m.phase() == MarkerPhase::Active)
        .count()
}

/// An alive marker of the requested kind comfortably inside the viewport.
fn clickable(engine: &MorphEngine, text: bool) -> Option<(MarkerId, Vec2)> {
    engine
        .markers()
        .markers()
        .iter()
        .filter(|m| m.phase() == MarkerPhase::Alive && m.kind().is_text() == text)
        .find_map(|m: &FloatingMarker| {
            let at = m.screen()?;
            let inside = (60.0..1220.0).contains(&at.x) && (60.0..660.0).contains(&at.y);
            inside.then_some((m.id(), at))
        })
}

#[test]
fn no_surface_means_no_markers() {
    let mut engine = loaded_engine(test_options(20));
    let probe = transparent();
    let mut driver = Driver::new(0.0);
    let _ = driver.run(&mut engine, &probe, 300, |engine, out| {
        assert_eq!(out.markers.live, 0);
        assert_eq!(engine.markers().next_spawn_at(), None);
    });
}

#[test]
fn live_count_never_exceeds_capacity() {
    let mut engine = loaded_engine(test_options(21));
    let (surface, recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);

    let capacity = engine.markers().capacity();
    let mut peak = 0;
    let _ = driver.run(&mut engine, &probe, 1200, |engine, out| {
        assert!(out.markers.live <= capacity);
        assert!(engine.markers().live_count() <= capacity);
        peak = peak.max(out.markers.live);
    });
    assert!(peak > 0, "markers never spawned");
    assert!(recorded.borrow().presents >= 1200);

    engine.set_performance_level(PerformanceLevel::Low);
    let low = engine.markers().capacity();
    assert!(low < capacity);
    assert!(engine.markers().live_count() <= low);
    let _ = driver.run(&mut engine, &probe, 600, |engine, out| {
        assert!(out.markers.live <= low);
        assert!(engine.markers().live_count() <= low);
    });
}

#[test]
fn expired_markers_are_removed_with_a_burst() {
    let mut options = test_options(22);
    options.markers.life_seconds = [0.6, 0.8];
    let mut engine = loaded_engine(options);
    let (surface, recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);

    let _ = driver.run(&mut engine, &probe, 600, |engine, _| {
        for marker in engine.markers().markers() {
            assert!(marker.is_live());
            assert!(
                marker.life_ratio() < 1.0 || marker.phase() == MarkerPhase::Active,
                "{} outlived its life",
                marker.id()
            );
        }
    });
    assert!(!recorded.borrow().bursts.is_empty());
}

#[test]
fn clicking_a_text_marker_opens_it_and_displaces_the_rest() {
    let mut engine = loaded_engine(text_only(23));
    let (surface, _recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);

    let mut target = None;
    for _ in 0..900 {
        let _ = driver.tick(&mut engine, &probe);
        if engine.markers().live_count() >= 2 {
            target = clickable(&engine, true);
            if target.is_some() {
                break;
            }
        }
    }
    let (_, at) = target.expect("no clickable text marker appeared");

    assert!(engine.handle_pointer(PointerEvent::Click { x: at.x, y: at.y }));
    assert_eq!(active_count(&engine), 1);
    let active = engine.markers().active_marker().unwrap();
    assert!(active.kind().is_text());
    for marker in engine.markers().markers() {
        if marker.id() != active.id() {
            assert!(!marker.is_live(), "{} still live", marker.id());
        }
    }

    // open marker holds and spawning pauses
    let _ = driver.run(&mut engine, &probe, 240, |engine, out| {
        assert_eq!(out.markers.spawned, 0);
        assert_eq!(active_count(engine), 1);
        assert_eq!(engine.markers().live_count(), 1);
    });

    assert!(engine.close_active_marker());
    assert!(!engine.close_active_marker());
    let mut resumed = false;
    let _ = driver.run(&mut engine, &probe, 120, |engine, out| {
        assert!(active_count(engine) <= 1);
        resumed |= out.markers.spawned > 0;
    });
    assert!(resumed);
}

#[test]
fn pressing_elsewhere_closes_the_open_marker() {
    let mut engine = loaded_engine(text_only(24));
    let (surface, _recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);

    let mut target = None;
    for _ in 0..900 {
        let _ = driver.tick(&mut engine, &probe);
        target = clickable(&engine, true);
        if target.is_some() {
            break;
        }
    }
    let (_, at) = target.expect("no clickable text marker appeared");
    assert!(engine.handle_pointer(PointerEvent::Click { x: at.x, y: at.y }));

    // a press on the open marker keeps it
    assert!(engine.handle_pointer(PointerEvent::Press { x: at.x, y: at.y }));
    assert_eq!(active_count(&engine), 1);

    assert!(engine.handle_pointer(PointerEvent::Press { x: -500.0, y: -500.0 }));
    assert_eq!(active_count(&engine), 0);
}

#[test]
fn clicking_a_plain_marker_pops_it() {
    let mut options = test_options(25);
    options.markers.text_probability = 0.0;
    let mut engine = loaded_engine(options);
    let (surface, recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);

    let mut target = None;
    for _ in 0..900 {
        let _ = driver.tick(&mut engine, &probe);
        target = clickable(&engine, false);
        if target.is_some() {
            break;
        }
    }
    let (_, at) = target.expect("no clickable plain marker appeared");
    let live_before = engine.markers().live_count();
    let bursts_before = recorded.borrow().bursts.len();

    assert!(engine.handle_pointer(PointerEvent::Click { x: at.x, y: at.y }));
    assert_eq!(engine.markers().live_count(), live_before - 1);
    assert_eq!(active_count(&engine), 0);

    let _ = driver.tick(&mut engine, &probe);
    assert!(recorded.borrow().bursts.len() > bursts_before);
}

#[test]
fn failing_probe_never_marks_markers_occluded() {
    let mut engine = loaded_engine(test_options(26));
    let (surface, _recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let mut driver = Driver::new(0.0);
    let mut seen = 0;
    let _ = driver.run(&mut engine, &NoReadback, 600, |engine, _| {
        for marker in engine.markers().markers() {
            assert!(!marker.over_model());
        }
        seen = seen.max(engine.markers().live_count());
    });
    assert!(seen > 0);
}

#[test]
fn covered_markers_do_not_stay_alive() {
    let mut engine = loaded_engine(test_options(27));
    let (surface, recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = opaque();
    let mut driver = Driver::new(0.0);
    let _ = driver.run(&mut engine, &probe, 600, |engine, _| {
        for marker in engine.markers().markers() {
            assert!(!(marker.phase() == MarkerPhase::Alive && marker.over_model()));
        }
    });
    assert!(!recorded.borrow().bursts.is_empty());
}

#[test]
fn replacing_the_surface_clears_the_old_one() {
    let mut engine = loaded_engine(test_options(28));
    let (first, first_rec) = RecordingSurface::new();
    engine.set_floating_bubbles(first, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);
    let _ = driver.run(&mut engine, &probe, 120, |_, _| {});
    assert!(engine.markers().live_count() > 0);

    let (second, second_rec) = RecordingSurface::new();
    engine.set_floating_bubbles(second, ["only"]);
    assert_eq!(first_rec.borrow().clears, 1);
    assert_eq!(engine.markers().live_count(), 0);
    let _ = driver.tick(&mut engine, &probe);
    assert_eq!(second_rec.borrow().presents, 1);
}

#[test]
fn starting_a_load_clears_markers() {
    let mut engine = loaded_engine(test_options(29));
    let (surface, _recorded) = RecordingSurface::new();
    engine.set_floating_bubbles(surface, MESSAGES);
    let probe = transparent();
    let mut driver = Driver::new(0.0);
    let _ = driver.run(&mut engine, &probe, 120, |_, _| {});
    assert!(engine.markers().live_count() > 0);

    let _ticket = engine.begin_load().unwrap();
    assert_eq!(engine.markers().live_count(), 0);
    assert!(engine.markers().has_surface());
}
