//! Headless demo: loads an asset, runs a few seconds of morph and marker
//! ticks, and logs what happens.

use morpho::camera::Projector;
use morpho::engine::{FrameInput, MorphEngine};
use morpho::input::{InputEvent, InputProcessor, MouseButton, Viewport};
use morpho::markers::{AlphaFrame, BurstEffect, MarkerPhase, MarkerSurface, MarkerVisual};
use morpho::options::Options;
use morpho::scene::{PointFileLoader, SphereLoader};
use morpho::util::frame_timing::MonotonicClock;

const FRAME_DT: f64 = 1.0 / 60.0;
const RUN_SECONDS: f64 = 8.0;

/// Surface that reports marker activity through the log.
#[derive(Default)]
struct LogSurface {
    last_visible: usize,
}

impl MarkerSurface for LogSurface {
    fn present(&mut self, visuals: &[MarkerVisual]) {
        if visuals.len() != self.last_visible {
            log::debug!("{} markers on screen", visuals.len());
            self.last_visible = visuals.len();
        }
    }

    fn burst(&mut self, effect: &BurstEffect) {
        log::debug!(
            "{} burst at ({:.0}, {:.0})",
            effect.id,
            effect.x,
            effect.y
        );
    }

    fn clear(&mut self) {
        self.last_visible = 0;
    }
}

/// Rasterize the asset's projected bounding disc into an alpha frame so
/// the occlusion probe has something to find.
fn silhouette(engine: &MorphEngine, viewport: &Viewport, cap: f32) -> AlphaFrame {
    let (width, height) = viewport.framebuffer_size(cap);
    let mut frame = AlphaFrame::transparent(width, height);
    let Some(scene) = engine.scene_frame() else {
        return frame;
    };
    let camera = engine.framing_camera(viewport.aspect());
    let to_px = |ndc: glam::Vec3| {
        (
            (ndc.x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc.y * 0.5) * height as f32,
        )
    };
    let edge = scene.center + camera.up.normalize() * scene.radius;
    if let (Some(c), Some(e)) = (
        camera.world_to_ndc(scene.center),
        camera.world_to_ndc(edge),
    ) {
        let (cx, cy) = to_px(c);
        let (ex, ey) = to_px(e);
        let r = (ex - cx).hypot(ey - cy) * 0.8;
        frame.fill_disc(cx, cy, r, 255);
    }
    frame
}

/// Replay a click on the first alive text marker through the input
/// processor, the way a windowed host would forward mouse events.
fn click_first_text_marker(engine: &mut MorphEngine, input: &mut InputProcessor) -> bool {
    let Some(at) = engine
        .markers()
        .markers()
        .iter()
        .filter(|m| m.phase() == MarkerPhase::Alive && m.kind().is_text())
        .find_map(|m| m.screen())
    else {
        return false;
    };
    let events = [
        InputEvent::CursorMoved { x: at.x, y: at.y },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        },
    ];
    for event in events {
        if let Some(command) = input.handle_event(event) {
            let _ = engine.execute(command);
        }
    }
    if let Some(active) = engine.markers().active_marker() {
        log::info!(
            "{} opened: {:?}",
            active.id(),
            active.kind().message().unwrap_or_default()
        );
    }
    true
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| "sphere:4000".to_owned());
    let mode = args.next().unwrap_or_else(|| "wave".to_owned());

    let options = match std::env::var("MORPHO_OPTIONS") {
        Ok(path) => match Options::load(std::path::Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        Err(_) => Options::default(),
    };

    let mut engine = MorphEngine::new(options);
    let loaded = if url.starts_with("sphere:") {
        pollster::block_on(engine.load_asset(&SphereLoader::default(), &url))
    } else {
        pollster::block_on(engine.load_asset(&PointFileLoader::new("."), &url))
    };
    if let Err(e) = loaded {
        log::error!("{e}");
        std::process::exit(1);
    }

    let applied = engine.set_animation_mode(&mode);
    log::info!("running {applied} for {RUN_SECONDS}s");
    engine.set_floating_bubbles(
        Box::new(LogSurface::default()),
        ["Hello there", "Drag to orbit", "Click a bubble"],
    );

    let viewport = Viewport::new(1280.0, 720.0, 2.0);
    let camera = engine.framing_camera(viewport.aspect());
    let mut input = InputProcessor::new();
    let mut clicked = false;
    let mut cycled = false;
    let clock = MonotonicClock::new();
    let mut last_point_cloud = false;
    loop {
        let now = clock.now_secs();
        if now >= RUN_SECONDS {
            break;
        }
        let probe = silhouette(&engine, &viewport, engine.markers().pixel_ratio_cap());
        let output = match engine.tick(&FrameInput {
            now,
            viewport,
            projector: &camera,
            probe: &probe,
        }) {
            Ok(output) => output,
            Err(e) => {
                log::error!("{e}");
                break;
            }
        };
        if output.point_cloud != last_point_cloud {
            log::info!(
                "t={now:.2}s point cloud {} (morph {:.2}, gain {:.2}, scale {:.2})",
                if output.point_cloud { "on" } else { "off" },
                output.params.morph,
                output.color_gain,
                output.element_scale
            );
            last_point_cloud = output.point_cloud;
        }
        if !clicked && now > RUN_SECONDS * 0.25 {
            clicked = click_first_text_marker(&mut engine, &mut input);
        }
        if !cycled && now > RUN_SECONDS * 0.5 {
            if let Some(command) = input.handle_key_press("KeyM") {
                let _ = engine.execute(command);
                log::info!("mode cycled to {}", engine.animation_mode());
            }
            cycled = true;
        }
        std::thread::sleep(std::time::Duration::from_secs_f64(FRAME_DT));
    }

    log::info!(
        "done: {} live markers, {:.0} fps",
        engine.markers().live_count(),
        engine.fps()
    );
    engine.dispose();
}
