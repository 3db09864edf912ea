//! Kernel evaluation and engine tick benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use morpho::animation::{AnimationMode, DisplacementKernel, MorphClock};
use morpho::camera::core::Camera;
use morpho::engine::{FrameInput, MorphEngine};
use morpho::input::Viewport;
use morpho::markers::{AlphaFrame, BurstEffect, MarkerSurface, MarkerVisual};
use morpho::options::Options;
use morpho::scene::{PointCloudAsset, SceneFrame, SphereLoader};
use morpho::util::easing::ease_in_out_cubic;

struct NullSurface;

impl MarkerSurface for NullSurface {
    fn present(&mut self, visuals: &[MarkerVisual]) {
        let _ = black_box(visuals.len());
    }

    fn burst(&mut self, _effect: &BurstEffect) {}

    fn clear(&mut self) {}
}

fn easing_benchmark(c: &mut Criterion) {
    c.bench_function("ease_in_out_cubic", |b| {
        b.iter(|| black_box(ease_in_out_cubic(black_box(0.37))))
    });
    let clock = MorphClock::new(3.2, 0.0);
    c.bench_function("morph_clock_sample", |b| {
        b.iter(|| black_box(clock.sample(black_box(1.234))))
    });
}

fn kernel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("displace_all");
    let frame = SceneFrame::new(Vec3::ZERO, 1.0);

    for count in [1_000, 10_000, 100_000] {
        let asset = PointCloudAsset::fibonacci_sphere(count, Vec3::ZERO, 1.0);
        let base = asset.base_positions().to_vec();
        let mut out = Vec::with_capacity(count);
        for mode in [AnimationMode::Swirl, AnimationMode::Explode] {
            let kernel = DisplacementKernel::new(frame, mode, 1.7, 0.8);
            group.bench_function(format!("{mode}_{count}"), |b| {
                b.iter(|| {
                    kernel.displace_all(black_box(&base), &mut out);
                    black_box(out.len())
                })
            });
        }
    }
    group.finish();
}

fn engine_tick_benchmark(c: &mut Criterion) {
    let mut options = Options::default();
    options.performance.seed = Some(7);
    let mut engine = MorphEngine::new(options);
    let _ = pollster::block_on(engine.load_asset(&SphereLoader::default(), "sphere:2000"));
    let _ = engine.set_animation_mode("noise");
    engine.set_floating_bubbles(Box::new(NullSurface), ["hello", "world"]);

    let viewport = Viewport::new(1280.0, 720.0, 1.0);
    let camera = Camera::framing(SceneFrame::new(Vec3::ZERO, 1.0), viewport.aspect());
    let probe = AlphaFrame::transparent(1280, 720);

    // warm up so the field carries a realistic marker population
    let mut now = 0.0;
    for _ in 0..600 {
        now += 1.0 / 60.0;
        let _ = engine.tick(&FrameInput {
            now,
            viewport,
            projector: &camera,
            probe: &probe,
        });
    }

    c.bench_function("engine_tick", |b| {
        b.iter(|| {
            now += 1.0 / 60.0;
            black_box(engine.tick(&FrameInput {
                now,
                viewport,
                projector: &camera,
                probe: &probe,
            }))
        })
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    kernel_benchmark,
    engine_tick_benchmark
);
criterion_main!(benches);
