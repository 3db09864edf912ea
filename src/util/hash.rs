//! Shader-style scalar hashes used to derive stable per-element seeds.

use crate::util::easing::fract;

/// Per-element seed in `[0, 1)`: `fract(sin(i · 12.9898) · 43758.5453)`.
///
/// Evaluated in `f32` so the CPU path agrees with the WGSL kernel.
#[inline]
#[must_use]
pub fn element_seed(index: u32) -> f32 {
    let s = fract((index as f32 * 12.9898).sin() * 43_758.545_3);
    // fract can round up to exactly 1.0 for tiny negative inputs
    if s >= 1.0 {
        0.0
    } else {
        s
    }
}
