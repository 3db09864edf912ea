//! Shared utilities: easing curves, frame timing and per-element hashing.

pub mod easing;
pub mod frame_timing;
pub mod hash;
