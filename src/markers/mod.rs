//! Floating markers layered over the scene.
//!
//! Markers spawn on a shell around the asset, drift under a small force
//! model, fade with age and screen-edge proximity, and dissipate when they
//! expire, sit over rendered geometry, or are dismissed. Text markers can
//! be opened by a click, which holds them on screen and pauses spawning
//! until they close.

pub mod field;
pub mod lifecycle;
pub mod marker;
pub mod occlusion;
pub mod physics;
pub mod spawner;

pub use field::{MarkerField, MarkerStats, MarkerTick};
pub use lifecycle::DissipateReason;
pub use marker::{
    BurstEffect, FloatingMarker, MarkerId, MarkerKind, MarkerPhase,
    MarkerSurface, MarkerTraits, MarkerVisual,
};
pub use occlusion::{AlphaFrame, FrameProbe, NoReadback, OcclusionProbe, ProbeError};
