//! Camera and world-to-screen projection.

/// Core camera struct.
pub mod core;

use glam::Vec3;

/// World to normalized-device-coordinate mapping.
///
/// `x` and `y` of the result lie in `[-1, 1]` for visible points (`y` up),
/// `z` is the depth in `[0, 1]`. Returns `None` for points at or behind
/// the camera plane.
pub trait Projector {
    /// Project a world-space point.
    fn world_to_ndc(&self, world: Vec3) -> Option<Vec3>;
}
