//! The visualized asset and the seams the engine drives it through.
//!
//! A [`SceneTarget`] is whatever holds the point-based asset on the
//! rendering side: it reports its bounding frame, accepts the point-cloud
//! flag and element scale, and exposes the displacement extension slot.
//! [`AssetLoader`] produces targets asynchronously; the engine owns the
//! version bookkeeping that discards stale loads.

mod loader;
mod point_cloud;

use std::future::Future;

use glam::Vec3;
pub use loader::{PointFileLoader, SphereLoader};
pub use point_cloud::PointCloudAsset;

use crate::animation::DisplacementSlot;
use crate::error::MorphoError;

/// Radii below this are clamped before anything divides by them.
pub const MIN_SCENE_RADIUS: f32 = 1e-6;

/// Bounding sphere of the visualized asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFrame {
    /// Centre in world space.
    pub center: Vec3,
    /// Radius, always finite and positive.
    pub radius: f32,
}

impl Default for SceneFrame {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl SceneFrame {
    /// Frame with a sanitized radius: non-finite radii become 1 and tiny
    /// radii are clamped to [`MIN_SCENE_RADIUS`].
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = if radius.is_finite() {
            radius.max(MIN_SCENE_RADIUS)
        } else {
            1.0
        };
        let center = if center.is_finite() { center } else { Vec3::ZERO };
        Self { center, radius }
    }

    /// Centroid and farthest-point radius of `points`. Non-finite points
    /// are skipped; an empty set yields the default frame.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut sum = Vec3::ZERO;
        let mut count = 0u32;
        for p in points.iter().filter(|p| p.is_finite()) {
            sum += *p;
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        let center = sum / count as f32;
        let radius = points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| p.distance(center))
            .fold(0.0f32, f32::max);
        Self::new(center, radius)
    }
}

/// Rendering-side handle to a loaded asset.
pub trait SceneTarget {
    /// Bounding frame of the asset's base positions.
    fn frame(&self) -> SceneFrame;

    /// Switch between discrete point rendering and the assembled surface.
    fn set_point_cloud(&mut self, enabled: bool);

    /// Set the rendered element scale.
    fn set_element_scale(&mut self, scale: f32);

    /// The displacement extension slot, or `None` when the renderer does
    /// not provide one.
    fn displacement_slot(&mut self) -> Option<&mut dyn DisplacementSlot>;

    /// Release GPU and CPU resources. Called once when the asset is
    /// replaced, superseded, or the engine is disposed.
    fn release(&mut self);
}

/// Asynchronous asset source.
pub trait AssetLoader {
    /// Fetch and decode the asset at `url`.
    ///
    /// Failures resolve to [`MorphoError::Load`].
    fn load(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Box<dyn SceneTarget>, MorphoError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_from_points_uses_centroid_and_farthest_point() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 1.0, f32::NAN),
        ];
        let frame = SceneFrame::from_points(&points);
        assert!((frame.center - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
        assert!((frame.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_frames_are_stabilized() {
        assert_eq!(SceneFrame::from_points(&[]), SceneFrame::default());
        let single = SceneFrame::from_points(&[Vec3::ONE]);
        assert_eq!(single.radius, MIN_SCENE_RADIUS);
        assert_eq!(SceneFrame::new(Vec3::ZERO, f32::INFINITY).radius, 1.0);
    }
}
