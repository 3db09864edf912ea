use glam::{Mat4, Vec3, Vec4Swizzles};

use super::Projector;
use crate::scene::SceneFrame;

/// Clip-space `w` below which a point counts as behind the camera.
const MIN_CLIP_W: f32 = 1e-5;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.6,
            fovy: 45.0,
            znear: 0.01,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Camera looking down -Z at `frame`, far enough back that a sphere of
    /// the frame's radius (plus marker drift room) fits vertically.
    #[must_use]
    pub fn framing(frame: SceneFrame, aspect: f32) -> Self {
        let fovy: f32 = 45.0;
        let half = (fovy.to_radians() * 0.5).tan().max(1e-3);
        let distance = frame.radius * 2.0 / half;
        Self {
            eye: frame.center + Vec3::new(0.0, 0.0, distance),
            target: frame.center,
            up: Vec3::Y,
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            fovy,
            znear: (distance * 0.01).max(1e-3),
            zfar: distance * 4.0 + frame.radius * 4.0,
        }
    }

    /// Build the combined view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }
}

impl Projector for Camera {
    fn world_to_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.build_matrix() * world.extend(1.0);
        if clip.w <= MIN_CLIP_W || !clip.is_finite() {
            return None;
        }
        Some(clip.xyz() / clip.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_center() {
        let camera = Camera::default();
        let ndc = camera.world_to_ndc(Vec3::ZERO).unwrap();
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn points_behind_the_eye_are_rejected() {
        let camera = Camera::default();
        assert!(camera.world_to_ndc(Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn framing_keeps_the_scene_inside_clip_bounds() {
        let frame = SceneFrame::new(Vec3::new(5.0, -2.0, 1.0), 3.0);
        let camera = Camera::framing(frame, 1.0);
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y] {
            let ndc = camera.world_to_ndc(frame.center + dir * frame.radius).unwrap();
            assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0, "{ndc}");
        }
    }
}
