use glam::Vec3;

use super::{SceneFrame, SceneTarget};
use crate::animation::{DisplacementKernel, DisplacementSlot, KernelParams};

/// CPU-side point asset.
///
/// Implements its own displacement slot by evaluating
/// [`DisplacementKernel`] over the base positions whenever parameters are
/// written, so hosts without a compute pass (and tests) see the same
/// motion the WGSL module produces.
#[derive(Debug, Clone)]
pub struct PointCloudAsset {
    base: Vec<Vec3>,
    displaced: Vec<Vec3>,
    frame: SceneFrame,
    point_cloud: bool,
    element_scale: f32,
    params: Option<KernelParams>,
    has_slot: bool,
    released: bool,
}

impl PointCloudAsset {
    /// Asset over `points`; the frame is derived from the points.
    pub fn new(points: Vec<Vec3>) -> Self {
        let frame = SceneFrame::from_points(&points);
        Self {
            displaced: points.clone(),
            base: points,
            frame,
            point_cloud: false,
            element_scale: 1.0,
            params: None,
            has_slot: true,
            released: false,
        }
    }

    /// `count` points spread evenly over a sphere (Fibonacci lattice),
    /// with every third point pulled inward to give the cloud some volume.
    pub fn fibonacci_sphere(count: usize, center: Vec3, radius: f32) -> Self {
        let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        let n = count.max(1) as f32;
        let points = (0..count)
            .map(|i| {
                let fi = i as f32;
                let y = 1.0 - 2.0 * (fi + 0.5) / n;
                let ring = (1.0 - y * y).max(0.0).sqrt();
                let theta = golden * fi;
                let shell = if i % 3 == 0 { 0.6 } else { 1.0 };
                center
                    + Vec3::new(theta.cos() * ring, y, theta.sin() * ring)
                        * radius
                        * shell
            })
            .collect();
        Self::new(points)
    }

    /// Same asset, but reporting no displacement slot (an incompatible
    /// renderer).
    #[must_use]
    pub fn without_displacement_slot(mut self) -> Self {
        self.has_slot = false;
        self
    }

    /// Base (undisplaced) positions.
    pub fn base_positions(&self) -> &[Vec3] {
        &self.base
    }

    /// Positions after the last written kernel parameters.
    pub fn positions(&self) -> &[Vec3] {
        &self.displaced
    }

    /// Current point-cloud flag.
    pub fn point_cloud(&self) -> bool {
        self.point_cloud
    }

    /// Current element scale.
    pub fn element_scale(&self) -> f32 {
        self.element_scale
    }

    /// Last parameters written to the slot.
    pub fn last_params(&self) -> Option<&KernelParams> {
        self.params.as_ref()
    }

    /// Whether [`SceneTarget::release`] ran.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl DisplacementSlot for PointCloudAsset {
    fn write_params(&mut self, params: &KernelParams) {
        self.params = Some(*params);
        DisplacementKernel::from_params(params)
            .displace_all(&self.base, &mut self.displaced);
    }
}

impl SceneTarget for PointCloudAsset {
    fn frame(&self) -> SceneFrame {
        self.frame
    }

    fn set_point_cloud(&mut self, enabled: bool) {
        self.point_cloud = enabled;
    }

    fn set_element_scale(&mut self, scale: f32) {
        self.element_scale = scale;
    }

    fn displacement_slot(&mut self) -> Option<&mut dyn DisplacementSlot> {
        if self.has_slot {
            Some(self)
        } else {
            None
        }
    }

    fn release(&mut self) {
        self.base = Vec::new();
        self.displaced = Vec::new();
        self.params = None;
        self.released = true;
    }
}
