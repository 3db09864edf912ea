use wgpu::util::DeviceExt;

use super::kernel_uniform::KernelUniform;
use super::shader_composer::{ShaderComposer, DISPLACE_POINTS_WGSL};
use crate::animation::DisplacementSlot;
use crate::error::MorphoError;
use crate::scene::{SceneFrame, SceneTarget};

const WORKGROUP_SIZE: u32 = 64;

/// GPU-resident point asset displaced by a compute pass.
///
/// Base points are uploaded once as `vec4(x, y, z, size)`. Each frame
/// [`encode`](Self::encode) uploads the kernel parameters and dispatches
/// `displace_points.wgsl`, leaving the result in
/// [`displaced_buffer`](Self::displaced_buffer) for the host's draw pass.
#[derive(Debug)]
pub struct DisplacePass {
    frame: SceneFrame,
    count: u32,
    uniform: KernelUniform,
    base: wgpu::Buffer,
    displaced: wgpu::Buffer,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    point_cloud: bool,
    element_scale: f32,
    released: bool,
}

impl DisplacePass {
    /// Upload `points` (`[x, y, z, size]`) and build the compute pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::KernelPatch`] when the compute shader fails
    /// to compose.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        points: &[[f32; 4]],
    ) -> Result<Self, MorphoError> {
        let frame = SceneFrame::from_points(
            &points
                .iter()
                .map(|p| glam::Vec3::new(p[0], p[1], p[2]))
                .collect::<Vec<_>>(),
        );
        let count = points.len() as u32;
        let uniform = KernelUniform::new(device);

        // zero-length storage bindings are invalid
        let padded: &[[f32; 4]] = if points.is_empty() { &[[0.0; 4]] } else { points };
        let base = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Morph Base Points"),
            contents: bytemuck::cast_slice(padded),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let displaced = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Morph Displaced Points"),
            contents: bytemuck::cast_slice(padded),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Morph Displace Layout"),
            entries: &[
                KernelUniform::layout_entry(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, true),
                storage_entry(2, false),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Morph Displace Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: base.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: displaced.as_entire_binding(),
                },
            ],
        });

        let module = composer.compose(
            device,
            "Morph Displace Shader",
            DISPLACE_POINTS_WGSL,
            "displace_points.wgsl",
        )?;
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Morph Displace Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Morph Displace Pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            frame,
            count,
            uniform,
            base,
            displaced,
            pipeline,
            bind_group,
            point_cloud: false,
            element_scale: 1.0,
            released: false,
        })
    }

    /// Number of points.
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Whether the asset has no points.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Storage/vertex buffer with the displaced points.
    pub fn displaced_buffer(&self) -> &wgpu::Buffer {
        &self.displaced
    }

    /// Whether the host should draw discrete points this frame.
    pub fn point_cloud(&self) -> bool {
        self.point_cloud
    }

    /// Element scale the host should apply when drawing.
    pub fn element_scale(&self) -> f32 {
        self.element_scale
    }

    /// Upload pending parameters and record the displacement dispatch.
    pub fn encode(&mut self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder) {
        if self.released || self.count == 0 {
            return;
        }
        self.uniform.upload(queue);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Morph Displace Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(self.count.div_ceil(WORKGROUP_SIZE), 1, 1);
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl SceneTarget for DisplacePass {
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
        Some(&mut self.uniform)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.base.destroy();
        self.displaced.destroy();
        self.uniform.buffer.destroy();
    }
}
