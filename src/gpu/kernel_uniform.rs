use wgpu::util::DeviceExt;

use crate::animation::{DisplacementSlot, KernelParams};
use crate::scene::SceneFrame;

/// Uniform buffer holding [`KernelParams`] for the WGSL morph module.
///
/// [`write_params`](DisplacementSlot::write_params) only records the new
/// values; [`upload`](Self::upload) copies them to the GPU once per frame
/// before the passes that read them.
#[derive(Debug)]
pub struct KernelUniform {
    /// CPU copy of the last published parameters.
    pub params: KernelParams,
    /// The uniform buffer.
    pub buffer: wgpu::Buffer,
    dirty: bool,
}

impl KernelUniform {
    /// Buffer initialised with neutral parameters.
    pub fn new(device: &wgpu::Device) -> Self {
        let params = KernelParams::neutral(SceneFrame::default());
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Morph Params Buffer"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            params,
            buffer,
            dirty: false,
        }
    }

    /// Copy pending parameters to the GPU.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        if !self.dirty {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.params]));
        self.dirty = false;
    }

    /// Binding layout entry for this uniform at `binding`.
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    size_of::<KernelParams>() as u64,
                ),
            },
            count: None,
        }
    }
}

impl DisplacementSlot for KernelUniform {
    fn write_params(&mut self, params: &KernelParams) {
        if self.params != *params {
            self.params = *params;
            self.dirty = true;
        }
    }
}
