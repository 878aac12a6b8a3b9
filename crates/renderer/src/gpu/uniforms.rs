use bytemuck::{Pod, Zeroable};
use scalar_field::FieldRange;
use wgpu::util::DeviceExt;

/// Mirrors the `ScalarFieldRange` std140 block in the fragment shader.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct FieldUniforms {
    pub scalar_field_min: f32,
    pub scalar_field_max: f32,
    pub padding: [f32; 2],
}

impl FieldUniforms {
    pub fn new(range: FieldRange) -> Self {
        Self {
            scalar_field_min: range.min,
            scalar_field_max: range.max,
            padding: [0.0; 2],
        }
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scalar field range uniforms"),
            contents: bytemuck::bytes_of(self),
            usage: wgpu::BufferUsages::UNIFORM,
        })
    }
}
