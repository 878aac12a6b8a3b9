use std::mem;

use wgpu::util::DeviceExt;

use crate::geometry::{Mesh, MeshVertex};

/// Describes the single `location = 0` attribute of an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexLayout {
    pub stride: wgpu::BufferAddress,
    attributes: [wgpu::VertexAttribute; 1],
}

impl VertexLayout {
    pub fn of<V: MeshVertex>() -> Self {
        Self {
            stride: mem::size_of::<V>() as wgpu::BufferAddress,
            attributes: [wgpu::VertexAttribute {
                format: V::attribute_format(),
                offset: 0,
                shader_location: 0,
            }],
        }
    }

    pub fn format(&self) -> wgpu::VertexFormat {
        self.attributes[0].format
    }

    pub(crate) fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Immutable vertex and index buffers for one mesh.
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub layout: VertexLayout,
    pub index_count: u32,
}

impl MeshBuffers {
    /// Copies the mesh into static GPU buffers.
    pub fn upload<V: MeshVertex>(device: &wgpu::Device, mesh: &Mesh<V>) -> Self {
        debug_assert!(mesh.is_well_formed(), "mesh indices out of range");

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertex buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh index buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let layout = VertexLayout::of::<V>();
        tracing::debug!(
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            components = V::COMPONENTS,
            "uploaded mesh"
        );

        Self {
            vertex_buffer,
            index_buffer,
            layout,
            index_count: mesh.index_count(),
        }
    }

    pub(crate) fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Frees the device memory now instead of waiting for the handles to drop.
    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
