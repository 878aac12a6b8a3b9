use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use scalar_field::ScalarField;
use winit::dpi::PhysicalSize;

use crate::compile::ShaderSources;
use crate::geometry::fullscreen_quad;

use super::context::GpuContext;
use super::mesh::MeshBuffers;
use super::pipeline::{build_program, FieldBinding, ShaderProgram};
use super::texture::FieldTexture;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Everything needed to redraw the heat map: surface, program, quad and field.
///
/// All resources are created once; a frame only records a single indexed draw.
pub(crate) struct Scene {
    context: GpuContext,
    program: ShaderProgram,
    mesh: MeshBuffers,
    texture: FieldTexture,
    binding: FieldBinding,
}

impl Scene {
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        field: &ScalarField,
        sources: &ShaderSources,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size)?;
        let device = &context.gpu.device;
        let queue = &context.gpu.queue;

        let mesh = MeshBuffers::upload(device, &fullscreen_quad());
        let texture = FieldTexture::upload(device, queue, field)?;
        let program = build_program(device, sources, &mesh.layout, context.surface_format)?;
        let binding = program.bind_field(device, &texture, field.range());

        tracing::info!(
            width = field.width(),
            height = field.height(),
            range = %field.range(),
            "scene ready"
        );

        Ok(Self {
            context,
            program,
            mesh,
            texture,
            binding,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Clears to white and draws the field quad once.
    pub(crate) fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let device = &self.context.gpu.device;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(0, &self.binding.bind_group, &[]);
            self.mesh.bind(&mut render_pass);
            render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
        }

        self.context
            .gpu
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Releases GPU memory in reverse creation order before the device drops.
    pub(crate) fn shutdown(self) {
        self.binding.destroy();
        self.texture.destroy();
        self.mesh.destroy();
        tracing::debug!("released scene resources");
    }
}
