use scalar_field::FieldRange;

use crate::compile::{prepare_program, ShaderBuildError, ShaderSources};

use super::mesh::VertexLayout;
use super::texture::FieldTexture;
use super::uniforms::FieldUniforms;

const FIELD_TEXTURE_BINDING: u32 = 0;
const FIELD_SAMPLER_BINDING: u32 = 1;
const FIELD_RANGE_BINDING: u32 = 2;

/// A linked vertex + fragment program ready to draw the field quad.
///
/// Only produced by [`build_program`]; there is no "empty" program to draw
/// with after a failed build.
pub struct ShaderProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Per-field resources bound at group 0 when drawing.
pub struct FieldBinding {
    pub bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    range: FieldRange,
}

impl FieldBinding {
    pub fn range(&self) -> FieldRange {
        self.range
    }

    pub fn destroy(&self) {
        self.uniform_buffer.destroy();
    }
}

/// Compiles both stages, checks their interface, then links them into a
/// render pipeline targeting `target_format`.
///
/// The failing stage's diagnostic is logged before the error is returned.
pub fn build_program(
    device: &wgpu::Device,
    sources: &ShaderSources,
    vertex_layout: &VertexLayout,
    target_format: wgpu::TextureFormat,
) -> Result<ShaderProgram, ShaderBuildError> {
    let stages = prepare_program(sources)?;

    let bind_group_layout = create_bind_group_layout(device);
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("heatmap pipeline layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("heatmap vertex shader"),
        source: stages.vertex.shader_source(),
    });
    let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("heatmap fragment shader"),
        source: stages.fragment.shader_source(),
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("heatmap pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &[vertex_layout.buffer_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });
    let link_error = pollster::block_on(device.pop_error_scope());

    // Stage modules are not needed once the pipeline exists (or failed to).
    drop(vertex_module);
    drop(fragment_module);
    drop(stages);

    if let Some(err) = link_error {
        let log = err.to_string();
        tracing::error!("failed to link shader program: {log}");
        return Err(ShaderBuildError::Link { log });
    }

    tracing::info!(format = ?target_format, "shader program linked");
    Ok(ShaderProgram {
        pipeline,
        bind_group_layout,
    })
}

impl ShaderProgram {
    /// Uploads the `min`/`max` uniforms and binds the field texture to unit 0.
    pub fn bind_field(
        &self,
        device: &wgpu::Device,
        texture: &FieldTexture,
        range: FieldRange,
    ) -> FieldBinding {
        let uniform_buffer = FieldUniforms::new(range).create_buffer(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scalar field bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: FIELD_TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: FIELD_SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: FIELD_RANGE_BINDING,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });
        tracing::debug!(min = range.min, max = range.max, "bound scalar field");

        FieldBinding {
            bind_group,
            uniform_buffer,
            range,
        }
    }
}

fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scalar field layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: FIELD_TEXTURE_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: FIELD_SAMPLER_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: FIELD_RANGE_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<FieldUniforms>() as u64,
                    ),
                },
                count: None,
            },
        ],
    })
}
