use renderer::geometry::{fullscreen_quad, make_rectangle};
use renderer::{
    build_program, FieldTexture, GpuDevice, MeshBuffers, ShaderBuildError, ShaderSources,
    ShaderStageKind, VertexLayout,
};
use scalar_field::{generate, FieldFormula, FieldRange, ScalarField};

const VERTEX: &str = include_str!("../../../resources/shaders/texture.vert");
const FRAGMENT: &str = include_str!("../../../resources/shaders/texture.frag");
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn gpu_or_skip() -> Option<GpuDevice> {
    match GpuDevice::headless() {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            eprintln!("skipping GPU test: {err:#}");
            None
        }
    }
}

#[test]
fn constant_field_reads_back_unchanged() {
    let Some(gpu) = gpu_or_skip() else { return };
    let field = generate(FieldFormula::Constant { value: 0.3 }, 4, 4);

    let texture = FieldTexture::upload(&gpu.device, &gpu.queue, &field).unwrap();
    assert_eq!((texture.width(), texture.height()), (4, 4));

    let texels = texture.read_back(&gpu.device, &gpu.queue).unwrap();
    assert_eq!(texels.len(), 16);
    assert!(texels.iter().all(|&value| (value - 0.8).abs() < 1e-6));
}

#[test]
fn texels_keep_row_major_order() {
    let Some(gpu) = gpu_or_skip() else { return };
    // Wider than one 256-byte row so the readback has to strip padding.
    let field = ScalarField::from_fn(70, 3, |x, y| (x + y * 70) as f32);

    let texture = FieldTexture::upload(&gpu.device, &gpu.queue, &field).unwrap();
    let texels = texture.read_back(&gpu.device, &gpu.queue).unwrap();
    assert_eq!(texels, field.samples());
}

#[test]
fn oversized_field_is_rejected() {
    let Some(gpu) = gpu_or_skip() else { return };
    let too_wide = gpu.device.limits().max_texture_dimension_2d + 1;
    let field = ScalarField::from_fn(too_wide, 1, |_, _| 0.0);

    let err = FieldTexture::upload(&gpu.device, &gpu.queue, &field)
        .err()
        .expect("upload must fail");
    assert!(err.to_string().contains("max texture dimension"));
}

#[test]
fn mesh_upload_records_layout_and_index_count() {
    let Some(gpu) = gpu_or_skip() else { return };

    let textured = MeshBuffers::upload(&gpu.device, &fullscreen_quad());
    assert_eq!(textured.index_count, 6);
    assert_eq!(textured.layout.format(), wgpu::VertexFormat::Float32x4);
    assert_eq!(textured.layout.stride, 16);

    let plain = MeshBuffers::upload(&gpu.device, &make_rectangle(1.0, 1.0, [0.0, 0.0]));
    assert_eq!(plain.index_count, 6);
    assert_eq!(plain.layout.format(), wgpu::VertexFormat::Float32x2);
    assert_eq!(plain.layout.stride, 8);
}

#[test]
fn broken_fragment_yields_no_program() {
    let Some(gpu) = gpu_or_skip() else { return };
    let sources = ShaderSources::new(VERTEX, "#version 450\nvoid main() { oops }\n");

    let result = build_program(
        &gpu.device,
        &sources,
        &VertexLayout::of::<renderer::geometry::Vertex4D>(),
        TARGET_FORMAT,
    );
    match result {
        Err(ShaderBuildError::Compile { stage, .. }) => {
            assert_eq!(stage, ShaderStageKind::Fragment)
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken fragment shader must not produce a program"),
    }
}

#[test]
fn constant_field_draws_uniform_grey() {
    let Some(gpu) = gpu_or_skip() else { return };
    let field = generate(FieldFormula::Constant { value: 0.3 }, 4, 4);
    assert_eq!(field.range(), FieldRange::default());

    let mesh = MeshBuffers::upload(&gpu.device, &fullscreen_quad());
    let texture = FieldTexture::upload(&gpu.device, &gpu.queue, &field).unwrap();
    let program = build_program(
        &gpu.device,
        &ShaderSources::new(VERTEX, FRAGMENT),
        &mesh.layout,
        TARGET_FORMAT,
    )
    .unwrap();
    let binding = program.bind_field(&gpu.device, &texture, field.range());
    assert_eq!(binding.range(), field.range());

    let pixels = draw_offscreen(&gpu, &program, &binding, &mesh, 8);
    // value 0.8 normalised against [0, 1].
    let expected = (0.8f32 * 255.0).round() as i32;
    for pixel in pixels.chunks_exact(4) {
        assert!((i32::from(pixel[0]) - expected).abs() <= 1, "{pixel:?}");
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 255);
    }
}

#[test]
fn first_row_is_drawn_at_the_bottom() {
    let Some(gpu) = gpu_or_skip() else { return };
    // Row 0 holds the minimum (black), row 1 the maximum (white).
    let field = ScalarField::from_fn(1, 2, |_, y| y as f32).with_observed_range();
    assert_eq!(field.range(), FieldRange::new(0.0, 1.0));

    let mesh = MeshBuffers::upload(&gpu.device, &fullscreen_quad());
    let texture = FieldTexture::upload(&gpu.device, &gpu.queue, &field).unwrap();
    let program = build_program(
        &gpu.device,
        &ShaderSources::new(VERTEX, FRAGMENT),
        &mesh.layout,
        TARGET_FORMAT,
    )
    .unwrap();
    let binding = program.bind_field(&gpu.device, &texture, field.range());

    let size = 8;
    let pixels = draw_offscreen(&gpu, &program, &binding, &mesh, size);
    let row_bytes = size as usize * 4;
    // Readback row 0 is the top of the image.
    let top = &pixels[..row_bytes];
    let bottom = &pixels[pixels.len() - row_bytes..];
    for pixel in top.chunks_exact(4) {
        assert!(pixel[..3].iter().all(|&channel| channel >= 254), "top {pixel:?}");
    }
    for pixel in bottom.chunks_exact(4) {
        assert!(pixel[..3].iter().all(|&channel| channel <= 1), "bottom {pixel:?}");
    }
}

fn draw_offscreen(
    gpu: &GpuDevice,
    program: &renderer::ShaderProgram,
    binding: &renderer::FieldBinding,
    mesh: &MeshBuffers,
    size: u32,
) -> Vec<u8> {
    let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen target"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let unpadded_row = size * 4;
    let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let readback = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("offscreen readback"),
        size: u64::from(padded_row * size),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("offscreen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(&program.pipeline);
        pass.set_bind_group(0, &binding.bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(size),
            },
        },
        wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (tx, rx) = crossbeam_channel::bounded(1);
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    gpu.device.poll(wgpu::PollType::Wait).unwrap();
    rx.recv().unwrap().unwrap();

    let mapped = slice.get_mapped_range();
    mapped
        .chunks_exact(padded_row as usize)
        .flat_map(|row| row[..unpadded_row as usize].to_vec())
        .collect()
}
