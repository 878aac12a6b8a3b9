use anyhow::Result;
use renderer::{Renderer, RendererConfig, ShaderSources};
use scalar_field::generate_with;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let formula = args.field_formula();
    let (width, height) = args.field_size;
    let field = generate_with(formula, width, height, args.range_mode());
    tracing::info!(
        formula = %formula,
        width,
        height,
        min = field.min(),
        max = field.max(),
        "generated scalar field"
    );

    if args.dry_run {
        println!(
            "{formula} {width}x{height}: min {} max {}",
            field.min(),
            field.max()
        );
        return Ok(());
    }

    // Shaders are read before any window exists so a missing file fails fast.
    let sources = ShaderSources::load(&args.vertex_shader_path(), &args.fragment_shader_path())?;

    let renderer = Renderer::new(RendererConfig {
        window_size: args.window_size,
        title: args.title,
    });
    renderer.run(&field, &sources)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
