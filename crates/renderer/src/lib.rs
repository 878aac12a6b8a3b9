//! Renderer crate for the scalar field heat map.
//!
//! Turns a [`ScalarField`] into a grey-level image drawn on a screen-filling
//! quad. The overall flow is:
//!
//! ```text
//!   heatmap CLI
//!          │ RendererConfig + ScalarField + ShaderSources
//!          ▼
//!   Renderer::run ──▶ Scene::new ──▶ winit event loop ──▶ Scene::render()
//!                        │                                   │
//!                        ├─▶ MeshBuffers (quad)              └─▶ one draw_indexed
//!                        ├─▶ FieldTexture (R32Float)
//!                        └─▶ ShaderProgram + FieldBinding (min/max)
//! ```
//!
//! Everything is uploaded once; a redraw only clears the frame and issues a
//! single indexed draw. The GPU pieces are also usable without a window
//! through [`GpuDevice::headless`], which is how the texture round trip and
//! shader builds are exercised in tests.

pub mod compile;
pub mod geometry;
pub mod gpu;
mod types;
mod window;

use anyhow::Result;
use scalar_field::ScalarField;

pub use compile::{ShaderBuildError, ShaderSources, ShaderStageKind};
pub use gpu::{
    build_program, FieldBinding, FieldTexture, GpuDevice, MeshBuffers, ShaderProgram,
    VertexLayout,
};
pub use types::{RendererConfig, DEFAULT_TITLE, DEFAULT_WINDOW_SIZE};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and shows `field` until the window is closed.
    ///
    /// Returns an error if any initialisation step fails, including a shader
    /// program that does not compile or link; nothing is drawn in that case.
    pub fn run(&self, field: &ScalarField, sources: &ShaderSources) -> Result<()> {
        window::run(&self.config, field, sources)
    }
}
