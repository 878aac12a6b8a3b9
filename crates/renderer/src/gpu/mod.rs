//! GPU side of the heat map.
//!
//! - `context` owns the wgpu adapter/device pair and, for windowed use, the
//!   swapchain surface and its configuration.
//! - `mesh` uploads geometry into static vertex/index buffers and records the
//!   vertex layout the pipeline needs.
//! - `texture` turns a `ScalarField` into an `R32Float` texture with a
//!   nearest-neighbour sampler, and can read it back for verification.
//! - `uniforms` mirrors the `{min, max}` block read by the fragment stage.
//! - `pipeline` links compiled GLSL stages into a render pipeline and binds a
//!   field to it.
//! - `state` glues everything into the `Scene` drawn by `window`.

mod context;
mod mesh;
mod pipeline;
mod state;
mod texture;
mod uniforms;

pub use context::GpuDevice;
pub use mesh::{MeshBuffers, VertexLayout};
pub use pipeline::{build_program, FieldBinding, ShaderProgram};
pub use texture::{FieldTexture, FIELD_TEXTURE_FORMAT};

pub(crate) use state::Scene;
