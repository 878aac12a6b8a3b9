//! CPU-side scalar fields for the heat map viewer.
//!
//! A [`ScalarField`] is a row-major grid of `f32` samples plus the value range
//! the shader should normalise against. Fields are produced once by
//! [`generate`] from a [`FieldFormula`] and are read-only afterwards:
//!
//! ```text
//!   FieldFormula ──▶ generate(width, height) ──▶ ScalarField { samples, range }
//!                        │                              │
//!                        └─ (u, v) ∈ [0,1]² per cell    └─▶ texture upload (renderer)
//! ```
//!
//! Everything here is pure and GPU-free so it can be tested in isolation.

mod field;
mod formula;

pub use field::{inverse_dimensions, to_centered, FieldRange, ScalarField};
pub use formula::{generate, generate_with, FieldFormula, RangeMode, OSCILLATORY_REFERENCE_SCALE};
