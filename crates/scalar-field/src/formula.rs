use std::fmt;

use crate::field::{inverse_dimensions, to_centered, ScalarField};

/// Domain scale of the oscillatory reference field (`x, y ∈ [-3, 3]`).
pub const OSCILLATORY_REFERENCE_SCALE: f32 = 3.0;

/// Closed-form formulas a field can be generated from.
///
/// Each variant is evaluated per cell on normalised coordinates
/// `u = x / (width - 1)`, `v = y / (height - 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldFormula {
    /// Every cell holds `value + 0.5`. The value is stored unclamped.
    Constant { value: f32 },
    /// Ramp along x: `u`.
    LinearX,
    /// Diagonal ramp over the centred domain: `x' + y'`.
    LinearXY,
    /// Bowl over the centred domain: `x'² + y'²`.
    Quadratic,
    /// Concentric ripples `sin(x'² + y'²)` with `x', y'` scaled by `scale`.
    /// Always reports its observed range.
    Oscillatory { scale: f32 },
}

/// Chooses where a generated field's `min`/`max` come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    /// Oscillatory fields measure their range, every other formula keeps `[0, 1]`.
    #[default]
    Formula,
    /// Measure the extremes of whatever the formula produced.
    Observed,
}

impl FieldFormula {
    pub fn oscillatory_reference() -> Self {
        FieldFormula::Oscillatory {
            scale: OSCILLATORY_REFERENCE_SCALE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldFormula::Constant { .. } => "constant",
            FieldFormula::LinearX => "linear-x",
            FieldFormula::LinearXY => "linear-xy",
            FieldFormula::Quadratic => "quadratic",
            FieldFormula::Oscillatory { .. } => "oscillatory",
        }
    }

    /// Evaluates the formula at normalised coordinates `(u, v) ∈ [0, 1]²`.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        match *self {
            // Unclamped: a `value` above 0.5 lands outside the default [0, 1] range.
            FieldFormula::Constant { value } => value + 0.5,
            FieldFormula::LinearX => u,
            FieldFormula::LinearXY => to_centered(u) + to_centered(v),
            FieldFormula::Quadratic => {
                let (x, y) = (to_centered(u), to_centered(v));
                x * x + y * y
            }
            FieldFormula::Oscillatory { scale } => {
                let x = scale * to_centered(u);
                let y = scale * to_centered(v);
                (x * x + y * y).sin()
            }
        }
    }

    pub fn tracks_range(&self) -> bool {
        matches!(self, FieldFormula::Oscillatory { .. })
    }
}

impl Default for FieldFormula {
    fn default() -> Self {
        Self::oscillatory_reference()
    }
}

impl fmt::Display for FieldFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFormula::Constant { value } => write!(f, "constant({value})"),
            FieldFormula::Oscillatory { scale } => write!(f, "oscillatory(scale={scale})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Generates a `width × height` field using the formula's own range policy.
///
/// # Panics
///
/// Panics when either dimension is zero.
pub fn generate(formula: FieldFormula, width: u32, height: u32) -> ScalarField {
    generate_with(formula, width, height, RangeMode::Formula)
}

/// Generates a field, choosing explicitly how its range is determined.
pub fn generate_with(
    formula: FieldFormula,
    width: u32,
    height: u32,
    range_mode: RangeMode,
) -> ScalarField {
    assert!(
        width > 0 && height > 0,
        "scalar field dimensions must be positive (got {width}x{height})"
    );
    let (inv_width, inv_height) = inverse_dimensions(width, height);
    let field = ScalarField::from_fn(width, height, |x, y| {
        formula.sample(x as f32 * inv_width, y as f32 * inv_height)
    });

    let measure = formula.tracks_range() || matches!(range_mode, RangeMode::Observed);
    let field = if measure {
        field.with_observed_range()
    } else {
        field
    };

    tracing::debug!(
        formula = %formula,
        width,
        height,
        min = field.min(),
        max = field.max(),
        measured = measure,
        "generated scalar field"
    );
    field
}
