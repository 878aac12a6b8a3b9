use std::fmt;

/// Normalisation bounds handed to the fragment stage as `min`/`max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
}

impl FieldRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Measures the true extremes of `samples`.
    ///
    /// Non-finite samples are ignored. Falls back to the default `[0, 1]`
    /// bounds when nothing finite is left to measure.
    pub fn observed(samples: &[f32]) -> Self {
        let (min, max) = samples
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            });
        if min > max {
            Self::default()
        } else {
            Self { min, max }
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for FieldRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl fmt::Display for FieldRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Row-major grid of samples, `index = x + y * width`.
///
/// Dimensions are fixed at construction and must both be positive; a zero
/// dimension is a programming error and panics.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: u32,
    height: u32,
    samples: Vec<f32>,
    range: FieldRange,
}

impl ScalarField {
    /// Builds a field by evaluating `sample(x, y)` for every cell.
    ///
    /// The range stays at the default `[0, 1]`; use
    /// [`ScalarField::with_observed_range`] to measure it instead.
    pub fn from_fn<F>(width: u32, height: u32, mut sample: F) -> Self
    where
        F: FnMut(u32, u32) -> f32,
    {
        assert!(
            width > 0 && height > 0,
            "scalar field dimensions must be positive (got {width}x{height})"
        );
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(sample(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
            range: FieldRange::default(),
        }
    }

    /// Replaces the default bounds with the extremes found in the samples.
    pub fn with_observed_range(mut self) -> Self {
        self.range = FieldRange::observed(&self.samples);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn range(&self) -> FieldRange {
        self.range
    }

    pub fn min(&self) -> f32 {
        self.range.min
    }

    pub fn max(&self) -> f32 {
        self.range.max
    }

    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Returns the sample at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(self.index(x, y)).copied()
    }

    /// Iterates one row (`y` fixed) from left to right.
    pub fn row(&self, y: u32) -> &[f32] {
        let start = self.index(0, y);
        &self.samples[start..start + self.width as usize]
    }
}

/// Steps between neighbouring cells in normalised `[0, 1]` coordinates.
///
/// Each axis is handled on its own. A single-cell axis has no spacing to
/// invert, so it logs a warning and gets a step of `1` while the other axis
/// keeps `1 / (n - 1)`.
pub fn inverse_dimensions(width: u32, height: u32) -> (f32, f32) {
    if width <= 1 || height <= 1 {
        tracing::warn!(
            width,
            height,
            "scalar field has a single-cell axis; using unit spacing along it"
        );
    }
    (inverse_step(width), inverse_step(height))
}

fn inverse_step(cells: u32) -> f32 {
    if cells <= 1 {
        1.0
    } else {
        1.0 / (cells - 1) as f32
    }
}

/// Maps a `[0, 1]` coordinate onto the centred `[-1, 1]` domain.
pub fn to_centered(value: f32) -> f32 {
    2.0 * value - 1.0
}
