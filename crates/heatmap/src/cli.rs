use std::path::PathBuf;

use clap::Parser;
use renderer::DEFAULT_TITLE;
use scalar_field::{FieldFormula, RangeMode, OSCILLATORY_REFERENCE_SCALE};

pub const DEFAULT_SHADER_DIR: &str = "resources/shaders";
pub const VERTEX_SHADER_FILE: &str = "texture.vert";
pub const FRAGMENT_SHADER_FILE: &str = "texture.frag";

/// Formula family selected with `--formula`; parameters come from their own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    Constant,
    LinearX,
    LinearXY,
    Quadratic,
    Oscillatory,
}

#[derive(Parser, Debug)]
#[command(
    name = "heatmap",
    author,
    version,
    about = "Render a 2D scalar field as a heat map"
)]
pub struct Args {
    /// Field formula: `constant`, `linear-x`, `linear-xy`, `quadratic`, or `oscillatory`.
    #[arg(
        long,
        value_name = "FORMULA",
        value_parser = parse_formula,
        default_value = "oscillatory"
    )]
    pub formula: FormulaKind,

    /// Field resolution in cells (e.g. `100x100`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_dimensions,
        default_value = "100x100"
    )]
    pub field_size: (u32, u32),

    /// Value used by the `constant` formula (cells hold `value + 0.5`).
    #[arg(long, value_name = "VALUE", default_value_t = 0.0, allow_negative_numbers = true)]
    pub value: f32,

    /// Domain half-width of the `oscillatory` formula.
    #[arg(long, value_name = "SCALE", default_value_t = OSCILLATORY_REFERENCE_SCALE)]
    pub scale: f32,

    /// Normalise against the measured min/max of the field, whatever the formula.
    #[arg(long)]
    pub observed_range: bool,

    /// Window size in physical pixels (e.g. `800x800`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_dimensions,
        default_value = "800x800"
    )]
    pub window_size: (u32, u32),

    /// Window title.
    #[arg(long, value_name = "TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Directory holding `texture.vert` and `texture.frag`.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SHADER_DIR)]
    pub shader_dir: PathBuf,

    /// Vertex shader path; overrides the one in `--shader-dir`.
    #[arg(long, value_name = "PATH")]
    pub vertex_shader: Option<PathBuf>,

    /// Fragment shader path; overrides the one in `--shader-dir`.
    #[arg(long, value_name = "PATH")]
    pub fragment_shader: Option<PathBuf>,

    /// Generate the field and report its bounds without opening a window.
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Combines `--formula` with its parameter flags.
    pub fn field_formula(&self) -> FieldFormula {
        match self.formula {
            FormulaKind::Constant => FieldFormula::Constant { value: self.value },
            FormulaKind::LinearX => FieldFormula::LinearX,
            FormulaKind::LinearXY => FieldFormula::LinearXY,
            FormulaKind::Quadratic => FieldFormula::Quadratic,
            FormulaKind::Oscillatory => FieldFormula::Oscillatory { scale: self.scale },
        }
    }

    pub fn range_mode(&self) -> RangeMode {
        if self.observed_range {
            RangeMode::Observed
        } else {
            RangeMode::Formula
        }
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.vertex_shader
            .clone()
            .unwrap_or_else(|| self.shader_dir.join(VERTEX_SHADER_FILE))
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.fragment_shader
            .clone()
            .unwrap_or_else(|| self.shader_dir.join(FRAGMENT_SHADER_FILE))
    }
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_formula(value: &str) -> Result<FormulaKind, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("formula must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase().replace('_', "-");
    match normalized.as_str() {
        "constant" => Ok(FormulaKind::Constant),
        "linear-x" | "linearx" => Ok(FormulaKind::LinearX),
        "linear-xy" | "linearxy" => Ok(FormulaKind::LinearXY),
        "quadratic" => Ok(FormulaKind::Quadratic),
        "oscillatory" | "reference" | "python-reference" => Ok(FormulaKind::Oscillatory),
        _ => Err(format!(
            "unknown formula '{trimmed}'; expected constant, linear-x, linear-xy, quadratic, or oscillatory"
        )),
    }
}

pub fn parse_dimensions(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, e.g. 100x100 (got '{trimmed}')"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width.trim()))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", height.trim()))?;

    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}
