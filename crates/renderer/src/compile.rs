use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::{Binding, Handle, Module, ShaderStage, Type, TypeInner};

/// Sampler bound next to the field texture (texture unit 0).
pub const SAMPLER_UNIFORM: &str = "uTextureSampler";
/// Lower normalisation bound read by the fragment stage.
pub const MIN_UNIFORM: &str = "uScalarFieldMin";
/// Upper normalisation bound read by the fragment stage.
pub const MAX_UNIFORM: &str = "uScalarFieldMax";

const REQUIRED_UNIFORMS: [&str; 3] = [SAMPLER_UNIFORM, MIN_UNIFORM, MAX_UNIFORM];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl ShaderStageKind {
    fn naga_stage(self) -> ShaderStage {
        match self {
            ShaderStageKind::Vertex => ShaderStage::Vertex,
            ShaderStageKind::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageKind::Vertex => f.write_str("vertex"),
            ShaderStageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Why a shader program could not be built. Callers must not draw with a
/// program that failed to build; the diagnostic has already been logged.
#[derive(Debug, thiserror::Error)]
pub enum ShaderBuildError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStageKind, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

impl ShaderBuildError {
    pub fn log(&self) -> &str {
        match self {
            ShaderBuildError::Compile { log, .. } | ShaderBuildError::Link { log } => log,
        }
    }
}

/// GLSL text for both programmable stages.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads both stages from disk as UTF-8.
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self> {
        let vertex = fs::read_to_string(vertex_path).with_context(|| {
            format!("failed to read vertex shader at {}", vertex_path.display())
        })?;
        let fragment = fs::read_to_string(fragment_path).with_context(|| {
            format!(
                "failed to read fragment shader at {}",
                fragment_path.display()
            )
        })?;
        tracing::debug!(
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
            "loaded shader sources"
        );
        Ok(Self { vertex, fragment })
    }
}

/// A stage that parsed and type-checked successfully.
pub(crate) struct CompiledStage<'a> {
    pub stage: ShaderStageKind,
    pub source: &'a str,
    pub module: Module,
}

impl CompiledStage<'_> {
    pub(crate) fn shader_source(&self) -> wgpu::ShaderSource<'_> {
        wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(self.source),
            stage: self.stage.naga_stage(),
            defines: &[],
        }
    }
}

/// Both stages compiled and their interfaces agree.
pub(crate) struct LinkedStages<'a> {
    pub vertex: CompiledStage<'a>,
    pub fragment: CompiledStage<'a>,
}

/// Runs the device-independent half of program building: compile the vertex
/// stage, then the fragment stage, then match the stage interface.
///
/// Stops at the first failing step.
pub(crate) fn prepare_program(sources: &ShaderSources) -> Result<LinkedStages<'_>, ShaderBuildError> {
    let vertex = compile_stage(ShaderStageKind::Vertex, &sources.vertex)?;
    tracing::debug!("vertex shader compiled");
    let fragment = compile_stage(ShaderStageKind::Fragment, &sources.fragment)?;
    tracing::debug!("fragment shader compiled");

    if let Err(log) = check_interface(&vertex.module, &fragment.module) {
        tracing::error!("failed to link shader program: {log}");
        return Err(ShaderBuildError::Link { log });
    }

    let missing = missing_uniforms(&fragment.module);
    if !missing.is_empty() {
        tracing::warn!(
            ?missing,
            "fragment shader does not declare every scalar field uniform"
        );
    }

    Ok(LinkedStages { vertex, fragment })
}

pub(crate) fn compile_stage(
    stage: ShaderStageKind,
    source: &str,
) -> Result<CompiledStage<'_>, ShaderBuildError> {
    let mut frontend = Frontend::default();
    match frontend.parse(&Options::from(stage.naga_stage()), source) {
        Ok(module) => Ok(CompiledStage {
            stage,
            source,
            module,
        }),
        Err(errors) => {
            let log = errors.emit_to_string(source);
            tracing::error!(%stage, "failed to compile {stage} shader:\n{log}");
            Err(ShaderBuildError::Compile { stage, log })
        }
    }
}

/// Every location the fragment stage reads must be written by the vertex
/// stage with the same type.
fn check_interface(vertex: &Module, fragment: &Module) -> Result<(), String> {
    let outputs = stage_locations(vertex, ShaderStage::Vertex, Direction::Output);
    let inputs = stage_locations(fragment, ShaderStage::Fragment, Direction::Input);

    let mut problems = Vec::new();
    for (location, expected) in &inputs {
        match outputs.get(location) {
            None => problems.push(format!(
                "fragment input at location {location} is not written by the vertex stage"
            )),
            Some(found) if found != expected => problems.push(format!(
                "location {location}: vertex stage writes {found:?} but fragment stage reads {expected:?}"
            )),
            Some(_) => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Input,
    Output,
}

fn stage_locations(
    module: &Module,
    stage: ShaderStage,
    direction: Direction,
) -> BTreeMap<u32, TypeInner> {
    let mut locations = BTreeMap::new();
    let Some(entry) = module.entry_points.iter().find(|entry| entry.stage == stage) else {
        return locations;
    };
    match direction {
        Direction::Input => {
            for argument in &entry.function.arguments {
                collect_locations(module, argument.ty, argument.binding.as_ref(), &mut locations);
            }
        }
        Direction::Output => {
            if let Some(result) = entry.function.result.as_ref() {
                collect_locations(module, result.ty, result.binding.as_ref(), &mut locations);
            }
        }
    }
    locations
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    locations: &mut BTreeMap<u32, TypeInner>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            locations.insert(*location, module.types[ty].inner.clone());
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), locations);
                }
            }
        }
    }
}

/// Names from [`REQUIRED_UNIFORMS`] the module never declares, either as a
/// global or as a member of a uniform block.
fn missing_uniforms(module: &Module) -> Vec<&'static str> {
    let mut declared = Vec::new();
    for (_, global) in module.global_variables.iter() {
        if let Some(name) = global.name.as_deref() {
            declared.push(name);
        }
        if let TypeInner::Struct { members, .. } = &module.types[global.ty].inner {
            declared.extend(members.iter().filter_map(|member| member.name.as_deref()));
        }
    }
    REQUIRED_UNIFORMS
        .into_iter()
        .filter(|name| !declared.contains(name))
        .collect()
}
