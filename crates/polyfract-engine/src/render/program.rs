//! Shader program builder.
//!
//! A program is a vertex + fragment pair written in WGSL. Before anything reaches
//! the device both stages are parsed and validated with naga (compile check) and
//! their entry points and stage interface are matched (link check), so a broken
//! shader fails here with a readable diagnostic instead of inside the driver.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;
use wgpu::naga;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

/// Pipeline stage a shader source targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{message}")]
    Compile { stage: Stage, message: String },

    #[error("{stage} shader has no @{stage} entry point named `{name}`")]
    MissingEntryPoint { stage: Stage, name: String },

    #[error("fragment input @location({location}) is not written by the vertex stage")]
    UnlinkedVarying { location: u32 },

    #[error("vertex stage does not read a vertex attribute at @location({location})")]
    MissingAttribute { location: u32 },
}

/// WGSL sources and entry points for a vertex + fragment program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
    pub vertex_entry: Cow<'static, str>,
    pub fragment_entry: Cow<'static, str>,
}

impl Default for ShaderSources {
    /// The flat-color polygon program.
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(include_str!("shaders/polygon.vert.wgsl")),
            fragment: Cow::Borrowed(include_str!("shaders/polygon.frag.wgsl")),
            vertex_entry: Cow::Borrowed("vs_main"),
            fragment_entry: Cow::Borrowed("fs_main"),
        }
    }
}

/// Stage interface of a validated program, keyed by `@location`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInterface {
    /// Vertex attributes read by the vertex entry point.
    pub attributes: BTreeSet<u32>,
    /// Values written by the vertex stage for the fragment stage.
    pub varyings: BTreeSet<u32>,
    /// Color targets written by the fragment entry point.
    pub targets: BTreeSet<u32>,
}

impl ShaderSources {
    /// Compiles and links both stages without touching a GPU device.
    pub fn validate(&self) -> Result<ProgramInterface, ShaderError> {
        let vertex = compile_stage(Stage::Vertex, &self.vertex)?;
        let fragment = compile_stage(Stage::Fragment, &self.fragment)?;

        let vs = find_entry(&vertex, Stage::Vertex, &self.vertex_entry)?;
        let fs = find_entry(&fragment, Stage::Fragment, &self.fragment_entry)?;

        let mut interface = ProgramInterface::default();
        for arg in &vs.function.arguments {
            collect_locations(&vertex, arg.ty, arg.binding.as_ref(), &mut interface.attributes);
        }
        if let Some(result) = &vs.function.result {
            collect_locations(&vertex, result.ty, result.binding.as_ref(), &mut interface.varyings);
        }

        let mut fragment_inputs = BTreeSet::new();
        for arg in &fs.function.arguments {
            collect_locations(&fragment, arg.ty, arg.binding.as_ref(), &mut fragment_inputs);
        }
        if let Some(location) = fragment_inputs.difference(&interface.varyings).next() {
            return Err(ShaderError::UnlinkedVarying { location: *location });
        }
        if let Some(result) = &fs.function.result {
            collect_locations(&fragment, result.ty, result.binding.as_ref(), &mut interface.targets);
        }

        Ok(interface)
    }
}

/// Linked program: one shader module per stage plus its entry points.
pub struct ShaderProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    vertex_entry: Cow<'static, str>,
    fragment_entry: Cow<'static, str>,
    interface: ProgramInterface,
}

impl ShaderProgram {
    /// Validates `sources` and creates the device shader modules.
    pub fn build(device: &wgpu::Device, sources: &ShaderSources) -> Result<Self, ShaderError> {
        let interface = sources.validate()?;

        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("polyfract vertex shader"),
            source: wgpu::ShaderSource::Wgsl(sources.vertex.clone()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("polyfract fragment shader"),
            source: wgpu::ShaderSource::Wgsl(sources.fragment.clone()),
        });

        log::debug!(
            "shader program linked: attributes {:?}, varyings {:?}, targets {:?}",
            interface.attributes,
            interface.varyings,
            interface.targets
        );

        Ok(Self {
            vertex,
            fragment,
            vertex_entry: sources.vertex_entry.clone(),
            fragment_entry: sources.fragment_entry.clone(),
            interface,
        })
    }

    pub fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }
}

fn compile_stage(stage: Stage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            message: e.emit_to_string(source),
        })?;

    Ok(module)
}

fn find_entry<'m>(
    module: &'m naga::Module,
    stage: Stage,
    name: &str,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga() && ep.name == name)
        .ok_or_else(|| ShaderError::MissingEntryPoint {
            stage,
            name: name.to_string(),
        })
}

// Builtins are skipped; struct arguments/results contribute their members' locations.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(vertex: &'static str, fragment: &'static str) -> ShaderSources {
        ShaderSources {
            vertex: Cow::Borrowed(vertex),
            fragment: Cow::Borrowed(fragment),
            ..ShaderSources::default()
        }
    }

    const PASSTHROUGH_VS: &str = r"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) tint: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.pos = vec4<f32>(position, 0.0, 1.0);
    out.tint = vec4<f32>(1.0, 1.0, 1.0, 1.0);
    return out;
}
";

    // ── built-in program ──────────────────────────────────────────────────

    #[test]
    fn builtin_program_validates() {
        let interface = ShaderSources::default().validate().unwrap();
        assert_eq!(interface.attributes, BTreeSet::from([0]));
        assert!(interface.varyings.is_empty());
        assert_eq!(interface.targets, BTreeSet::from([0]));
    }

    // ── compile check ─────────────────────────────────────────────────────

    #[test]
    fn syntax_error_reports_stage() {
        let defaults = ShaderSources::default();
        let broken = ShaderSources {
            vertex: Cow::Borrowed("@vertex fn vs_main( -> {"),
            ..defaults
        };
        match broken.validate() {
            Err(ShaderError::Compile { stage, message }) => {
                assert_eq!(stage, Stage::Vertex);
                assert!(!message.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let fs = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let defaults = ShaderSources::default();
        let broken = ShaderSources {
            fragment: Cow::Borrowed(fs),
            ..defaults
        };
        assert!(matches!(
            broken.validate(),
            Err(ShaderError::Compile { stage: Stage::Fragment, .. })
        ));
    }

    // ── link check ────────────────────────────────────────────────────────

    #[test]
    fn missing_entry_point_is_reported() {
        let defaults = ShaderSources::default();
        let renamed = ShaderSources {
            fragment_entry: Cow::Borrowed("main"),
            ..defaults
        };
        assert_eq!(
            renamed.validate(),
            Err(ShaderError::MissingEntryPoint {
                stage: Stage::Fragment,
                name: "main".to_string(),
            })
        );
    }

    #[test]
    fn entry_point_of_wrong_stage_does_not_count() {
        // `vs_main` exists but is declared as a fragment entry.
        let vs = "@fragment fn vs_main() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }";
        let defaults = ShaderSources::default();
        let wrong = ShaderSources {
            vertex: Cow::Borrowed(vs),
            ..defaults
        };
        assert!(matches!(
            wrong.validate(),
            Err(ShaderError::MissingEntryPoint { stage: Stage::Vertex, .. })
        ));
    }

    #[test]
    fn fragment_input_must_be_written_by_vertex() {
        let fs = r"
@fragment
fn fs_main(@location(3) shade: vec4<f32>) -> @location(0) vec4<f32> {
    return shade;
}
";
        let vs = include_str!("shaders/polygon.vert.wgsl");
        assert_eq!(
            sources(vs, fs).validate(),
            Err(ShaderError::UnlinkedVarying { location: 3 })
        );
    }

    #[test]
    fn matched_varyings_link() {
        let fs = r"
@fragment
fn fs_main(@location(0) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
";
        let interface = sources(PASSTHROUGH_VS, fs).validate().unwrap();
        assert_eq!(interface.varyings, BTreeSet::from([0]));
        assert_eq!(interface.attributes, BTreeSet::from([0]));
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = ShaderError::MissingEntryPoint {
            stage: Stage::Vertex,
            name: "vs_main".into(),
        };
        assert_eq!(
            err.to_string(),
            "vertex shader has no @vertex entry point named `vs_main`"
        );
    }
}
