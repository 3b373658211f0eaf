use wgpu::naga;

use crate::error::ShaderStage;

/// Vertex + fragment GLSL for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// Full-screen procedural checkerboard or flat fill.
pub const BACKGROUND_SOURCES: ShaderSources = ShaderSources {
    vertex: include_str!("../shaders/background.vert"),
    fragment: include_str!("../shaders/background.frag"),
};

/// Scaled textured quad with channel masking.
pub const IMAGE_SOURCES: ShaderSources = ShaderSources {
    vertex: include_str!("../shaders/image.vert"),
    fragment: include_str!("../shaders/image.frag"),
};

/// GLSL dialect the embedded programs are written in.
pub const SHADER_LANGUAGE: &str = "GLSL 450 (naga)";

/// Parses and validates one stage, returning the compiler log on failure.
pub fn check_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, String> {
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
        ShaderStage::Link => return Err("link is not a compilable stage".to_string()),
    };
    let mut frontend = naga::front::glsl::Frontend::default();
    let module = frontend
        .parse(&naga::front::glsl::Options::from(naga_stage), source)
        .map_err(|errors| errors.emit_to_string(source))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|error| error.emit_to_string(source))?;

    Ok(module)
}

/// Checks that the vertex outputs feed the fragment inputs by location.
///
/// naga validates each stage in isolation; this is the interface half of a
/// link step.
pub fn check_interface(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), String> {
    let outputs = entry_locations(vertex, naga::ShaderStage::Vertex, false);
    let inputs = entry_locations(fragment, naga::ShaderStage::Fragment, true);
    let missing: Vec<String> = inputs
        .iter()
        .filter(|location| !outputs.contains(location))
        .map(|location| location.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "fragment inputs at location(s) {} are not written by the vertex stage",
            missing.join(", ")
        ))
    }
}

fn entry_locations(module: &naga::Module, stage: naga::ShaderStage, inputs: bool) -> Vec<u32> {
    let mut locations = Vec::new();
    for entry in module.entry_points.iter().filter(|entry| entry.stage == stage) {
        let function = &entry.function;
        let bindings: Vec<&naga::Binding> = if inputs {
            function
                .arguments
                .iter()
                .flat_map(|argument| binding_list(module, argument.ty, argument.binding.as_ref()))
                .collect()
        } else {
            function
                .result
                .iter()
                .flat_map(|result| binding_list(module, result.ty, result.binding.as_ref()))
                .collect()
        };
        locations.extend(bindings.into_iter().filter_map(|binding| match binding {
            naga::Binding::Location { location, .. } => Some(*location),
            naga::Binding::BuiltIn(_) => None,
        }));
    }
    locations.sort_unstable();
    locations.dedup();
    locations
}

fn binding_list<'a>(
    module: &'a naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&'a naga::Binding>,
) -> Vec<&'a naga::Binding> {
    if let Some(binding) = binding {
        return vec![binding];
    }
    match &module.types[ty].inner {
        naga::TypeInner::Struct { members, .. } => members
            .iter()
            .filter_map(|member| member.binding.as_ref())
            .collect(),
        _ => Vec::new(),
    }
}
