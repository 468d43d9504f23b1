use std::collections::BTreeSet;
use std::path::Path;

use wgpu::naga;

use crate::error::ShaderError;
use crate::geometry::VertexAttribute;

pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

/// Both stages compiled to naga IR and checked against each other.
#[derive(Debug)]
pub struct LinkedProgram {
    pub(crate) vertex: naga::Module,
    pub(crate) fragment: naga::Module,
    attributes: Vec<VertexAttribute>,
}

impl LinkedProgram {
    /// Vertex attributes the vertex stage reads, in slot order.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }
}

/// Compiles a vertex and a fragment WGSL source and links them.
///
/// Link rules:
/// - the vertex module has a `vs_main` vertex entry point and declares the MVP
///   uniform at `@group(0) @binding(0)`
/// - the fragment module has an `fs_main` fragment entry point
/// - vertex inputs are exactly `{0}` or `{0, 1}`
/// - every fragment input location is written by the vertex stage
pub fn link(vertex: (&Path, &str), fragment: (&Path, &str)) -> Result<LinkedProgram, ShaderError> {
    let vertex_module = compile(vertex.0, vertex.1)?;
    let fragment_module = compile(fragment.0, fragment.1)?;

    let vs = entry_point(&vertex_module, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    let fs = entry_point(&fragment_module, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    if !declares_mvp_uniform(&vertex_module) {
        return Err(ShaderError::Link(format!(
            "{} declares no uniform at @group(0) @binding(0) for the MVP matrix",
            vertex.0.display()
        )));
    }

    let attributes = vertex_attributes(&vertex_module, vs)?;

    let produced: BTreeSet<u32> = vs
        .function
        .result
        .iter()
        .flat_map(|r| locations(&vertex_module, r.binding.as_ref(), r.ty))
        .collect();

    for location in fs
        .function
        .arguments
        .iter()
        .flat_map(|a| locations(&fragment_module, a.binding.as_ref(), a.ty))
    {
        if !produced.contains(&location) {
            return Err(ShaderError::Link(format!(
                "fragment input @location({location}) is not written by the vertex stage"
            )));
        }
    }

    Ok(LinkedProgram {
        vertex: vertex_module,
        fragment: fragment_module,
        attributes,
    })
}

fn compile(path: &Path, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        path: path.to_path_buf(),
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Compile {
        path: path.to_path_buf(),
        message: e.emit_to_string(source),
    })?;

    Ok(module)
}

fn entry_point<'m>(
    module: &'m naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| ShaderError::Link(format!("missing {stage:?} entry point `{name}`")))
}

fn declares_mvp_uniform(module: &naga::Module) -> bool {
    module.global_variables.iter().any(|(_, var)| {
        var.space == naga::AddressSpace::Uniform
            && var
                .binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
    })
}

fn vertex_attributes(
    module: &naga::Module,
    vs: &naga::EntryPoint,
) -> Result<Vec<VertexAttribute>, ShaderError> {
    let inputs: BTreeSet<u32> = vs
        .function
        .arguments
        .iter()
        .flat_map(|a| locations(module, a.binding.as_ref(), a.ty))
        .collect();

    let attributes: Vec<VertexAttribute> = VertexAttribute::ALL
        .into_iter()
        .filter(|attr| inputs.contains(&attr.slot()))
        .collect();

    let known = attributes.len() == inputs.len();
    let starts_at_position = attributes.first() == Some(&VertexAttribute::Position);
    if !known || !starts_at_position {
        return Err(ShaderError::Link(format!(
            "vertex inputs {inputs:?} must be @location(0) or @location(0) + @location(1)"
        )));
    }

    Ok(attributes)
}

/// User-defined IO locations of a binding, flattening struct members.
fn locations(module: &naga::Module, binding: Option<&naga::Binding>, ty: naga::Handle<naga::Type>) -> Vec<u32> {
    match binding {
        Some(naga::Binding::Location { location, .. }) => vec![*location],
        Some(naga::Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            naga::TypeInner::Struct { members, .. } => members
                .iter()
                .flat_map(|m| locations(module, m.binding.as_ref(), m.ty))
                .collect(),
            _ => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT_VS: &str = "
        @group(0) @binding(0) var<uniform> mvp: mat4x4<f32>;

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return mvp * vec4<f32>(position, 1.0);
        }
    ";

    const FLAT_FS: &str = "
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    ";

    const COLOR_VS: &str = "
        @group(0) @binding(0) var<uniform> mvp: mat4x4<f32>;

        struct VertexOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) color: vec3<f32>,
        };

        @vertex
        fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec3<f32>) -> VertexOut {
            var out: VertexOut;
            out.clip = mvp * vec4<f32>(position, 1.0);
            out.color = color;
            return out;
        }
    ";

    const COLOR_FS: &str = "
        @fragment
        fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(color, 1.0);
        }
    ";

    fn try_link(vs: &str, fs: &str) -> Result<LinkedProgram, ShaderError> {
        link((Path::new("test.vert.wgsl"), vs), (Path::new("test.frag.wgsl"), fs))
    }

    #[test]
    fn links_position_only_program() {
        let linked = try_link(FLAT_VS, FLAT_FS).unwrap();
        assert_eq!(linked.attributes(), &[VertexAttribute::Position]);
    }

    #[test]
    fn links_position_and_color_program() {
        let linked = try_link(COLOR_VS, COLOR_FS).unwrap();
        assert_eq!(
            linked.attributes(),
            &[VertexAttribute::Position, VertexAttribute::Color]
        );
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = try_link("@vertex fn vs_main( {", FLAT_FS).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { ref path, .. } if path.ends_with("test.vert.wgsl")));
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let err = try_link(FLAT_VS, FLAT_FS.replace("fs_main", "main").as_str()).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("fs_main")));
    }

    #[test]
    fn missing_mvp_uniform_fails_to_link() {
        let vs = "
            @vertex
            fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position, 1.0);
            }
        ";
        let err = try_link(vs, FLAT_FS).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("MVP")));
    }

    #[test]
    fn unmatched_fragment_input_fails_to_link() {
        let err = try_link(FLAT_VS, COLOR_FS).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("@location(0)")));
    }

    #[test]
    fn unsupported_vertex_input_fails_to_link() {
        let vs = "
            @group(0) @binding(0) var<uniform> mvp: mat4x4<f32>;

            @vertex
            fn vs_main(@location(3) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return mvp * vec4<f32>(position, 1.0);
            }
        ";
        assert!(matches!(try_link(vs, FLAT_FS), Err(ShaderError::Link(_))));
    }
}
