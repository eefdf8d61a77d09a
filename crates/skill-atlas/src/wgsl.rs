//! WGSL source for the skill fragment stage.
//!
//! The generated shader does exactly what [`crate::remap::shade`] does:
//!
//! ```wgsl
//! let uv = in_uv * frame.zw + frame.xy;
//! return textureSample(skill_texture, skill_sampler, uv);
//! ```
//!
//! Only the declaration of slot 0 changes with the [`BindingShape`].

use std::fmt::Write;

use crate::binding::{
    BindingShape, SAMPLER_BINDING, TEXTURE_BINDING, TRANSFORM_BINDING, validate_identifier,
};
use crate::error::AtlasResult;

/// Where the shader will be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ShaderTarget {
    /// A Bevy `Material`: uses the mesh `VertexOutput` and the material bind
    /// group placeholder resolved by Bevy's shader preprocessor.
    #[default]
    Bevy,
    /// A plain pipeline with its own fragment input at `@location(0)`.
    Standalone { group: u32, entry_point: String },
}

impl ShaderTarget {
    /// Standalone shader at group 0 with entry point `fs_main`.
    #[must_use]
    pub fn standalone() -> Self {
        Self::Standalone {
            group: 0,
            entry_point: "fs_main".to_owned(),
        }
    }

    fn group(&self) -> String {
        match self {
            Self::Bevy => "#{MATERIAL_BIND_GROUP}".to_owned(),
            Self::Standalone { group, .. } => group.to_string(),
        }
    }
}

/// Options for [`generate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShaderOptions {
    pub shape: BindingShape,
    pub target: ShaderTarget,
}

/// Emit the fragment shader source.
pub fn generate(options: &ShaderOptions) -> AtlasResult<String> {
    options.shape.validate()?;
    if let ShaderTarget::Standalone { entry_point, .. } = &options.target {
        validate_identifier(entry_point)?;
    }

    let group = options.target.group();
    let frame = options.shape.access_expr();
    let mut out = String::new();

    // Writing to a String cannot fail.
    match &options.target {
        ShaderTarget::Bevy => {
            let _ = writeln!(out, "#import bevy_pbr::forward_io::VertexOutput\n");
        }
        ShaderTarget::Standalone { .. } => {
            let _ = writeln!(
                out,
                "struct FragmentInput {{\n    @location(0) uv: vec2<f32>,\n}};\n"
            );
        }
    }

    match &options.shape {
        BindingShape::Bare { name } => {
            let _ = writeln!(
                out,
                "@group({group}) @binding({TRANSFORM_BINDING}) var<uniform> {name}: vec4<f32>;"
            );
        }
        BindingShape::Wrapped(names) => {
            let _ = writeln!(
                out,
                "struct {} {{\n    {}: vec4<f32>,\n}};\n",
                names.type_name, names.field_name
            );
            let _ = writeln!(
                out,
                "@group({group}) @binding({TRANSFORM_BINDING}) var<uniform> {}: {};",
                names.instance_name, names.type_name
            );
        }
    }
    let _ = writeln!(
        out,
        "@group({group}) @binding({TEXTURE_BINDING}) var skill_texture: texture_2d<f32>;"
    );
    let _ = writeln!(
        out,
        "@group({group}) @binding({SAMPLER_BINDING}) var skill_sampler: sampler;\n"
    );

    let (signature, input_uv) = match &options.target {
        ShaderTarget::Bevy => ("fragment(mesh: VertexOutput)".to_owned(), "mesh.uv"),
        ShaderTarget::Standalone { entry_point, .. } => {
            (format!("{entry_point}(in: FragmentInput)"), "in.uv")
        }
    };
    let _ = writeln!(out, "@fragment\nfn {signature} -> @location(0) vec4<f32> {{");
    let _ = writeln!(out, "    let uv = {input_uv} * {frame}.zw + {frame}.xy;");
    let _ = writeln!(out, "    return textureSample(skill_texture, skill_sampler, uv);");
    let _ = writeln!(out, "}}");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtlasError;
    use crate::binding::RecordNames;

    #[test]
    fn bevy_bare_shader() {
        let source = generate(&ShaderOptions::default()).unwrap();

        assert!(source.starts_with("#import bevy_pbr::forward_io::VertexOutput"));
        assert!(source.contains(
            "@group(#{MATERIAL_BIND_GROUP}) @binding(0) var<uniform> frame: vec4<f32>;"
        ));
        assert!(source.contains(
            "@group(#{MATERIAL_BIND_GROUP}) @binding(1) var skill_texture: texture_2d<f32>;"
        ));
        assert!(source.contains("@group(#{MATERIAL_BIND_GROUP}) @binding(2) var skill_sampler: sampler;"));
        assert!(source.contains("fn fragment(mesh: VertexOutput) -> @location(0) vec4<f32>"));
        assert!(source.contains("let uv = mesh.uv * frame.zw + frame.xy;"));
    }

    #[test]
    fn bevy_wrapped_shader() {
        let source = generate(&ShaderOptions {
            shape: BindingShape::wrapped(),
            target: ShaderTarget::Bevy,
        })
        .unwrap();

        assert!(source.contains("struct SkillMaterial {\n    frame: vec4<f32>,\n};"));
        assert!(source.contains("@binding(0) var<uniform> material: SkillMaterial;"));
        assert!(source.contains("let uv = mesh.uv * material.frame.zw + material.frame.xy;"));
        assert!(!source.contains("var<uniform> frame"));
    }

    #[test]
    fn shapes_differ_only_in_slot_zero() {
        let bare = generate(&ShaderOptions::default()).unwrap();
        let wrapped = generate(&ShaderOptions {
            shape: BindingShape::wrapped(),
            ..ShaderOptions::default()
        })
        .unwrap();

        for line in [
            "var skill_texture: texture_2d<f32>;",
            "var skill_sampler: sampler;",
            "return textureSample(skill_texture, skill_sampler, uv);",
        ] {
            assert!(bare.contains(line) && wrapped.contains(line), "{line}");
        }
    }

    #[test]
    fn standalone_uses_literal_group_and_own_input() {
        let source = generate(&ShaderOptions {
            shape: BindingShape::bare(),
            target: ShaderTarget::Standalone {
                group: 2,
                entry_point: "skill_main".to_owned(),
            },
        })
        .unwrap();

        assert!(!source.contains("#import"));
        assert!(source.contains("@location(0) uv: vec2<f32>,"));
        assert!(source.contains("@group(2) @binding(1) var skill_texture"));
        assert!(source.contains("fn skill_main(in: FragmentInput) -> @location(0) vec4<f32>"));
        assert!(source.contains("let uv = in.uv * frame.zw + frame.xy;"));
    }

    #[test]
    fn rejects_invalid_names() {
        let err = generate(&ShaderOptions {
            shape: BindingShape::Wrapped(RecordNames {
                type_name: "Skill Material".to_owned(),
                ..RecordNames::default()
            }),
            target: ShaderTarget::Bevy,
        })
        .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidIdentifier(name) if name == "Skill Material"));

        let err = generate(&ShaderOptions {
            shape: BindingShape::bare(),
            target: ShaderTarget::Standalone {
                group: 0,
                entry_point: "fn".to_owned(),
            },
        })
        .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidIdentifier(_)));
    }
}
