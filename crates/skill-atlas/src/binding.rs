//! Binding layout shared between the host material and the fragment stage.
//!
//! | Slot | Resource | WGSL type |
//! |------|----------|-----------|
//! | 0 | UV transform | `vec4<f32>`, bare or wrapped in a one-field struct |
//! | 1 | Icon atlas | `texture_2d<f32>` |
//! | 2 | Sampler | `sampler` |
//!
//! A one-field struct holding a `vec4<f32>` has the same 16-byte uniform
//! layout as the bare vector, so the host writes identical bytes for both
//! shapes; only the shader-side declaration differs.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::UvTransform;
use crate::error::{AtlasError, AtlasResult};

/// Binding index of the UV transform uniform.
pub const TRANSFORM_BINDING: u32 = 0;
/// Binding index of the atlas texture.
pub const TEXTURE_BINDING: u32 = 1;
/// Binding index of the atlas sampler.
pub const SAMPLER_BINDING: u32 = 2;

/// Host-side bytes of the transform uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub frame: Vec4,
}

const _: () = assert!(std::mem::size_of::<FrameUniform>() == 16);

/// Names used when the transform is wrapped in a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordNames {
    /// WGSL struct type name.
    pub type_name: String,
    /// Name of the single `vec4<f32>` field.
    pub field_name: String,
    /// Name of the `var<uniform>` instance.
    pub instance_name: String,
}

impl Default for RecordNames {
    fn default() -> Self {
        Self {
            type_name: "SkillMaterial".to_owned(),
            field_name: "frame".to_owned(),
            instance_name: "material".to_owned(),
        }
    }
}

/// How slot 0 is declared in the shader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingShape {
    /// `var<uniform> <name>: vec4<f32>;`
    Bare { name: String },
    /// `var<uniform> <instance>: <Type>;` with `struct <Type> { <field>: vec4<f32> }`.
    Wrapped(RecordNames),
}

impl Default for BindingShape {
    fn default() -> Self {
        Self::bare()
    }
}

impl BindingShape {
    /// Bare vector named `frame`.
    #[must_use]
    pub fn bare() -> Self {
        Self::Bare {
            name: "frame".to_owned(),
        }
    }

    /// Wrapped in `SkillMaterial { frame }`.
    #[must_use]
    pub fn wrapped() -> Self {
        Self::Wrapped(RecordNames::default())
    }

    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }

    /// WGSL expression that reads the transform vector.
    #[must_use]
    pub fn access_expr(&self) -> String {
        match self {
            Self::Bare { name } => name.clone(),
            Self::Wrapped(names) => format!("{}.{}", names.instance_name, names.field_name),
        }
    }

    /// Check every name is a usable WGSL identifier.
    pub fn validate(&self) -> AtlasResult<()> {
        match self {
            Self::Bare { name } => validate_identifier(name),
            Self::Wrapped(names) => {
                validate_identifier(&names.type_name)?;
                validate_identifier(&names.field_name)?;
                validate_identifier(&names.instance_name)?;
                // The instance would shadow its own type.
                if names.instance_name == names.type_name {
                    return Err(AtlasError::InvalidIdentifier(names.instance_name.clone()));
                }
                Ok(())
            }
        }
    }
}

/// Identifiers the generated shader already uses or WGSL reserves.
const RESERVED: &[&str] = &[
    "alias", "break", "case", "const", "continue", "default", "diagnostic", "discard", "else",
    "enable", "false", "fn", "for", "if", "let", "loop", "override", "return", "struct",
    "switch", "true", "var", "while", "f32", "vec2", "vec4", "sampler", "texture_2d",
    "uniform", "skill_texture", "skill_sampler", "uv", "fragment", "mesh", "in",
    "VertexOutput", "FragmentInput",
];

/// Validate a WGSL identifier as used by the shader generator.
pub fn validate_identifier(name: &str) -> AtlasResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid = valid_start
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name != "_"
        && !name.starts_with("__")
        && !RESERVED.contains(&name);

    if valid {
        Ok(())
    } else {
        Err(AtlasError::InvalidIdentifier(name.to_owned()))
    }
}

/// Pack a transform into its uniform bytes.
#[must_use]
pub fn encode_uniform(transform: UvTransform) -> FrameUniform {
    FrameUniform {
        frame: transform.to_vec4(),
    }
}

/// Read slot 0 back from raw uniform bytes.
///
/// Both binding shapes share this layout, so no shape is needed here.
pub fn decode_uniform(bytes: &[u8]) -> AtlasResult<UvTransform> {
    let expected = std::mem::size_of::<FrameUniform>();
    if bytes.len() != expected {
        return Err(AtlasError::UniformSize {
            expected,
            actual: bytes.len(),
        });
    }

    let uniform: FrameUniform = bytemuck::pod_read_unaligned(bytes);
    Ok(UvTransform::from_vec4(uniform.frame))
}
