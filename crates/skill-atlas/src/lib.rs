//! Sprite-sheet skill materials: UV remapping, reference sampling and shader
//! generation.
//!
//! A skill effect is drawn by a single fragment stage that remaps the
//! interpolated mesh UV through an offset/scale vector and samples one frame
//! out of an icon atlas. This crate holds everything about that stage that
//! does not need a GPU: the remap itself, a software sampler that follows
//! GPU addressing and filtering rules, the binding layout shared with the
//! host engine, the WGSL source, and the grid/animation bookkeeping that
//! decides which frame is shown.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Pure shading path**: [`remap::shade`] cannot fail and has no side effects
//! - **One binding option**: bare and wrapped uniforms are a [`BindingShape`], not two code paths
//!
//! # Key functions
//!
//! - [`remap_uv`]: Apply a [`UvTransform`] to a UV coordinate
//! - [`shade`]: Remap and sample, the whole fragment stage
//! - [`FragmentShader::run`]: Shade from raw uniform bytes, as the GPU sees them
//! - [`wgsl::generate`]: Emit the WGSL fragment shader for a binding shape
//! - [`AtlasGrid::frame_transform`]: Offset/scale of one grid frame

mod error;

pub mod animation;
pub mod binding;
pub mod grid;
pub mod remap;
pub mod sampler;
pub mod texture;
pub mod wgsl;

pub use animation::{FrameAnimation, Lifetime};
pub use binding::{BindingShape, FrameUniform, RecordNames, decode_uniform, encode_uniform};
pub use error::{AtlasError, AtlasResult};
pub use grid::AtlasGrid;
pub use remap::{FragmentShader, remap_uv, shade};
pub use sampler::{AddressMode, FilterMode, Sampler};
pub use texture::AtlasTexture;
pub use wgsl::{ShaderOptions, ShaderTarget};

/// UV offset and scale for texture coordinate mapping.
///
/// Packed for the GPU as `vec4(offset.x, offset.y, scale.x, scale.y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub offset: glam::Vec2,
    pub scale: glam::Vec2,
}

impl UvTransform {
    /// Samples the whole texture unchanged.
    pub const IDENTITY: Self = Self {
        offset: glam::Vec2::ZERO,
        scale: glam::Vec2::ONE,
    };

    #[must_use]
    pub const fn new(offset: glam::Vec2, scale: glam::Vec2) -> Self {
        Self { offset, scale }
    }

    /// Unpack from the `(ox, oy, sx, sy)` uniform layout.
    #[must_use]
    pub fn from_vec4(packed: glam::Vec4) -> Self {
        Self {
            offset: glam::Vec2::new(packed.x, packed.y),
            scale: glam::Vec2::new(packed.z, packed.w),
        }
    }

    /// Pack into the `(ox, oy, sx, sy)` uniform layout.
    #[must_use]
    pub fn to_vec4(self) -> glam::Vec4 {
        glam::Vec4::new(self.offset.x, self.offset.y, self.scale.x, self.scale.y)
    }
}

impl Default for UvTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<glam::Vec4> for UvTransform {
    fn from(packed: glam::Vec4) -> Self {
        Self::from_vec4(packed)
    }
}

impl From<UvTransform> for glam::Vec4 {
    fn from(transform: UvTransform) -> Self {
        transform.to_vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};

    #[test]
    fn vec4_packing_order_is_offset_then_scale() {
        let transform = UvTransform::new(Vec2::new(0.2, 0.4), Vec2::new(0.5, 0.25));
        assert_eq!(transform.to_vec4(), Vec4::new(0.2, 0.4, 0.5, 0.25));
        assert_eq!(UvTransform::from(transform.to_vec4()), transform);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(UvTransform::default(), UvTransform::IDENTITY);
        assert_eq!(Vec4::from(UvTransform::IDENTITY), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }
}
