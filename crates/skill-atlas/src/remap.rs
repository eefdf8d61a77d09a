//! The fragment stage: remap the interpolated UV, then sample the atlas.

use glam::{Vec2, Vec4};

use crate::UvTransform;
use crate::binding::{BindingShape, decode_uniform};
use crate::error::AtlasResult;
use crate::sampler::Sampler;
use crate::texture::AtlasTexture;
use crate::wgsl::{self, ShaderOptions, ShaderTarget};

/// `uv * scale + offset`, written exactly as the shader evaluates it.
#[must_use]
pub fn remap_uv(uv: Vec2, transform: &UvTransform) -> Vec2 {
    uv * transform.scale + transform.offset
}

/// Shade one pixel: remap `uv` and sample the atlas there.
#[must_use]
pub fn shade(
    uv: Vec2,
    transform: &UvTransform,
    texture: &AtlasTexture,
    sampler: &Sampler,
) -> Vec4 {
    sampler.sample(texture, remap_uv(uv, transform))
}

/// A configured fragment stage: the binding shape the shader declares and the
/// sampler bound next to the atlas.
///
/// [`FragmentShader::run`] is the software twin of [`FragmentShader::source`]:
/// it consumes slot 0 as raw uniform bytes, the way the GPU does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentShader {
    pub shape: BindingShape,
    pub sampler: Sampler,
}

impl FragmentShader {
    #[must_use]
    pub fn new(shape: BindingShape, sampler: Sampler) -> Self {
        Self { shape, sampler }
    }

    /// Shade one pixel from the uniform bytes of slot 0.
    pub fn run(&self, uv: Vec2, uniform: &[u8], texture: &AtlasTexture) -> AtlasResult<Vec4> {
        let transform = decode_uniform(uniform)?;
        Ok(shade(uv, &transform, texture, &self.sampler))
    }

    /// Shade a whole `width`x`height` target, sampling at pixel centers.
    ///
    /// Pixels are independent; the result is row-major.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(
        &self,
        width: u32,
        height: u32,
        uniform: &[u8],
        texture: &AtlasTexture,
    ) -> AtlasResult<Vec<Vec4>> {
        let transform = decode_uniform(uniform)?;
        let size = Vec2::new(width as f32, height as f32);

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let uv = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / size;
                pixels.push(shade(uv, &transform, texture, &self.sampler));
            }
        }
        Ok(pixels)
    }

    /// WGSL source declaring this stage's bindings for `target`.
    pub fn source(&self, target: ShaderTarget) -> AtlasResult<String> {
        wgsl::generate(&ShaderOptions {
            shape: self.shape.clone(),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::encode_uniform;
    use crate::sampler::{AddressMode, FilterMode};

    fn checker() -> AtlasTexture {
        AtlasTexture::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Vec4::ONE
            } else {
                Vec4::new(0.0, 0.0, 0.0, 1.0)
            }
        })
        .unwrap()
    }

    #[test]
    fn remap_applies_scale_before_offset() {
        let transform = UvTransform::new(Vec2::new(0.5, 0.25), Vec2::new(0.5, 0.5));
        assert_eq!(remap_uv(Vec2::ONE, &transform), Vec2::new(1.0, 0.75));
        assert_eq!(remap_uv(Vec2::ZERO, &transform), Vec2::new(0.5, 0.25));
    }

    #[test]
    fn run_rejects_short_uniforms() {
        let shader = FragmentShader::new(
            BindingShape::bare(),
            Sampler::new(AddressMode::ClampToEdge, FilterMode::Nearest),
        );
        assert!(shader.run(Vec2::ZERO, &[0; 8], &checker()).is_err());
    }

    #[test]
    fn render_samples_pixel_centers() {
        let shader = FragmentShader::new(
            BindingShape::bare(),
            Sampler::new(AddressMode::ClampToEdge, FilterMode::Nearest),
        );
        let texture = checker();
        let uniform = encode_uniform(UvTransform::IDENTITY);

        let pixels = shader
            .render(4, 4, bytemuck::bytes_of(&uniform), &texture)
            .unwrap();
        assert_eq!(pixels.len(), 16);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(pixels[(y * 4 + x) as usize], texture.texel(x, y));
            }
        }
    }

    #[test]
    fn render_of_one_frame_only_reads_that_frame() {
        let shader = FragmentShader::new(
            BindingShape::wrapped(),
            Sampler::new(AddressMode::ClampToEdge, FilterMode::Nearest),
        );
        // Top-right quarter is red, everything else blue.
        let texture = AtlasTexture::from_fn(8, 8, |x, y| {
            if x >= 4 && y < 4 {
                Vec4::new(1.0, 0.0, 0.0, 1.0)
            } else {
                Vec4::new(0.0, 0.0, 1.0, 1.0)
            }
        })
        .unwrap();
        let uniform = encode_uniform(UvTransform::new(Vec2::new(0.5, 0.0), Vec2::splat(0.5)));

        let pixels = shader
            .render(16, 16, bytemuck::bytes_of(&uniform), &texture)
            .unwrap();
        assert!(pixels.iter().all(|p| *p == Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }
}
