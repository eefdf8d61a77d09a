//! Read-only atlas texture used by the reference sampler.

use std::path::Path;

use glam::{UVec2, Vec4};
use image::RgbaImage;

use crate::error::{AtlasError, AtlasResult};

/// A 2D RGBA texture with linear texels in `[0, 1]`.
///
/// Filtering blends these values directly, as a GPU does after decoding an
/// sRGB texture. Texels are stored row-major with `(0, 0)` at the top-left, matching the
/// UV convention of the GPU texture the atlas is uploaded to.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTexture {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl AtlasTexture {
    /// Build a texture from a generator called once per texel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut texel: impl FnMut(u32, u32) -> Vec4,
    ) -> AtlasResult<Self> {
        if width == 0 || height == 0 {
            return Err(AtlasError::EmptyTexture { width, height });
        }

        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(texel(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Convert an 8-bit sRGB image. Color channels are decoded to linear,
    /// alpha is only normalized.
    pub fn from_image(image: &RgbaImage) -> AtlasResult<Self> {
        Self::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            Vec4::new(
                srgb_to_linear(f32::from(r) / 255.0),
                srgb_to_linear(f32::from(g) / 255.0),
                srgb_to_linear(f32::from(b) / 255.0),
                f32::from(a) / 255.0,
            )
        })
    }

    /// Decode an image file (PNG or JPEG) from disk.
    pub fn open(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.into_rgba8();
        tracing::debug!(
            "Loaded atlas {}: {}x{}",
            path.display(),
            image.width(),
            image.height()
        );
        Self::from_image(&image)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Fetch a texel by integer coordinate. Coordinates must be in bounds.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        debug_assert!(x < self.width && y < self.height);
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

/// sRGB transfer function, decoding direction.
#[must_use]
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB transfer function, encoding direction.
#[must_use]
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Encode a linear color as 8-bit sRGB, rounding to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_rgba8(color: Vec4) -> image::Rgba<u8> {
    let color = color.clamp(Vec4::ZERO, Vec4::ONE);
    let encoded = Vec4::new(
        linear_to_srgb(color.x),
        linear_to_srgb(color.y),
        linear_to_srgb(color.z),
        color.w,
    );
    let scaled = (encoded * 255.0).round();
    image::Rgba([
        scaled.x as u8,
        scaled.y as u8,
        scaled.z as u8,
        scaled.w as u8,
    ])
}
