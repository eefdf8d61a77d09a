//! Software texture sampling following GPU addressing and filtering rules.
//!
//! This is the reference the fragment stage is checked against: it resolves
//! normalized coordinates to texels the way a `texture_2d` + `sampler` pair
//! does (texel centers at half-integers, addressing applied per texel index).

use glam::{Vec2, Vec4};

use crate::texture::AtlasTexture;

/// How coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Clamp to the outermost texel row/column.
    ClampToEdge,
    /// Tile the texture.
    Repeat,
    /// Tile the texture, flipping every other tile.
    MirrorRepeat,
}

impl AddressMode {
    /// Resolve a possibly out-of-range texel index into `[0, size)`.
    #[must_use]
    pub fn resolve(self, index: i64, size: u32) -> u32 {
        let size = i64::from(size);
        let resolved = match self {
            Self::ClampToEdge => index.clamp(0, size - 1),
            Self::Repeat => index.rem_euclid(size),
            Self::MirrorRepeat => {
                let period = index.rem_euclid(2 * size);
                if period < size {
                    period
                } else {
                    2 * size - 1 - period
                }
            }
        };
        // In range by construction.
        u32::try_from(resolved).unwrap_or_default()
    }

    /// Parse the short names used on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clamp" | "clamp-to-edge" => Some(Self::ClampToEdge),
            "repeat" | "wrap" => Some(Self::Repeat),
            "mirror" | "mirror-repeat" => Some(Self::MirrorRepeat),
            _ => None,
        }
    }
}

/// Texel filtering for magnification and minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

impl FilterMode {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nearest" => Some(Self::Nearest),
            "linear" => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Filtering and addressing policy bound next to the atlas.
///
/// There is deliberately no `Default`: whether out-of-range coordinates
/// clamp or wrap changes what bleeds in from neighbouring atlas frames, so
/// callers pick it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sampler {
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub filter: FilterMode,
}

impl Sampler {
    /// Same addressing on both axes.
    #[must_use]
    pub const fn new(address_mode: AddressMode, filter: FilterMode) -> Self {
        Self {
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            filter,
        }
    }

    /// Sample `texture` at normalized coordinate `uv`.
    #[must_use]
    pub fn sample(&self, texture: &AtlasTexture, uv: Vec2) -> Vec4 {
        match self.filter {
            FilterMode::Nearest => self.sample_nearest(texture, uv),
            FilterMode::Linear => self.sample_linear(texture, uv),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn sample_nearest(&self, texture: &AtlasTexture, uv: Vec2) -> Vec4 {
        let texel = (uv * texture.size().as_vec2()).floor();
        self.fetch(texture, texel.x as i64, texel.y as i64)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn sample_linear(&self, texture: &AtlasTexture, uv: Vec2) -> Vec4 {
        // Shift so integer positions land on texel centers.
        let position = uv * texture.size().as_vec2() - Vec2::splat(0.5);
        let base = position.floor();
        let weight = position - base;
        // The casts saturate for huge coordinates, so the neighbours must too.
        let (x0, y0) = (base.x as i64, base.y as i64);
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let top = self
            .fetch(texture, x0, y0)
            .lerp(self.fetch(texture, x1, y0), weight.x);
        let bottom = self
            .fetch(texture, x0, y1)
            .lerp(self.fetch(texture, x1, y1), weight.x);
        top.lerp(bottom, weight.y)
    }

    fn fetch(&self, texture: &AtlasTexture, x: i64, y: i64) -> Vec4 {
        let x = self.address_mode_u.resolve(x, texture.width());
        let y = self.address_mode_v.resolve(y, texture.height());
        texture.texel(x, y)
    }
}
