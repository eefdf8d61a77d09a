//! Error types for the fallible, non-shading surfaces of the crate.

use thiserror::Error;

/// Errors from texture loading, uniform decoding, grid lookups and shader
/// generation. Shading itself never fails.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("texture has zero size ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("uniform buffer is {actual} bytes, expected {expected}")]
    UniformSize { expected: usize, actual: usize },

    #[error("frame {index} is out of range for a grid of {count} frames")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("atlas grid has no frames ({columns}x{rows} tiles of {tile_width}x{tile_height})")]
    EmptyGrid {
        columns: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
    },

    #[error("invalid WGSL identifier {0:?}")]
    InvalidIdentifier(String),
}

pub type AtlasResult<T> = Result<T, AtlasError>;
