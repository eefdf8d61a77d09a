//! Uniform grid layout of a sprite-sheet atlas.

use glam::{UVec2, Vec2};

use crate::UvTransform;
use crate::error::{AtlasError, AtlasResult};

/// Pixel size of one frame in the default water skill sheet.
pub const DEFAULT_TILE_SIZE: u32 = 192;
/// Columns in the default sheet.
pub const DEFAULT_COLUMNS: u32 = 5;
/// Rows in the default sheet.
pub const DEFAULT_ROWS: u32 = 5;

/// Pixel rectangle of one frame, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub min: UVec2,
    pub max: UVec2,
}

impl FrameRect {
    #[must_use]
    pub fn size(&self) -> UVec2 {
        self.max - self.min
    }
}

/// An atlas cut into `columns` x `rows` equally sized tiles, numbered
/// row-major from the top-left.
///
/// `padding` is the gap between neighbouring tiles and `offset` the margin
/// before the first tile, both in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGrid {
    tile_size: UVec2,
    columns: u32,
    rows: u32,
    padding: UVec2,
    offset: UVec2,
}

impl Default for AtlasGrid {
    fn default() -> Self {
        Self {
            tile_size: UVec2::splat(DEFAULT_TILE_SIZE),
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            padding: UVec2::ZERO,
            offset: UVec2::ZERO,
        }
    }
}

impl AtlasGrid {
    pub fn from_grid(
        tile_size: UVec2,
        columns: u32,
        rows: u32,
        padding: Option<UVec2>,
        offset: Option<UVec2>,
    ) -> AtlasResult<Self> {
        if columns == 0 || rows == 0 || tile_size.x == 0 || tile_size.y == 0 {
            return Err(AtlasError::EmptyGrid {
                columns,
                rows,
                tile_width: tile_size.x,
                tile_height: tile_size.y,
            });
        }

        Ok(Self {
            tile_size,
            columns,
            rows,
            padding: padding.unwrap_or(UVec2::ZERO),
            offset: offset.unwrap_or(UVec2::ZERO),
        })
    }

    #[must_use]
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Size in pixels of an atlas texture that holds exactly this grid.
    #[must_use]
    pub fn atlas_size(&self) -> UVec2 {
        let cells = UVec2::new(self.columns, self.rows);
        self.offset + cells * self.tile_size + (cells - UVec2::ONE) * self.padding
    }

    fn cell(&self, index: usize) -> AtlasResult<UVec2> {
        let count = self.frame_count();
        if index >= count {
            return Err(AtlasError::FrameOutOfRange { index, count });
        }
        let columns = self.columns as usize;
        // Both fit in u32 since index < columns * rows.
        let column = u32::try_from(index % columns).unwrap_or_default();
        let row = u32::try_from(index / columns).unwrap_or_default();
        Ok(UVec2::new(column, row))
    }

    /// Pixel rectangle of frame `index`.
    pub fn frame_rect(&self, index: usize) -> AtlasResult<FrameRect> {
        let cell = self.cell(index)?;
        let min = self.offset + cell * (self.tile_size + self.padding);
        Ok(FrameRect {
            min,
            max: min + self.tile_size,
        })
    }

    /// Offset/scale that maps a `[0, 1]` quad UV onto frame `index`.
    pub fn frame_transform(&self, index: usize) -> AtlasResult<UvTransform> {
        let rect = self.frame_rect(index)?;
        let atlas = self.atlas_size().as_vec2();
        Ok(UvTransform::new(
            rect.min.as_vec2() / atlas,
            rect.size().as_vec2() / atlas,
        ))
    }

    /// Frame whose transform has this offset, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_at(&self, transform: &UvTransform) -> Option<usize> {
        let pixels = transform.offset * self.atlas_size().as_vec2() - self.offset.as_vec2();
        let cell = (pixels / (self.tile_size + self.padding).as_vec2()).round();
        if !cell.is_finite() || cell.cmplt(Vec2::ZERO).any() {
            return None;
        }

        let (column, row) = (cell.x as u32, cell.y as u32);
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_matches_water_sheet() {
        let grid = AtlasGrid::default();
        assert_eq!(grid.frame_count(), 25);
        assert_eq!(grid.atlas_size(), UVec2::splat(960));
    }

    #[test]
    fn unpadded_transforms_are_fractions_of_the_grid() {
        let grid = AtlasGrid::default();
        for index in 0..grid.frame_count() {
            let column = (index % 5) as f32;
            let row = (index / 5) as f32;
            let transform = grid.frame_transform(index).unwrap();
            assert_eq!(transform.offset, Vec2::new(column / 5.0, row / 5.0));
            assert_eq!(transform.scale, Vec2::splat(1.0 / 5.0));
        }
    }

    #[test]
    fn frame_at_inverts_frame_transform() {
        let grid = AtlasGrid::from_grid(
            UVec2::new(32, 16),
            4,
            3,
            Some(UVec2::new(2, 1)),
            Some(UVec2::new(5, 7)),
        )
        .unwrap();

        for index in 0..grid.frame_count() {
            let transform = grid.frame_transform(index).unwrap();
            assert_eq!(grid.frame_at(&transform), Some(index));
        }
    }

    #[test]
    fn frame_at_uses_both_axes() {
        let grid = AtlasGrid::default();
        let transform = UvTransform::new(Vec2::new(0.2, 0.6), Vec2::splat(0.2));
        assert_eq!(grid.frame_at(&transform), Some(16));

        let outside = UvTransform::new(Vec2::new(1.2, 0.0), Vec2::splat(0.2));
        assert_eq!(grid.frame_at(&outside), None);
        let negative = UvTransform::new(Vec2::new(-0.4, 0.0), Vec2::splat(0.2));
        assert_eq!(grid.frame_at(&negative), None);
    }

    #[test]
    fn frame_at_rejects_non_finite_offsets() {
        let grid = AtlasGrid::default();
        for offset in [
            Vec2::new(f32::NAN, 0.0),
            Vec2::new(0.0, f32::NAN),
            Vec2::splat(f32::INFINITY),
            Vec2::new(0.0, f32::NEG_INFINITY),
        ] {
            let transform = UvTransform::new(offset, Vec2::splat(0.2));
            assert_eq!(grid.frame_at(&transform), None, "offset {offset}");
        }
    }

    #[test]
    fn padded_rects() {
        let grid = AtlasGrid::from_grid(
            UVec2::splat(10),
            2,
            2,
            Some(UVec2::splat(2)),
            Some(UVec2::new(1, 3)),
        )
        .unwrap();

        assert_eq!(grid.atlas_size(), UVec2::new(23, 25));
        assert_eq!(
            grid.frame_rect(3).unwrap(),
            FrameRect {
                min: UVec2::new(13, 15),
                max: UVec2::new(23, 25),
            }
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(
            AtlasGrid::default().frame_rect(25),
            Err(AtlasError::FrameOutOfRange {
                index: 25,
                count: 25
            })
        ));
        assert!(matches!(
            AtlasGrid::from_grid(UVec2::splat(8), 0, 3, None, None),
            Err(AtlasError::EmptyGrid { .. })
        ));
        assert!(AtlasGrid::from_grid(UVec2::new(8, 0), 1, 1, None, None).is_err());
    }
}
