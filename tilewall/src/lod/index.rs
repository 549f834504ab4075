//! Tile identifier arithmetic for multi-resolution tile pyramids.

use std::ops::Range;

use crate::geometry::{Rect, Size};

use super::LodError;

/// Linear identifier of a tile across all levels of a pyramid.
///
/// Identifiers are process-local and only meaningful for the [`TileIndex`]
/// that produced them.
pub type TileId = u64;

/// Position of a tile inside the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Level of detail, 0 being the coarsest.
    pub lod: u32,
    /// Tile row within the level grid.
    pub row: u32,
    /// Tile column within the level grid.
    pub col: u32,
}

impl TileCoord {
    pub fn new(lod: u32, row: u32, col: u32) -> Self {
        Self { lod, row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Level {
    cols: u32,
    rows: u32,
    /// Identifier of the tile at row 0, col 0 of this level.
    first_id: TileId,
    /// Pixel size of the whole level (content downscaled to this LOD).
    size: Size,
}

impl Level {
    fn tile_count(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }
}

/// Multi-resolution tile pyramid for a piece of content.
///
/// LOD 0 is the coarsest level and fits within a single tile; `max_lod()` is
/// full resolution. At LOD `L` the content is downscaled by `2^(max_lod - L)`
/// and cut into a grid of `tile_size` squares, edge tiles being clipped to
/// the level boundary.
///
/// Tile identifiers enumerate levels from coarsest to finest and tiles
/// row-major within a level, so identifier 0 is always the LOD 0 tile.
///
/// # Example
///
/// ```
/// use tilewall::geometry::Size;
/// use tilewall::lod::{TileCoord, TileIndex};
///
/// let index = TileIndex::new(Size::new(4096, 4096), 512).unwrap();
/// assert_eq!(index.max_lod(), 3);
/// assert_eq!(index.grid_size(3), (8, 8));
///
/// let id = index.tile_id(TileCoord::new(3, 2, 5));
/// assert_eq!(index.coordinate(id), TileCoord::new(3, 2, 5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileIndex {
    content_size: Size,
    tile_size: u32,
    levels: Vec<Level>,
}

impl TileIndex {
    /// Build the pyramid for content of the given pixel size.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::InvalidTileSize`] if `tile_size` is zero.
    pub fn new(content_size: Size, tile_size: u32) -> Result<Self, LodError> {
        if tile_size == 0 {
            return Err(LodError::InvalidTileSize(tile_size));
        }

        let max_lod = compute_max_lod(content_size, tile_size);
        let mut levels = Vec::with_capacity(max_lod as usize + 1);
        let mut first_id: TileId = 0;

        for lod in 0..=max_lod {
            let factor = 1u64 << (max_lod - lod);
            let size = Size::new(
                (content_size.width as u64).div_ceil(factor) as u32,
                (content_size.height as u64).div_ceil(factor) as u32,
            );
            let level = Level {
                cols: (size.width as u64).div_ceil(tile_size as u64).max(1) as u32,
                rows: (size.height as u64).div_ceil(tile_size as u64).max(1) as u32,
                first_id,
                size,
            };
            first_id += level.tile_count();
            levels.push(level);
        }

        Ok(Self {
            content_size,
            tile_size,
            levels,
        })
    }

    /// Full-resolution pixel size of the content.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Edge length of a (non-clipped) tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Finest level of detail.
    pub fn max_lod(&self) -> u32 {
        (self.levels.len() - 1) as u32
    }

    /// Total number of tiles over all levels.
    pub fn tile_count(&self) -> u64 {
        self.levels.iter().map(Level::tile_count).sum()
    }

    /// Number of `(columns, rows)` in the grid at `lod`.
    ///
    /// # Panics
    ///
    /// Panics if `lod > max_lod()`.
    pub fn grid_size(&self, lod: u32) -> (u32, u32) {
        let level = self.level(lod);
        (level.cols, level.rows)
    }

    /// Pixel extent spanned by all tiles at `lod`.
    ///
    /// This is the content size downscaled to `lod` and rounded up, which is
    /// the denominator used to normalize tile rectangles.
    ///
    /// # Panics
    ///
    /// Panics if `lod > max_lod()`.
    pub fn tiles_area(&self, lod: u32) -> Size {
        self.level(lod).size
    }

    /// Identifiers of every tile at `lod`.
    ///
    /// # Panics
    ///
    /// Panics if `lod > max_lod()`.
    pub fn tile_ids(&self, lod: u32) -> Range<TileId> {
        let level = self.level(lod);
        level.first_id..level.first_id + level.tile_count()
    }

    /// Encode a tile position into its identifier.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the pyramid.
    pub fn tile_id(&self, coord: TileCoord) -> TileId {
        match self.try_tile_id(coord) {
            Some(id) => id,
            None => panic!("tile coordinate {:?} is outside the pyramid", coord),
        }
    }

    /// Encode a tile position, returning `None` if it is outside the pyramid.
    pub fn try_tile_id(&self, coord: TileCoord) -> Option<TileId> {
        let level = self.levels.get(coord.lod as usize)?;
        if coord.row >= level.rows || coord.col >= level.cols {
            return None;
        }
        Some(level.first_id + coord.row as u64 * level.cols as u64 + coord.col as u64)
    }

    /// Decode an identifier into its tile position.
    ///
    /// # Panics
    ///
    /// Panics if `id >= tile_count()`.
    pub fn coordinate(&self, id: TileId) -> TileCoord {
        match self.try_coordinate(id) {
            Some(coord) => coord,
            None => panic!(
                "tile id {} is out of range (pyramid has {} tiles)",
                id,
                self.tile_count()
            ),
        }
    }

    /// Decode an identifier, returning `None` if it is out of range.
    pub fn try_coordinate(&self, id: TileId) -> Option<TileCoord> {
        let lod = self
            .levels
            .iter()
            .position(|level| id >= level.first_id && id - level.first_id < level.tile_count())?;
        let level = &self.levels[lod];
        let offset = id - level.first_id;
        Some(TileCoord {
            lod: lod as u32,
            row: (offset / level.cols as u64) as u32,
            col: (offset % level.cols as u64) as u32,
        })
    }

    /// Rectangle covered by a tile, in the pixel space of its level.
    ///
    /// Edge tiles are clipped to the level boundary and may be smaller than
    /// `tile_size()`.
    ///
    /// # Panics
    ///
    /// Panics if `id >= tile_count()`.
    pub fn tile_rect(&self, id: TileId) -> Rect {
        let coord = self.coordinate(id);
        let level = &self.levels[coord.lod as usize];

        let x = coord.col as u64 * self.tile_size as u64;
        let y = coord.row as u64 * self.tile_size as u64;
        let width = (self.tile_size as u64).min((level.size.width as u64).saturating_sub(x));
        let height = (self.tile_size as u64).min((level.size.height as u64).saturating_sub(y));

        Rect::new(x as f64, y as f64, width as f64, height as f64)
    }

    fn level(&self, lod: u32) -> &Level {
        match self.levels.get(lod as usize) {
            Some(level) => level,
            None => panic!("lod {} exceeds max lod {}", lod, self.max_lod()),
        }
    }
}

/// Smallest `n` such that the content downscaled by `2^n` fits in one tile.
fn compute_max_lod(content_size: Size, tile_size: u32) -> u32 {
    let largest = content_size.width.max(content_size.height) as u64;
    let mut max_lod = 0;
    while largest > (tile_size as u64) << max_lod {
        max_lod += 1;
    }
    max_lod
}
