//! Visible-tile queries on top of a [`TileIndex`].

use std::collections::BTreeSet;

use crate::geometry::{Rect, Size};

use super::index::{TileId, TileIndex};
use super::LodError;

/// Unordered collection of tile identifiers without duplicates.
///
/// Backed by a `BTreeSet` so that iteration (and therefore logging and
/// upload order) is deterministic.
pub type TileSet = BTreeSet<TileId>;

/// Answers "which tiles are visible" for a tile pyramid.
///
/// The identifier arithmetic lives in [`TileIndex`]; the `Tiler` only adds
/// the geometric policy, so data sources with a different visibility policy
/// can still share the identifier math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiler {
    index: TileIndex,
}

impl Tiler {
    /// Create a tiler for content of `content_size` cut into `tile_size` tiles.
    pub fn new(content_size: Size, tile_size: u32) -> Result<Self, LodError> {
        Ok(Self::from_index(TileIndex::new(content_size, tile_size)?))
    }

    pub fn from_index(index: TileIndex) -> Self {
        Self { index }
    }

    /// The underlying identifier arithmetic.
    pub fn index(&self) -> &TileIndex {
        &self.index
    }

    pub fn max_lod(&self) -> u32 {
        self.index.max_lod()
    }

    pub fn tile_rect(&self, id: TileId) -> Rect {
        self.index.tile_rect(id)
    }

    pub fn tiles_area(&self, lod: u32) -> Size {
        self.index.tiles_area(lod)
    }

    /// Tile rectangle divided by the extent of its level, in `[0, 1]`.
    pub fn normalized_tile_rect(&self, id: TileId) -> Rect {
        let lod = self.index.coordinate(id).lod;
        let area = self.index.tiles_area(lod);
        if area.is_empty() {
            return Rect::empty();
        }
        self.index
            .tile_rect(id)
            .scaled(1.0 / area.width as f64, 1.0 / area.height as f64)
    }

    /// All tiles at `lod` sharing a non-zero area with `area`.
    ///
    /// `area` is expressed in the pixel space of `lod` (see
    /// [`TileIndex::tiles_area`]). Returns an empty set for an empty area or
    /// a LOD beyond [`max_lod`](Self::max_lod).
    pub fn visible_tiles(&self, area: &Rect, lod: u32) -> TileSet {
        let mut visible = TileSet::new();
        if lod > self.max_lod() {
            return visible;
        }

        let bounds = Rect::from_size(self.index.tiles_area(lod));
        let area = area.intersection(&bounds);
        if area.is_empty() {
            return visible;
        }

        let tile_size = self.index.tile_size() as f64;
        let (cols, rows) = self.index.grid_size(lod);

        // Tiles that only touch the area along an edge are excluded.
        let first_col = ((area.left() / tile_size).floor() as u32).min(cols - 1);
        let last_col = ((area.right() / tile_size).ceil() as u32)
            .saturating_sub(1)
            .min(cols - 1);
        let first_row = ((area.top() / tile_size).floor() as u32).min(rows - 1);
        let last_row = ((area.bottom() / tile_size).ceil() as u32)
            .saturating_sub(1)
            .min(rows - 1);

        let first_id = self.index.tile_ids(lod).start;
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                visible.insert(first_id + row as u64 * cols as u64 + col as u64);
            }
        }
        visible
    }

    /// Visible tiles for a window-local area of a window displayed at `window_rect`.
    ///
    /// The area is rescaled from window coordinates into the pixel space of
    /// `lod` before querying.
    pub fn visible_tiles_in_window(&self, local_area: &Rect, window_rect: &Rect, lod: u32) -> TileSet {
        if lod > self.max_lod() {
            return TileSet::new();
        }
        let area = window_area_to_level(local_area, window_rect, self.index.tiles_area(lod));
        self.visible_tiles(&area, lod)
    }

    /// Coarsest LOD whose level is at least as large as `display` in both
    /// dimensions, clamped to [`max_lod`](Self::max_lod).
    pub fn lod_for_display_size(&self, display: Size) -> u32 {
        if display.is_empty() {
            return 0;
        }
        (0..=self.max_lod())
            .find(|&lod| {
                let level = self.index.tiles_area(lod);
                level.width >= display.width && level.height >= display.height
            })
            .unwrap_or_else(|| self.max_lod())
    }
}

/// Rescale a window-local area into the pixel space of a level of `level_size`.
///
/// The window's on-screen extent maps onto the whole level. Returns an empty
/// rectangle if the window itself is empty.
pub fn window_area_to_level(local_area: &Rect, window_rect: &Rect, level_size: Size) -> Rect {
    if window_rect.is_empty() {
        return Rect::empty();
    }
    local_area.scaled(
        level_size.width as f64 / window_rect.width,
        level_size.height as f64 / window_rect.height,
    )
}
