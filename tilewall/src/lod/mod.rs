//! Level-of-detail tiling.
//!
//! Maps a content's pixel dimensions and a fixed tile size into a pyramid of
//! tile grids ([`TileIndex`]) and answers visibility queries against it
//! ([`Tiler`]).
//!
//! # Example
//!
//! ```
//! use tilewall::geometry::{Rect, Size};
//! use tilewall::lod::Tiler;
//!
//! let tiler = Tiler::new(Size::new(4096, 4096), 512).unwrap();
//! let lod = tiler.lod_for_display_size(Size::new(1920, 1080));
//! assert_eq!(lod, 2);
//!
//! let visible = tiler.visible_tiles(&Rect::new(0.0, 0.0, 600.0, 300.0), lod);
//! assert_eq!(visible.len(), 2);
//! ```

mod index;
mod tiler;

pub use index::{TileCoord, TileId, TileIndex};
pub use tiler::{window_area_to_level, TileSet, Tiler};

use thiserror::Error;

/// Errors raised while building a tile pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LodError {
    /// Tiles must be at least one pixel wide.
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),
}
