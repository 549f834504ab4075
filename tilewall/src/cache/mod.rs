//! Caching of decoded tiles.
//!
//! [`TileImageCache`] stores decoded tiles for data sources whose decode is
//! expensive and deterministic (pre-tiled pyramids and rasterized vector
//! documents). Live streams and whole-image sources do not use it.

mod tile_image;

pub use tile_image::{TileCacheStats, TileImage, TileImageCache};
