//! In-memory cache of decoded tile images.
//!
//! Decoding vector or pyramid tiles is expensive and the output never
//! changes for a given tile, so each such data source keeps one of these
//! caches for its whole lifetime. There is no eviction.
//!
//! # Locking
//!
//! The map is guarded by a `parking_lot::RwLock` that is only held for the
//! lookup and for the insert. The decode closure always runs outside the
//! lock, so distinct tiles decode in parallel. Two callers asking for the
//! same missing tile may both decode it; the last insert wins and both
//! results are equivalent.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use parking_lot::RwLock;
use tracing::trace;

use crate::lod::TileId;

/// A decoded tile shared between the cache and its consumers.
pub type TileImage = Arc<RgbaImage>;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to decode.
    pub misses: u64,
    /// Decodes that produced nothing and were not stored.
    pub decode_failures: u64,
    /// Number of stored tiles.
    pub entry_count: usize,
}

impl TileCacheStats {
    /// Fraction of lookups served from the cache, `0.0` when unused.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for TileCacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles, {} hits, {} misses, {} failed decodes ({:.1}% hit rate)",
            self.entry_count,
            self.hits,
            self.misses,
            self.decode_failures,
            self.hit_rate() * 100.0
        )
    }
}

/// Thread-safe map from tile identifier to decoded image.
#[derive(Default)]
pub struct TileImageCache {
    tiles: RwLock<HashMap<TileId, TileImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
    decode_failures: AtomicU64,
}

impl TileImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached image for `tile_id`, decoding it with `compute` on a miss.
    ///
    /// Empty or missing decode results are returned as `None` and are not
    /// stored, so a later call retries the decode.
    pub fn get<F>(&self, tile_id: TileId, compute: F) -> Option<TileImage>
    where
        F: FnOnce(TileId) -> Option<RgbaImage>,
    {
        if let Some(image) = self.tiles.read().get(&tile_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(Arc::clone(image));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let image = match compute(tile_id) {
            Some(image) if image.width() > 0 && image.height() > 0 => Arc::new(image),
            _ => {
                self.decode_failures.fetch_add(1, Ordering::Relaxed);
                trace!(tile_id, "Tile decode produced no image, not caching");
                return None;
            }
        };

        self.tiles.write().insert(tile_id, Arc::clone(&image));
        Some(image)
    }

    /// Check whether a tile is cached without decoding it.
    pub fn contains(&self, tile_id: TileId) -> bool {
        self.tiles.read().contains_key(&tile_id)
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.read().is_empty()
    }

    /// Drop every cached tile. Counters are kept.
    pub fn clear(&self) {
        self.tiles.write().clear();
    }

    pub fn stats(&self) -> TileCacheStats {
        TileCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            entry_count: self.len(),
        }
    }
}

impl fmt::Debug for TileImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileImageCache")
            .field("stats", &self.stats())
            .finish()
    }
}
