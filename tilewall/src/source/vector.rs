//! Vector document data source (SVG, PDF).
//!
//! Vector content has no intrinsic pixel grid: each tile is rasterized on
//! demand by a [`Rasterizer`] backend for the region of the document it
//! covers, at the tile's pixel size. The output for a tile never changes, so
//! rasterized tiles are cached for the lifetime of the source.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::cache::{TileImage, TileImageCache};
use crate::geometry::{Rect, Size};
use crate::lod::{TileId, TileSet, Tiler};

use super::{ContentInfo, ContentType, DataSource, SourceError, StereoView};

/// Backend turning a document region into pixels.
///
/// Implementations wrap an actual SVG or PDF renderer. They must be
/// thread-safe since tiles are rasterized from worker threads.
pub trait Rasterizer: Send + Sync {
    /// Name of the backend for logging.
    fn name(&self) -> &str;

    /// Whether the document at `uri` can be opened by this backend.
    fn can_render(&self, _uri: &str) -> bool {
        true
    }

    /// Render `region` of the document into an image of `size` pixels.
    ///
    /// `region` is in normalized document coordinates (`[0, 1]` on both
    /// axes). Returns `None` if rendering fails.
    fn rasterize(&self, uri: &str, region: &Rect, size: Size) -> Option<RgbaImage>;
}

/// Data source rasterizing vector content tile by tile.
pub struct VectorSource {
    uri: String,
    content_type: ContentType,
    tiler: Tiler,
    rasterizer: Arc<dyn Rasterizer>,
    cache: TileImageCache,
    valid: bool,
}

impl VectorSource {
    /// Create a source for the document described by `info`.
    ///
    /// # Errors
    ///
    /// Fails if the tile pyramid cannot be built (zero tile size). An
    /// unreadable document produces an invalid source instead.
    pub fn open(
        info: &ContentInfo,
        content_type: ContentType,
        tile_size: u32,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Result<Self, SourceError> {
        let tiler = Tiler::new(info.size(), tile_size)?;
        let valid = !info.size().is_empty() && rasterizer.can_render(&info.uri);
        if !valid {
            warn!(
                uri = %info.uri,
                backend = rasterizer.name(),
                "Vector source is invalid"
            );
        }

        debug!(
            uri = %info.uri,
            content_type = %content_type,
            backend = rasterizer.name(),
            max_lod = tiler.max_lod(),
            "Opened vector source"
        );

        Ok(Self {
            uri: info.uri.clone(),
            content_type,
            tiler,
            rasterizer,
            cache: TileImageCache::new(),
            valid,
        })
    }

    pub fn cache(&self) -> &TileImageCache {
        &self.cache
    }
}

impl fmt::Debug for VectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorSource")
            .field("uri", &self.uri)
            .field("content_type", &self.content_type)
            .field("backend", &self.rasterizer.name())
            .field("valid", &self.valid)
            .finish()
    }
}

impl DataSource for VectorSource {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn tile_rect(&self, tile_id: TileId) -> Rect {
        self.tiler.tile_rect(tile_id)
    }

    fn normalized_tile_rect(&self, tile_id: TileId, _channel: u8) -> Rect {
        self.tiler.normalized_tile_rect(tile_id)
    }

    fn tiles_area(&self, lod: u32, _channel: u8) -> Size {
        self.tiler.tiles_area(lod)
    }

    fn max_lod(&self) -> u32 {
        self.tiler.max_lod()
    }

    fn lod_for_display_size(&self, display: Size) -> u32 {
        self.tiler.lod_for_display_size(display)
    }

    fn compute_visible_set(&self, area: &Rect, lod: u32, channel: u8) -> TileSet {
        if !self.valid || channel > 0 {
            return TileSet::new();
        }
        self.tiler.visible_tiles(area, lod)
    }

    fn cachable_tile_image(&self, tile_id: TileId, _view: StereoView) -> Option<RgbaImage> {
        self.tiler.index().try_coordinate(tile_id)?;
        let rect = self.tiler.tile_rect(tile_id);
        let size = Size::new(rect.width as u32, rect.height as u32);
        if size.is_empty() {
            return None;
        }

        let region = self.tiler.normalized_tile_rect(tile_id);
        let image = self.rasterizer.rasterize(&self.uri, &region, size);
        if image.is_none() {
            warn!(
                uri = %self.uri,
                tile_id,
                backend = self.rasterizer.name(),
                "Failed to rasterize vector tile"
            );
        }
        image
    }

    fn tile_image(&self, tile_id: TileId, view: StereoView) -> Option<TileImage> {
        if !self.valid {
            return None;
        }
        self.cache
            .get(tile_id, |id| self.cachable_tile_image(id, view))
    }
}
