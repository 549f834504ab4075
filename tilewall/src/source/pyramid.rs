//! Pre-tiled image pyramid data source.
//!
//! Large images are stored as one file per tile under the content's root
//! directory:
//!
//! ```text
//! <root>/<lod>/<row>_<col>.<ext>
//! ```
//!
//! with LOD 0 being the single coarsest tile. Decoded tiles are kept in a
//! [`TileImageCache`] for the lifetime of the source.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, warn};

use crate::cache::{TileImage, TileImageCache};
use crate::geometry::{Rect, Size};
use crate::lod::{TileCoord, TileId, TileSet, Tiler};

use super::{ContentInfo, ContentType, DataSource, SourceError, StereoView};

/// Default file extension of pyramid tiles.
pub const DEFAULT_PYRAMID_EXTENSION: &str = "png";

/// Data source reading tiles from a pre-tiled pyramid on disk.
#[derive(Debug)]
pub struct PyramidSource {
    uri: String,
    root: PathBuf,
    extension: String,
    tiler: Tiler,
    cache: TileImageCache,
    valid: bool,
}

impl PyramidSource {
    /// Open the pyramid described by `info`.
    ///
    /// A missing root directory or empty content size produces an invalid
    /// source rather than an error.
    ///
    /// # Errors
    ///
    /// Fails only if the tile pyramid cannot be built (zero tile size).
    pub fn open(
        info: &ContentInfo,
        tile_size: u32,
        extension: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let tiler = Tiler::new(info.size(), tile_size)?;
        let root = PathBuf::from(&info.uri);

        let valid = match check_root(&root, info) {
            Ok(()) => true,
            Err(e) => {
                warn!(uri = %info.uri, error = %e, "Pyramid source is invalid");
                false
            }
        };

        debug!(
            uri = %info.uri,
            width = info.width,
            height = info.height,
            tile_size,
            max_lod = tiler.max_lod(),
            "Opened pyramid source"
        );

        Ok(Self {
            uri: info.uri.clone(),
            root,
            extension: extension.into(),
            tiler,
            cache: TileImageCache::new(),
            valid,
        })
    }

    /// Path of the file holding `coord`.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.root
            .join(coord.lod.to_string())
            .join(format!("{}_{}.{}", coord.row, coord.col, self.extension))
    }

    pub fn tiler(&self) -> &Tiler {
        &self.tiler
    }

    pub fn cache(&self) -> &TileImageCache {
        &self.cache
    }
}

fn check_root(root: &Path, info: &ContentInfo) -> Result<(), SourceError> {
    if info.size().is_empty() {
        return Err(SourceError::invalid(&info.uri, "content size is empty"));
    }
    if !root.is_dir() {
        return Err(SourceError::invalid(
            &info.uri,
            "pyramid root is not a directory",
        ));
    }
    Ok(())
}

impl DataSource for PyramidSource {
    fn content_type(&self) -> ContentType {
        ContentType::Pyramid
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
        let coord = self.tiler.index().try_coordinate(tile_id)?;
        let path = self.tile_path(coord);
        match image::open(&path) {
            Ok(image) => Some(image.to_rgba8()),
            Err(e) => {
                warn!(
                    uri = %self.uri,
                    tile_id,
                    path = %path.display(),
                    error = %e,
                    "Failed to decode pyramid tile"
                );
                None
            }
        }
    }

    fn tile_image(&self, tile_id: TileId, view: StereoView) -> Option<TileImage> {
        if !self.valid {
            return None;
        }
        self.cache
            .get(tile_id, |id| self.cachable_tile_image(id, view))
    }
}
