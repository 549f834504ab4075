//! Whole-image (bitmap) data source.
//!
//! Bitmaps without a pyramid are decoded once and served as a single tile
//! (identifier 0) regardless of the requested level of detail. Side-by-side
//! stereo images are recognized by file name and split into their two views
//! once, when the source is built.

use std::path::Path;
use std::sync::Arc;

use image::imageops;
use image::{ImageReader, RgbaImage};
use tracing::{debug, warn};

use crate::geometry::{Rect, Size};
use crate::lod::{TileId, TileSet};

use crate::cache::TileImage;

use super::{ContentType, DataSource, SourceError, StereoView};

/// File stem suffixes marking a side-by-side stereo image.
const STEREO_SUFFIXES: &[&str] = &["_stereo", "_sbs"];

/// File extension of JPEG stereo images (always side-by-side).
const STEREO_EXTENSION: &str = "jps";

/// Identifier of the only tile of a whole-image source.
pub const WHOLE_IMAGE_TILE: TileId = 0;

/// Decoded pixels, ready to hand out without copying.
#[derive(Debug, Clone)]
struct Views {
    /// Whole bitmap for mono images, left half for stereo ones.
    left: TileImage,
    /// Right half; only present for stereo images.
    right: Option<TileImage>,
}

/// Single-tile source backed by a decoded bitmap.
#[derive(Debug, Clone)]
pub struct ImageSource {
    uri: String,
    views: Option<Views>,
    stereo: bool,
}

impl ImageSource {
    /// Open and decode the image at `uri`.
    ///
    /// A file that cannot be decoded produces an invalid source instead of
    /// an error, so the window simply shows nothing.
    pub fn open(uri: &str) -> Self {
        match Self::try_open(uri) {
            Ok(source) => source,
            Err(e) => {
                warn!(uri, error = %e, "Image source is invalid");
                Self {
                    uri: uri.to_string(),
                    views: None,
                    stereo: is_stereo_uri(uri),
                }
            }
        }
    }

    /// Open and decode the image at `uri`, failing with
    /// [`SourceError::InvalidSource`] if it cannot be read.
    pub fn try_open(uri: &str) -> Result<Self, SourceError> {
        // Sniff the format from the header: `.jps` files are JPEGs.
        let image = ImageReader::open(uri)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| SourceError::invalid(uri, e.to_string()))?
            .decode()
            .map_err(|e| SourceError::invalid(uri, e.to_string()))?
            .to_rgba8();
        let stereo = is_stereo_uri(uri);
        debug!(
            uri,
            width = image.width(),
            height = image.height(),
            stereo,
            "Decoded image source"
        );
        Ok(Self::from_image(uri, image, stereo))
    }

    /// Wrap an already decoded image.
    ///
    /// Stereo images are split into their left and right halves here.
    pub fn from_image(uri: impl Into<String>, image: RgbaImage, stereo: bool) -> Self {
        let views = if stereo {
            let half = image.width() / 2;
            let height = image.height();
            Views {
                left: Arc::new(imageops::crop_imm(&image, 0, 0, half, height).to_image()),
                right: Some(Arc::new(
                    imageops::crop_imm(&image, half, 0, half, height).to_image(),
                )),
            }
        } else {
            Views {
                left: Arc::new(image),
                right: None,
            }
        };

        Self {
            uri: uri.into(),
            views: Some(views),
            stereo,
        }
    }

    /// Displayed size: the size of one eye for stereo images.
    pub fn size(&self) -> Size {
        match &self.views {
            Some(views) => Size::new(views.left.width(), views.left.height()),
            None => Size::default(),
        }
    }

    /// Pixels for `view`, shared with the source. Stereo images return the
    /// requested half; mono images return the whole bitmap for every view.
    pub fn image(&self, view: StereoView) -> Option<TileImage> {
        let views = self.views.as_ref()?;
        let image = match (view, &views.right) {
            (StereoView::Right, Some(right)) => right,
            _ => &views.left,
        };
        Some(Arc::clone(image))
    }
}

impl DataSource for ImageSource {
    fn content_type(&self) -> ContentType {
        ContentType::Image
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn is_valid(&self) -> bool {
        self.views.is_some()
    }

    fn tile_rect(&self, tile_id: TileId) -> Rect {
        if tile_id == WHOLE_IMAGE_TILE {
            Rect::from_size(self.size())
        } else {
            Rect::empty()
        }
    }

    fn normalized_tile_rect(&self, tile_id: TileId, _channel: u8) -> Rect {
        if tile_id == WHOLE_IMAGE_TILE {
            Rect::new(0.0, 0.0, 1.0, 1.0)
        } else {
            Rect::empty()
        }
    }

    fn tiles_area(&self, _lod: u32, _channel: u8) -> Size {
        self.size()
    }

    fn max_lod(&self) -> u32 {
        0
    }

    fn is_stereo(&self) -> bool {
        self.stereo
    }

    fn compute_visible_set(&self, area: &Rect, _lod: u32, channel: u8) -> TileSet {
        if self.is_valid() && !area.is_empty() && channel < self.channel_count() {
            TileSet::from([WHOLE_IMAGE_TILE])
        } else {
            TileSet::new()
        }
    }

    fn cachable_tile_image(&self, tile_id: TileId, view: StereoView) -> Option<RgbaImage> {
        if tile_id != WHOLE_IMAGE_TILE {
            return None;
        }
        self.image(view).map(|image| (*image).clone())
    }

    fn tile_image(&self, tile_id: TileId, view: StereoView) -> Option<TileImage> {
        if tile_id != WHOLE_IMAGE_TILE {
            return None;
        }
        self.image(view)
    }
}

/// True if `uri` follows the side-by-side stereo naming convention.
///
/// The decision is made from the name alone: a `.jps` extension, or a file
/// stem ending in `_stereo` or `_sbs` (case-insensitive).
pub fn is_stereo_uri(uri: &str) -> bool {
    let path = Path::new(uri);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    if extension.as_deref() == Some(STEREO_EXTENSION) {
        return true;
    }

    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| {
            let stem = stem.to_lowercase();
            STEREO_SUFFIXES.iter().any(|suffix| stem.ends_with(suffix))
        })
        .unwrap_or(false)
}
