//! Data source types and traits

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::cache::TileImage;
use crate::geometry::{Rect, Size};
use crate::lod::{TileId, TileSet};

use super::SourceError;

/// Kind of content a window can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Bitmap image decoded as a single tile.
    Image,
    /// Pre-tiled image pyramid on disk.
    Pyramid,
    /// SVG document rasterized per tile.
    Svg,
    /// PDF page rasterized per tile.
    Pdf,
    /// Live pixel stream pushed frame by frame.
    Stream,
    /// Movie file. Recognized but not handled by this crate.
    Movie,
    /// Web browser. Recognized but not handled by this crate.
    WebBrowser,
}

impl ContentType {
    /// Tag used in content metadata.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pyramid => "pyramid",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Stream => "stream",
            Self::Movie => "movie",
            Self::WebBrowser => "webbrowser",
        }
    }

    /// Whether this content is produced by a [`Rasterizer`](super::Rasterizer).
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg | Self::Pdf)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ContentType {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "pyramid" => Ok(Self::Pyramid),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "stream" => Ok(Self::Stream),
            "movie" => Ok(Self::Movie),
            "webbrowser" => Ok(Self::WebBrowser),
            _ => Err(SourceError::UnsupportedContentType(s.to_string())),
        }
    }
}

/// Metadata describing one content item, read once when its source is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    /// Full-resolution width in pixels.
    pub width: u32,
    /// Full-resolution height in pixels.
    pub height: u32,
    /// Content type tag, e.g. `"image"` or `"pyramid"`.
    pub content_type: String,
    /// Location of the content (file path, directory or stream name).
    pub uri: String,
}

impl ContentInfo {
    pub fn new(
        width: u32,
        height: u32,
        content_type: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            width,
            height,
            content_type: content_type.into(),
            uri: uri.into(),
        }
    }

    /// Parse metadata from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Which eye of a stereo pair to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StereoView {
    /// Non-stereo display. Stereo sources show their left view.
    #[default]
    Mono,
    Left,
    Right,
}

impl StereoView {
    /// Render channel used for this view (0 = left/mono, 1 = right).
    pub fn channel(&self) -> u8 {
        match self {
            Self::Mono | Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Source of tiled pixel data for one content item.
///
/// Every content kind answers the same questions: how its tiles are laid
/// out, which of them are visible for a given area and level of detail, and
/// how to decode one. Implementations must be thread-safe so tiles can be
/// decoded from worker threads.
///
/// Sources are never "broken" objects: a source whose resource could not be
/// opened reports `is_valid() == false` and returns empty visible sets.
pub trait DataSource: Send + Sync {
    /// Kind of content this source serves.
    fn content_type(&self) -> ContentType;

    /// Location the source was opened from.
    fn uri(&self) -> &str;

    /// False if the underlying resource could not be opened.
    fn is_valid(&self) -> bool;

    /// Rectangle of a tile in the pixel space of its level.
    fn tile_rect(&self, tile_id: TileId) -> Rect;

    /// Rectangle of a tile as laid out on `channel`.
    ///
    /// Sources whose channels share one layout use [`tile_rect`](Self::tile_rect).
    fn channel_tile_rect(&self, tile_id: TileId, _channel: u8) -> Rect {
        self.tile_rect(tile_id)
    }

    /// Tile rectangle normalized to `[0, 1]` by the extent of its level.
    fn normalized_tile_rect(&self, tile_id: TileId, channel: u8) -> Rect;

    /// Pixel extent spanned by all tiles at `lod` on `channel`.
    fn tiles_area(&self, lod: u32, channel: u8) -> Size;

    /// Finest level of detail served.
    fn max_lod(&self) -> u32;

    /// True if the source carries separate left and right views.
    fn is_stereo(&self) -> bool {
        false
    }

    /// Number of render channels: 2 for stereo sources, 1 otherwise.
    fn channel_count(&self) -> u8 {
        if self.is_stereo() {
            2
        } else {
            1
        }
    }

    /// View to request when rendering `channel`.
    fn view_for_channel(&self, channel: u8) -> StereoView {
        match (self.is_stereo(), channel) {
            (false, _) => StereoView::Mono,
            (true, 0) => StereoView::Left,
            (true, _) => StereoView::Right,
        }
    }

    /// Level of detail to use for content shown at `display` pixels.
    fn lod_for_display_size(&self, _display: Size) -> u32 {
        0
    }

    /// Tiles intersecting `area` (in the pixel space of `lod`) on `channel`.
    fn compute_visible_set(&self, area: &Rect, lod: u32, channel: u8) -> TileSet;

    /// Decode a tile. May be expensive; prefer [`tile_image`](Self::tile_image).
    ///
    /// Returns `None` if the tile cannot be produced.
    fn cachable_tile_image(&self, tile_id: TileId, view: StereoView) -> Option<RgbaImage>;

    /// Decoded tile, served from the source's cache when it has one.
    fn tile_image(&self, tile_id: TileId, view: StereoView) -> Option<TileImage> {
        self.cachable_tile_image(tile_id, view).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse_is_case_insensitive() {
        assert_eq!("IMAGE".parse::<ContentType>().unwrap(), ContentType::Image);
        assert_eq!(" Pyramid ".parse::<ContentType>().unwrap(), ContentType::Pyramid);
        assert_eq!("svg".parse::<ContentType>().unwrap(), ContentType::Svg);
    }

    #[test]
    fn test_unknown_content_type_is_rejected() {
        let err = "hologram".parse::<ContentType>().unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedContentType(tag) if tag == "hologram"));
    }

    #[test]
    fn test_content_type_tag_roundtrip() {
        for kind in [
            ContentType::Image,
            ContentType::Pyramid,
            ContentType::Svg,
            ContentType::Pdf,
            ContentType::Stream,
            ContentType::Movie,
            ContentType::WebBrowser,
        ] {
            assert_eq!(kind.tag().parse::<ContentType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_content_info_from_json() {
        let info = ContentInfo::from_json(
            r#"{"width": 4096, "height": 2048, "content_type": "pyramid", "uri": "/data/map"}"#,
        )
        .unwrap();
        assert_eq!(info.size(), Size::new(4096, 2048));
        assert_eq!(info.content_type, "pyramid");
        assert_eq!(info.uri, "/data/map");
    }

    #[test]
    fn test_content_info_bad_json() {
        let err = ContentInfo::from_json("{\"width\": 1}").unwrap_err();
        assert!(matches!(err, SourceError::Metadata(_)));
    }

    #[test]
    fn test_stereo_view_channel() {
        assert_eq!(StereoView::Mono.channel(), 0);
        assert_eq!(StereoView::Left.channel(), 0);
        assert_eq!(StereoView::Right.channel(), 1);
        assert_eq!(StereoView::default(), StereoView::Mono);
    }
}
