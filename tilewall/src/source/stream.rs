//! Live pixel stream data source.
//!
//! Streams are not tiled geometrically: the sender decides how each frame
//! is cut and pushes the resulting tiles together with their rectangles.
//! The source only keeps the latest frame and answers the usual
//! `tile id → rect` and visibility questions from it.

use std::sync::Arc;

use image::RgbaImage;
use parking_lot::RwLock;
use tracing::trace;

use crate::cache::TileImage;
use crate::geometry::{Rect, Size};
use crate::lod::{TileId, TileSet};

use super::{ContentType, DataSource, StereoView};

/// One tile of a pushed frame.
#[derive(Debug, Clone)]
pub struct StreamTile {
    pub id: TileId,
    /// Render channel (0 = left/mono, 1 = right).
    pub channel: u8,
    /// Position of the tile in frame pixel coordinates.
    pub rect: Rect,
    pub image: TileImage,
}

impl StreamTile {
    pub fn new(id: TileId, channel: u8, rect: Rect, image: RgbaImage) -> Self {
        Self {
            id,
            channel,
            rect,
            image: Arc::new(image),
        }
    }
}

/// A complete frame of a stream.
#[derive(Debug, Clone, Default)]
pub struct StreamFrame {
    /// Full frame size in pixels.
    pub size: Size,
    pub tiles: Vec<StreamTile>,
}

impl StreamFrame {
    pub fn new(size: Size, tiles: Vec<StreamTile>) -> Self {
        Self { size, tiles }
    }

    fn tile(&self, id: TileId, channel: u8) -> Option<&StreamTile> {
        self.tiles
            .iter()
            .find(|tile| tile.id == id && tile.channel == channel)
    }
}

/// Data source fed with externally pushed frames.
#[derive(Debug)]
pub struct StreamSource {
    uri: String,
    stereo: bool,
    frame: RwLock<Arc<StreamFrame>>,
}

impl StreamSource {
    /// Create a stream with no frame yet. Nothing is visible until the
    /// first [`push_frame`](Self::push_frame).
    pub fn new(uri: impl Into<String>, stereo: bool) -> Self {
        Self {
            uri: uri.into(),
            stereo,
            frame: RwLock::new(Arc::new(StreamFrame::default())),
        }
    }

    /// Replace the current frame. Readers see either the old or the new frame.
    pub fn push_frame(&self, frame: StreamFrame) {
        trace!(
            uri = %self.uri,
            width = frame.size.width,
            height = frame.size.height,
            tiles = frame.tiles.len(),
            "Stream frame pushed"
        );
        *self.frame.write() = Arc::new(frame);
    }

    /// The frame currently displayed.
    pub fn current_frame(&self) -> Arc<StreamFrame> {
        self.frame.read().clone()
    }
}

impl DataSource for StreamSource {
    fn content_type(&self) -> ContentType {
        ContentType::Stream
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn is_valid(&self) -> bool {
        true
    }

    /// Rectangle of the left (or mono) tile, falling back to any channel
    /// carrying `tile_id`.
    fn tile_rect(&self, tile_id: TileId) -> Rect {
        let frame = self.current_frame();
        frame
            .tile(tile_id, 0)
            .or_else(|| frame.tiles.iter().find(|tile| tile.id == tile_id))
            .map(|tile| tile.rect)
            .unwrap_or_else(Rect::empty)
    }

    fn channel_tile_rect(&self, tile_id: TileId, channel: u8) -> Rect {
        self.current_frame()
            .tile(tile_id, channel)
            .map(|tile| tile.rect)
            .unwrap_or_else(Rect::empty)
    }

    fn normalized_tile_rect(&self, tile_id: TileId, channel: u8) -> Rect {
        let frame = self.current_frame();
        match frame.tile(tile_id, channel) {
            Some(tile) if !frame.size.is_empty() => tile.rect.scaled(
                1.0 / frame.size.width as f64,
                1.0 / frame.size.height as f64,
            ),
            _ => Rect::empty(),
        }
    }

    fn tiles_area(&self, _lod: u32, _channel: u8) -> Size {
        self.current_frame().size
    }

    fn max_lod(&self) -> u32 {
        0
    }

    fn is_stereo(&self) -> bool {
        self.stereo
    }

    fn compute_visible_set(&self, area: &Rect, _lod: u32, channel: u8) -> TileSet {
        self.current_frame()
            .tiles
            .iter()
            .filter(|tile| tile.channel == channel && tile.rect.intersects(area))
            .map(|tile| tile.id)
            .collect()
    }

    fn cachable_tile_image(&self, tile_id: TileId, view: StereoView) -> Option<RgbaImage> {
        self.tile_image(tile_id, view).map(|image| (*image).clone())
    }

    fn tile_image(&self, tile_id: TileId, view: StereoView) -> Option<TileImage> {
        self.current_frame()
            .tile(tile_id, view.channel())
            .map(|tile| Arc::clone(&tile.image))
    }
}
