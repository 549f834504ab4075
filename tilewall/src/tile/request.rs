//! Tile request type handed from planning to loading.

use crate::geometry::Rect;
use crate::lod::TileId;
use crate::source::StereoView;

/// Request to display one tile of a data source.
///
/// Carries everything the scene graph needs to place the tile once its
/// pixels are available: which tile, on which channel, and where it sits in
/// level and normalized coordinates.
///
/// # Example
///
/// ```
/// use tilewall::geometry::Rect;
/// use tilewall::source::StereoView;
/// use tilewall::tile::TileRequest;
///
/// let request = TileRequest::new(
///     0,
///     0,
///     0,
///     StereoView::Mono,
///     Rect::new(0.0, 0.0, 512.0, 512.0),
///     Rect::new(0.0, 0.0, 1.0, 1.0),
/// );
/// assert_eq!(request.tile_id(), 0);
/// assert_eq!(request.view(), StereoView::Mono);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRequest {
    tile_id: TileId,
    lod: u32,
    /// Render channel: 0 for mono or left, 1 for right.
    channel: u8,
    view: StereoView,
    /// Tile rectangle in the pixel space of its level.
    rect: Rect,
    /// Tile rectangle relative to the level extent, in `[0, 1]`.
    normalized_rect: Rect,
}

impl TileRequest {
    pub fn new(
        tile_id: TileId,
        lod: u32,
        channel: u8,
        view: StereoView,
        rect: Rect,
        normalized_rect: Rect,
    ) -> Self {
        Self {
            tile_id,
            lod,
            channel,
            view,
            rect,
            normalized_rect,
        }
    }

    pub fn tile_id(&self) -> TileId {
        self.tile_id
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn view(&self) -> StereoView {
        self.view
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn normalized_rect(&self) -> Rect {
        self.normalized_rect
    }

    /// Place the tile inside a window displayed at `window_rect`.
    ///
    /// Returns the tile's rectangle in the window's local coordinates.
    pub fn window_rect(&self, window_rect: &Rect) -> Rect {
        self.normalized_rect
            .scaled(window_rect.width, window_rect.height)
    }
}
