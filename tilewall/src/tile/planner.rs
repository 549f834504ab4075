//! Per-frame tile planning.
//!
//! For each window, the planner clips the window to its unoccluded area,
//! picks a level of detail from the window's on-screen size, and asks the
//! window's data source which tiles cover that area on every channel.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::geometry::{Rect, Size};
use crate::lod::{window_area_to_level, TileId};
use crate::source::DataSource;
use crate::visibility::{VisibilityHelper, Window, WindowId};

use super::request::TileRequest;

/// Tiles to show for one window in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    pub window: WindowId,
    /// Unoccluded part of the window, in window-local coordinates.
    pub visible_area: Rect,
    pub lod: u32,
    /// Requests ordered by channel, then tile id.
    pub requests: Vec<TileRequest>,
}

impl WindowPlan {
    fn empty(window: WindowId) -> Self {
        Self {
            window,
            visible_area: Rect::empty(),
            lod: 0,
            requests: Vec::new(),
        }
    }

    /// True if nothing needs to be drawn for the window.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Tile ids requested on `channel`, in ascending order.
    pub fn tile_ids(&self, channel: u8) -> Vec<TileId> {
        self.requests
            .iter()
            .filter(|r| r.channel() == channel)
            .map(|r| r.tile_id())
            .collect()
    }
}

/// Plans the visible tiles of every window of a display group.
///
/// # Example
///
/// ```
/// use tilewall::geometry::Rect;
/// use tilewall::source::ImageSource;
/// use tilewall::tile::FramePlanner;
/// use tilewall::visibility::Window;
/// use image::RgbaImage;
///
/// let source = ImageSource::from_image("photo.png", RgbaImage::new(64, 32), false);
/// let windows = [Window::new(1, Rect::new(0.0, 0.0, 640.0, 320.0))];
/// let planner = FramePlanner::new(&windows, Rect::new(0.0, 0.0, 1920.0, 1080.0));
///
/// let plan = planner.plan(&windows[0], &source);
/// assert_eq!(plan.tile_ids(0), vec![0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FramePlanner<'a> {
    visibility: VisibilityHelper<'a>,
}

impl<'a> FramePlanner<'a> {
    /// Create a planner for `windows` (back to front) seen through `viewport`.
    pub fn new(windows: &'a [Window], viewport: Rect) -> Self {
        Self {
            visibility: VisibilityHelper::new(windows, viewport),
        }
    }

    /// Plan the tiles of `window` displaying `source`.
    ///
    /// Returns an empty plan if the source is invalid or the window is not
    /// visible.
    pub fn plan(&self, window: &Window, source: &dyn DataSource) -> WindowPlan {
        if !source.is_valid() {
            debug!(window = window.id, uri = source.uri(), "Skipping invalid source");
            return WindowPlan::empty(window.id);
        }

        let visible_area = self.visibility.visible_area(window);
        if visible_area.is_empty() {
            return WindowPlan::empty(window.id);
        }

        let display = Size::new(
            window.rect.width.ceil() as u32,
            window.rect.height.ceil() as u32,
        );
        let lod = source.lod_for_display_size(display).min(source.max_lod());

        let mut requests = Vec::new();
        for channel in 0..source.channel_count() {
            let level = source.tiles_area(lod, channel);
            let area = window_area_to_level(&visible_area, &window.rect, level);
            let view = source.view_for_channel(channel);
            for tile_id in source.compute_visible_set(&area, lod, channel) {
                requests.push(TileRequest::new(
                    tile_id,
                    lod,
                    channel,
                    view,
                    source.channel_tile_rect(tile_id, channel),
                    source.normalized_tile_rect(tile_id, channel),
                ));
            }
        }

        debug!(
            window = window.id,
            lod,
            tiles = requests.len(),
            "Planned window tiles"
        );

        WindowPlan {
            window: window.id,
            visible_area,
            lod,
            requests,
        }
    }

    /// Plan every window that has a source, in stacking order.
    ///
    /// Windows without an entry in `sources` are skipped.
    pub fn plan_all(&self, sources: &HashMap<WindowId, Arc<dyn DataSource>>) -> Vec<WindowPlan> {
        self.visibility
            .windows()
            .iter()
            .filter_map(|window| {
                sources
                    .get(&window.id)
                    .map(|source| self.plan(window, source.as_ref()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        ContentInfo, ImageSource, PyramidSource, StereoView, StreamFrame, StreamSource,
        StreamTile,
    };
    use image::RgbaImage;

    const WALL: Rect = Rect::new(0.0, 0.0, 4096.0, 2048.0);

    fn pyramid_4096() -> PyramidSource {
        // Tiles are never decoded here; any existing directory keeps the source valid.
        let dir = std::env::temp_dir();
        let info = ContentInfo::new(4096, 4096, "pyramid", dir.to_string_lossy());
        PyramidSource::open(&info, 512, "png").unwrap()
    }

    #[test]
    fn test_whole_window_at_native_size_requests_finest_level() {
        let source = pyramid_4096();
        let windows = [Window::new(1, Rect::new(0.0, 0.0, 4096.0, 4096.0))];
        let planner = FramePlanner::new(&windows, Rect::new(0.0, 0.0, 4096.0, 4096.0));

        let plan = planner.plan(&windows[0], &source);
        assert_eq!(plan.lod, 3);
        assert_eq!(plan.requests.len(), 64);
        assert!(plan.requests.iter().all(|r| r.view() == StereoView::Mono));
    }

    #[test]
    fn test_occluded_half_is_not_requested() {
        let source = pyramid_4096();
        let windows = [
            Window::new(1, Rect::new(0.0, 0.0, 1024.0, 1024.0)),
            Window::new(2, Rect::new(512.0, -10.0, 600.0, 2000.0)),
        ];
        let planner = FramePlanner::new(&windows, WALL);

        let plan = planner.plan(&windows[0], &source);
        assert_eq!(plan.visible_area, Rect::new(0.0, 0.0, 512.0, 1024.0));
        // 1024px display -> lod 1 (1024x1024 level, 2x2 tiles); left column only.
        assert_eq!(plan.lod, 1);
        assert_eq!(plan.tile_ids(0), vec![1, 3]);
    }

    #[test]
    fn test_hidden_window_has_empty_plan() {
        let source = pyramid_4096();
        let windows = [
            Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0)),
            Window::new(2, WALL).fullscreen(),
        ];
        let planner = FramePlanner::new(&windows, WALL);
        let plan = planner.plan(&windows[0], &source);
        assert!(plan.is_empty());
        assert!(plan.visible_area.is_empty());
    }

    #[test]
    fn test_invalid_source_has_empty_plan() {
        let source = ImageSource::open("/nonexistent/tilewall/missing.png");
        let windows = [Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0))];
        let planner = FramePlanner::new(&windows, WALL);
        assert!(planner.plan(&windows[0], &source).is_empty());
    }

    #[test]
    fn test_stereo_image_plans_both_channels() {
        let source = ImageSource::from_image("scene_stereo.png", RgbaImage::new(200, 100), true);
        let windows = [Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0))];
        let planner = FramePlanner::new(&windows, WALL);

        let plan = planner.plan(&windows[0], &source);
        assert_eq!(plan.requests.len(), 2);
        assert_eq!(plan.requests[0].view(), StereoView::Left);
        assert_eq!(plan.requests[1].view(), StereoView::Right);
        assert_eq!(plan.tile_ids(1), vec![0]);
    }

    #[test]
    fn test_stereo_stream_requests_use_channel_layout() {
        let source = StreamSource::new("stream://cave", true);
        source.push_frame(StreamFrame::new(
            Size::new(100, 100),
            vec![
                StreamTile::new(0, 0, Rect::new(0.0, 0.0, 50.0, 50.0), RgbaImage::new(50, 50)),
                StreamTile::new(
                    0,
                    1,
                    Rect::new(50.0, 50.0, 50.0, 50.0),
                    RgbaImage::new(50, 50),
                ),
            ],
        ));
        let windows = [Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0))];
        let planner = FramePlanner::new(&windows, WALL);

        let plan = planner.plan(&windows[0], &source);
        assert_eq!(plan.requests.len(), 2);
        let right = plan.requests[1];
        assert_eq!(right.channel(), 1);
        assert_eq!(right.rect(), Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(right.normalized_rect(), Rect::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!(plan.requests[0].rect(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_plan_all_skips_windows_without_source() {
        let windows = [
            Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0)),
            Window::new(2, Rect::new(200.0, 0.0, 100.0, 100.0)),
        ];
        let mut sources: HashMap<WindowId, Arc<dyn DataSource>> = HashMap::new();
        sources.insert(
            2,
            Arc::new(ImageSource::from_image("a.png", RgbaImage::new(10, 10), false)),
        );
        let planner = FramePlanner::new(&windows, WALL);

        let plans = planner.plan_all(&sources);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].window, 2);
        assert_eq!(plans[0].tile_ids(0), vec![0]);
    }
}
