//! Unoccluded area computation for stacked windows.

use tracing::trace;

use crate::geometry::Rect;

use super::window::{Window, WindowId};

/// Computes which part of each window is actually visible on the wall.
///
/// The window slice is ordered back to front: the last window is the
/// topmost. The helper only borrows the slice for its own lifetime and keeps
/// no state between calls.
///
/// # Example
///
/// ```
/// use tilewall::geometry::Rect;
/// use tilewall::visibility::{VisibilityHelper, Window};
///
/// let windows = [
///     Window::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)),
///     Window::new(2, Rect::new(0.0, 0.0, 800.0, 300.0)),
/// ];
/// let helper = VisibilityHelper::new(&windows, Rect::new(0.0, 0.0, 800.0, 600.0));
///
/// // The bottom window loses the band covered by the top one.
/// assert_eq!(
///     helper.visible_area(&windows[0]),
///     Rect::new(0.0, 300.0, 800.0, 300.0)
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VisibilityHelper<'a> {
    windows: &'a [Window],
    viewport: Rect,
}

impl<'a> VisibilityHelper<'a> {
    /// Create a helper for `windows` (back to front) seen through `viewport`.
    pub fn new(windows: &'a [Window], viewport: Rect) -> Self {
        Self { windows, viewport }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Windows in stacking order, back to front.
    pub fn windows(&self) -> &'a [Window] {
        self.windows
    }

    /// Visible part of `window`, in the window's local coordinates.
    ///
    /// Returns an empty rectangle if nothing of the window can be seen.
    pub fn visible_area(&self, window: &Window) -> Rect {
        let area = window.rect.intersection(&self.viewport);
        if area.is_empty() {
            return Rect::empty();
        }

        if window.fullscreen {
            return to_local(&area, window);
        }

        if self
            .windows
            .iter()
            .any(|other| other.fullscreen && other.id != window.id)
        {
            trace!(window = window.id, "Hidden by a fullscreen window");
            return Rect::empty();
        }

        if window.focused {
            return to_local(&area, window);
        }

        let mut area = area;
        let mut is_above = false;
        for other in self.windows {
            if other.id == window.id {
                is_above = true;
                continue;
            }
            // Focused windows are drawn on top of the whole stack.
            if is_above || other.focused {
                area = cut_overlap(&area, &other.rect);
                if area.is_empty() {
                    trace!(window = window.id, by = other.id, "Fully occluded");
                    return Rect::empty();
                }
            }
        }

        to_local(&area, window)
    }

    /// Visible area of every window, in stacking order.
    pub fn visible_areas(&self) -> Vec<(WindowId, Rect)> {
        self.windows
            .iter()
            .map(|window| (window.id, self.visible_area(window)))
            .collect()
    }
}

/// Remove from `window` the part covered by `other`.
///
/// Only overlaps spanning the full width or full height of `window` are cut;
/// corner overlaps leave `window` unchanged. A full-width band that touches
/// neither the top nor the bottom edge keeps the part above the band, and a
/// full-height band touching neither side keeps the part left of it.
pub fn cut_overlap(window: &Rect, other: &Rect) -> Rect {
    if !window.intersects(other) {
        return *window;
    }
    if other.contains(window) {
        return Rect::empty();
    }

    let spans_width = other.left() <= window.left() && other.right() >= window.right();
    let spans_height = other.top() <= window.top() && other.bottom() >= window.bottom();

    if spans_width {
        let band_top = other.top().max(window.top());
        let band_bottom = other.bottom().min(window.bottom());
        if band_top > window.top() {
            Rect::from_edges(window.left(), window.top(), window.right(), band_top)
        } else {
            Rect::from_edges(window.left(), band_bottom, window.right(), window.bottom())
        }
    } else if spans_height {
        let band_left = other.left().max(window.left());
        let band_right = other.right().min(window.right());
        if band_left > window.left() {
            Rect::from_edges(window.left(), window.top(), band_left, window.bottom())
        } else {
            Rect::from_edges(band_right, window.top(), window.right(), window.bottom())
        }
    } else {
        *window
    }
}

fn to_local(area: &Rect, window: &Window) -> Rect {
    area.translated(-window.rect.x, -window.rect.y)
}
