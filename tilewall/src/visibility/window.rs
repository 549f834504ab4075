//! Window model consumed by the visibility computation.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Identifier of a window within its display group.
pub type WindowId = u64;

/// A window as seen by the visibility computation.
///
/// Windows are owned by the caller's display group; this is a read-only
/// snapshot of the fields occlusion depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    /// Display rectangle in global wall coordinates.
    pub rect: Rect,
    /// Focused windows draw above every non-focused window.
    #[serde(default)]
    pub focused: bool,
    /// A fullscreen window covers the whole wall and hides all others.
    #[serde(default)]
    pub fullscreen: bool,
}

impl Window {
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            focused: false,
            fullscreen: false,
        }
    }

    /// Mark the window as focused.
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }

    /// Mark the window as fullscreen.
    pub fn fullscreen(mut self) -> Self {
        self.fullscreen = true;
        self
    }
}
