//! Window occlusion on the display wall.
//!
//! Given the ordered windows of a display group, [`VisibilityHelper`]
//! computes the part of each window that is not covered by windows stacked
//! above it, by a focused window, or by a fullscreen window. Rendering is
//! then clipped to that area so hidden tiles are never fetched.

mod helper;
mod window;

pub use helper::{cut_overlap, VisibilityHelper};
pub use window::{Window, WindowId};
