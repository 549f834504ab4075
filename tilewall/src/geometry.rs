//! Axis-aligned rectangles and pixel sizes.
//!
//! Window rectangles live in global wall coordinates and may be fractional,
//! so [`Rect`] stores `f64` components. Tile rectangles reuse the same type;
//! their components are always whole pixel values, which `f64` represents
//! exactly.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a piece of content or of one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle given by its top-left corner and its extent.
///
/// A rectangle is empty when its width or height is not strictly positive.
/// The y axis points down: `top()` is `y`, `bottom()` is `y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The empty rectangle at the origin.
    pub const fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Rectangle at the origin covering `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    /// Build a rectangle from its edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Intersection of two rectangles, or [`Rect::empty`] if they share no area.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Rect::from_edges(left, top, right, bottom)
        } else {
            Rect::empty()
        }
    }

    /// True if the two rectangles share a non-zero area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// True if `other` lies entirely inside this rectangle.
    ///
    /// Empty rectangles neither contain nor are contained.
    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Rectangle moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Rectangle with every component multiplied by the given factors.
    pub fn scaled(&self, sx: f64, sy: f64) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rect() {
        assert!(Rect::empty().is_empty());
        assert!(Rect::new(10.0, 10.0, 0.0, 5.0).is_empty());
        assert!(Rect::new(10.0, 10.0, 5.0, -1.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_intersection_overlapping() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 25.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Rect::new(50.0, 25.0, 50.0, 75.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(100.0, 0.0, 100.0, 100.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new(10.0, 10.0, 10.0, 10.0)));
        assert!(!outer.contains(&Rect::new(790.0, 10.0, 20.0, 10.0)));
        assert!(!outer.contains(&Rect::empty()));
    }

    #[test]
    fn test_translated_and_scaled() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.translated(-10.0, -20.0), Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(r.scaled(0.5, 2.0), Rect::new(5.0, 40.0, 15.0, 80.0));
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
        assert_eq!(Rect::from_size(Size::new(4, 3)), Rect::new(0.0, 0.0, 4.0, 3.0));
    }
}
