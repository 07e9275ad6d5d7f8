//! Axis-aligned rectangle geometry shared by every entity
//!
//! A body is defined by its top-left corner and its extent:
//! - position: top-left corner in field coordinates (y grows downward)
//! - width, height: size in pixels

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Named colors used by entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    LightBlue,
    Gold,
}

impl Color {
    /// Row palette used by the level layouts
    pub const PALETTE: [Color; 5] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
    ];

    /// CSS color name (for canvas fill styles)
    pub fn as_css(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Gray => "gray",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::LightBlue => "lightblue",
            Color::Gold => "gold",
        }
    }
}

/// A colored rectangle in the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

impl Body {
    pub fn new(pos: Vec2, width: f32, height: f32, color: Color) -> Self {
        Self {
            pos,
            width,
            height,
            color,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Center of the rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Strict bounding-box intersection (touching edges do not overlap)
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether the rectangle lies entirely inside `[min, max]`
    pub fn inside(&self, min: Vec2, max: Vec2) -> bool {
        self.left() >= min.x && self.right() <= max.x && self.top() >= min.y && self.bottom() <= max.y
    }
}

/// Box overlap test between two bodies
#[inline]
pub fn box_overlap(a: &Body, b: &Body) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(Vec2::new(x, y), w, h, Color::White)
    }

    #[test]
    fn test_overlap_partial() {
        let a = body(0.0, 0.0, 10.0, 10.0);
        let b = body(5.0, 5.0, 10.0, 10.0);
        assert!(box_overlap(&a, &b));
        assert!(box_overlap(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = body(0.0, 0.0, 10.0, 10.0);
        let right = body(10.0, 0.0, 10.0, 10.0);
        let below = body(0.0, 10.0, 10.0, 10.0);
        assert!(!box_overlap(&a, &right));
        assert!(!box_overlap(&a, &below));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = body(0.0, 0.0, 100.0, 100.0);
        let inner = body(40.0, 40.0, 5.0, 5.0);
        assert!(box_overlap(&outer, &inner));
    }

    #[test]
    fn test_center() {
        let a = body(10.0, 20.0, 70.0, 25.0);
        assert_eq!(a.center(), Vec2::new(45.0, 32.5));
    }

    #[test]
    fn test_inside() {
        let a = body(10.0, 10.0, 20.0, 20.0);
        assert!(a.inside(Vec2::ZERO, Vec2::new(30.0, 30.0)));
        assert!(!a.inside(Vec2::new(11.0, 0.0), Vec2::new(30.0, 30.0)));
    }

    #[test]
    fn test_css_names() {
        assert_eq!(Color::LightBlue.as_css(), "lightblue");
        assert_eq!(Color::PALETTE[0], Color::Red);
    }
}
