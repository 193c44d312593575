//! Rectangle math shared by the layout, reactor and reorder code
//!
//! All functions here are pure. Coordinates use a y-down system, the same one
//! the scene graph and the gesture source report.

use serde::Deserialize;

/// A 2D point in world or screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset between two points (`self - other`)
    pub fn delta(&self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        let (dx, dy) = self.delta(other);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A normalized anchor inside a rectangle: `(0, 0)` is the top-left corner,
/// `(1, 1)` the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };
    pub const TOP_LEFT: Anchor = Anchor { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        self.anchor_point(Anchor::CENTER)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Inclusive containment test: points on the edges are inside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Shift all four edges by the same delta
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Absolute position of a normalized anchor inside this rectangle
    pub fn anchor_point(&self, anchor: Anchor) -> Point {
        Point::new(
            self.x + self.width * anchor.x,
            self.y + self.height * anchor.y,
        )
    }

    /// Scale about an absolute pivot point.
    ///
    /// Edges move towards (factor < 1) or away from (factor > 1) the pivot;
    /// the pivot itself stays fixed.
    pub fn scale_about(&self, factor: f64, pivot: Point) -> Rect {
        Rect::new(
            pivot.x + (self.x - pivot.x) * factor,
            pivot.y + (self.y - pivot.y) * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Scale about a normalized anchor of this same rectangle
    pub fn scale_about_anchor(&self, factor: f64, anchor: Anchor) -> Rect {
        self.scale_about(factor, self.anchor_point(anchor))
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Bounding rectangle of a set of rectangles, `None` when empty
    pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects
            .into_iter()
            .fold(None, |acc: Option<Rect>, r| match acc {
                Some(u) => Some(u.union(r)),
                None => Some(*r),
            })
    }

    /// Linear interpolation of every field; `t` is not clamped so that
    /// overshooting springs can move past the target.
    pub fn lerp(&self, target: &Rect, t: f64) -> Rect {
        Rect::new(
            lerp(self.x, target.x, t),
            lerp(self.y, target.y, t),
            lerp(self.width, target.width, t),
            lerp(self.height, target.height, t),
        )
    }

    /// Approximate equality within `tolerance` on every field
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

pub(crate) fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}
