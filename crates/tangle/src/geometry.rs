//! Core geometry types for tangle.
//!
//! Everything here is plain data: points, straight segments between path
//! vertices, and the rectangles that make up diagram nodes. Coordinates come
//! from rounded markup values, so equality is always approximate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate tolerance for point equality and axis classification.
pub const TOLERANCE: f64 = 0.01;

/// A 2D point with x,y coordinates.
///
/// ## Approximate equality
///
/// `PartialEq` is implemented by hand instead of derived: two points are
/// equal when both deltas are below [`TOLERANCE`]. That also means `Point`
/// cannot be `Eq` or `Hash` (the relation is not transitive), so grouping by
/// location goes through [`Point::grid_key`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Integer grid cell for grouping points that render at the same spot.
    #[inline]
    pub fn grid_key(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < TOLERANCE && (self.y - other.y).abs() < TOLERANCE
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis classification of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
    Diagonal,
}

/// A straight edge between two consecutive path vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        (self.p1.y - self.p2.y).abs() < TOLERANCE
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        (self.p1.x - self.p2.x).abs() < TOLERANCE
    }

    /// Single orientation for dispatch. A zero-length segment is both
    /// horizontal and vertical; vertical wins.
    pub fn orientation(&self) -> Orientation {
        if self.is_vertical() {
            Orientation::Vertical
        } else if self.is_horizontal() {
            Orientation::Horizontal
        } else {
            Orientation::Diagonal
        }
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.p1.x.min(self.p2.x)
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.p1.x.max(self.p2.x)
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.p1.y.min(self.p2.y)
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.p1.y.max(self.p2.y)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_horizontal() {
            write!(f, "H-Seg(y={}, x:{}-{})", self.p1.y, self.x_min(), self.x_max())
        } else if self.is_vertical() {
            write!(f, "V-Seg(x={}, y:{}-{})", self.p1.x, self.y_min(), self.y_max())
        } else {
            write!(
                f,
                "D-Seg({},{})->({},{})",
                self.p1.x, self.p1.y, self.p2.x, self.p2.y
            )
        }
    }
}

/// A rectangular diagram box that paths connect to and from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Node {
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside this node.
    ///
    /// With `exclude_edges` the boundary itself is outside; otherwise it
    /// counts as inside.
    pub fn contains_point(&self, p: Point, exclude_edges: bool) -> bool {
        if exclude_edges {
            self.x_min() < p.x && p.x < self.x_max() && self.y_min() < p.y && p.y < self.y_max()
        } else {
            self.x_min() <= p.x && p.x <= self.x_max() && self.y_min() <= p.y && p.y <= self.y_max()
        }
    }

    /// The four boundary edges: top, right, bottom, left.
    pub fn edges(&self) -> [Segment; 4] {
        let top_left = Point::new(self.x_min(), self.y_min());
        let top_right = Point::new(self.x_max(), self.y_min());
        let bottom_right = Point::new(self.x_max(), self.y_max());
        let bottom_left = Point::new(self.x_min(), self.y_max());
        [
            Segment::new(top_left, top_right),
            Segment::new(top_right, bottom_right),
            Segment::new(bottom_left, bottom_right),
            Segment::new(top_left, bottom_left),
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================
