//! Geometric predicates shared by the detection passes.
//!
//! This is the hot path: the engine calls these for every segment pair and
//! every (segment, node) pair in the diagram.

use serde::Serialize;

use crate::geometry::{Node, Orientation, Point, Segment};

/// Lines whose determinant falls below this are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Parametric margin at both ends of a segment. Meeting inside this margin
/// is a connection, not a crossing.
pub const ENDPOINT_TOLERANCE: f64 = 0.01;

/// How close (in units) a path terminus must be to a node edge to count as
/// attached to it.
pub const EDGE_SNAP: f64 = 1.0;

// ============================================================================
// LINE-LINE INTERSECTION
// ============================================================================

/// Where two segments cross.
///
/// `t` is the position along the first segment and `u` along the second,
/// both in `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Intersection {
    pub t: f64,
    pub u: f64,
    pub point: Point,
}

/// Find the interior crossing between two segments, if any.
///
/// Solves the two-line parametric system
/// `P1 + t·(P2 - P1) = P3 + u·(P4 - P3)`. Parallel and collinear pairs never
/// intersect here; overlap along a shared line is a separate check.
/// Crossings with `t` or `u` within [`ENDPOINT_TOLERANCE`] of either end are
/// rejected, so segments that merely touch at an endpoint (an edge meeting a
/// routing corner, two edges fanning out of one port) are not reported.
pub fn segment_intersection(s1: &Segment, s2: &Segment) -> Option<Intersection> {
    let (x1, y1) = (s1.p1.x, s1.p1.y);
    let (x2, y2) = (s1.p2.x, s1.p2.y);
    let (x3, y3) = (s2.p1.x, s2.p1.y);
    let (x4, y4) = (s2.p2.x, s2.p2.y);

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

    let interior = |v: f64| ENDPOINT_TOLERANCE < v && v < 1.0 - ENDPOINT_TOLERANCE;

    if interior(t) && interior(u) {
        Some(Intersection {
            t,
            u,
            point: Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1)),
        })
    } else {
        None
    }
}

/// Boolean form of [`segment_intersection`].
#[inline]
pub fn segments_intersect(s1: &Segment, s2: &Segment) -> bool {
    segment_intersection(s1, s2).is_some()
}

/// Check if two 1D ranges overlap. Ranges that only touch do not.
#[inline]
pub fn ranges_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_min < b_max && b_min < a_max
}

// ============================================================================
// SEGMENT-NODE CROSSING
// ============================================================================

/// Where a segment sits in its path.
///
/// Only the first and last segments of a path are expected to touch a node,
/// so only they get leniency at node edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentPosition {
    pub is_first: bool,
    pub is_last: bool,
}

impl SegmentPosition {
    /// Position of segment `index` in a path of `count` segments.
    pub fn in_path(index: usize, count: usize) -> Self {
        Self {
            is_first: index == 0,
            is_last: index + 1 == count,
        }
    }

    /// A segment in the middle of a path.
    pub fn interior() -> Self {
        Self::default()
    }
}

/// Check if a segment passes through a node's body.
///
/// A terminal segment that ends on the node's boundary (the path attaches
/// there) is a valid connection as long as it stays within the node's extent
/// across its own axis.
pub fn segment_crosses_node(segment: &Segment, node: &Node, position: SegmentPosition) -> bool {
    match segment.orientation() {
        Orientation::Vertical => vertical_crosses_node(segment, node, position),
        Orientation::Horizontal => horizontal_crosses_node(segment, node, position),
        Orientation::Diagonal => diagonal_crosses_node(segment, node),
    }
}

fn vertical_crosses_node(segment: &Segment, node: &Node, position: SegmentPosition) -> bool {
    let x = segment.p1.x;
    if !(node.x_min() < x && x < node.x_max()) {
        return false;
    }
    if !ranges_overlap(segment.y_min(), segment.y_max(), node.y_min(), node.y_max()) {
        return false;
    }

    let on_edge =
        |p: Point| (p.y - node.y_min()).abs() < EDGE_SNAP || (p.y - node.y_max()).abs() < EDGE_SNAP;
    let attached = (position.is_first && on_edge(segment.p1)) || (position.is_last && on_edge(segment.p2));
    let within = segment.y_min() >= node.y_min() && segment.y_max() <= node.y_max();

    !(attached && within)
}

fn horizontal_crosses_node(segment: &Segment, node: &Node, position: SegmentPosition) -> bool {
    let y = segment.p1.y;
    if !(node.y_min() < y && y < node.y_max()) {
        return false;
    }
    if !ranges_overlap(segment.x_min(), segment.x_max(), node.x_min(), node.x_max()) {
        return false;
    }

    let on_edge =
        |p: Point| (p.x - node.x_min()).abs() < EDGE_SNAP || (p.x - node.x_max()).abs() < EDGE_SNAP;
    let attached = (position.is_first && on_edge(segment.p1)) || (position.is_last && on_edge(segment.p2));
    let within = segment.x_min() >= node.x_min() && segment.x_max() <= node.x_max();

    !(attached && within)
}

/// A diagonal crosses when either end is in the node (boundary included) or
/// it cuts one of the node's edges.
fn diagonal_crosses_node(segment: &Segment, node: &Node) -> bool {
    if node.contains_point(segment.p1, false) || node.contains_point(segment.p2, false) {
        return true;
    }

    node.edges().iter().any(|edge| segments_intersect(segment, edge))
}

// ============================================================================
// TESTS
// ============================================================================
