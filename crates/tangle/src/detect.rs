//! The crossing/overlap engine.
//!
//! Five independent passes over read-only inputs. Each returns its own list
//! of issues; [`analyze`] runs the enabled ones and concatenates the results
//! in a fixed order, so the output is reproducible for a given input.
//!
//! | pass                         | finds                                  | severity |
//! |------------------------------|----------------------------------------|----------|
//! | [`detect_node_crossings`]    | segments running through node bodies   | error    |
//! | [`detect_path_intersections`]| segments of different paths crossing   | error    |
//! | [`detect_shared_endpoints`]  | paths starting/ending at the same spot | warning / info |
//! | [`detect_segment_overlaps`]  | collinear axis segments sharing a span | warning  |
//! | [`detect_node_overlaps`]     | node boxes sharing area                | error    |
//!
//! The pairwise passes are O(P² · S²) in path count and segments per path,
//! which is fine for diagrams with tens of edges.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Node, Point};
use crate::intersect::{SegmentPosition, ranges_overlap, segment_crosses_node, segment_intersection};
use crate::issue::{Issue, IssueKind, Report};
use crate::path::PathDef;

/// Two axis segments closer than this across their axis share a line.
pub const COLLINEAR_TOLERANCE: f64 = 1.0;

/// Which passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub node_crossings: bool,
    pub path_intersections: bool,
    pub shared_endpoints: bool,
    pub segment_overlaps: bool,
    pub node_overlaps: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            node_crossings: true,
            path_intersections: true,
            shared_endpoints: true,
            segment_overlaps: true,
            node_overlaps: true,
        }
    }
}

/// Run every enabled pass and collect the findings.
pub fn analyze(nodes: &[Node], paths: &[PathDef], config: &AnalysisConfig) -> Report {
    debug!(nodes = nodes.len(), paths = paths.len(); "Analyzing diagram");

    let mut issues = Vec::new();

    if config.node_crossings {
        let found = detect_node_crossings(paths, nodes);
        debug!(issues = found.len(); "Node crossing pass done");
        issues.extend(found);
    }
    if config.path_intersections {
        let found = detect_path_intersections(paths);
        debug!(issues = found.len(); "Path intersection pass done");
        issues.extend(found);
    }
    if config.shared_endpoints {
        let found = detect_shared_endpoints(paths);
        debug!(issues = found.len(); "Shared endpoint pass done");
        issues.extend(found);
    }
    if config.segment_overlaps {
        let found = detect_segment_overlaps(paths);
        debug!(issues = found.len(); "Segment overlap pass done");
        issues.extend(found);
    }
    if config.node_overlaps {
        let found = detect_node_overlaps(nodes);
        debug!(issues = found.len(); "Node overlap pass done");
        issues.extend(found);
    }

    Report::new(issues)
}

/// Every (path, segment, node) triple where the segment runs through the node.
pub fn detect_node_crossings(paths: &[PathDef], nodes: &[Node]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for path in paths {
        let count = path.segments.len();
        for (index, segment) in path.segments.iter().enumerate() {
            let position = SegmentPosition::in_path(index, count);
            for node in nodes {
                if segment_crosses_node(segment, node, position) {
                    issues.push(Issue::node_crossing(path, index, segment, node));
                }
            }
        }
    }

    issues
}

/// Every crossing between segments of two different paths.
///
/// A path is never tested against itself.
pub fn detect_path_intersections(paths: &[PathDef]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        for other in &paths[i + 1..] {
            for (index, segment) in path.segments.iter().enumerate() {
                for (other_index, other_segment) in other.segments.iter().enumerate() {
                    if let Some(hit) = segment_intersection(segment, other_segment) {
                        issues.push(Issue::path_intersection(path, index, other, other_index, &hit));
                    }
                }
            }
        }
    }

    issues
}

/// Groups of paths whose start (or end) points round to the same spot.
///
/// Start groups come first, then end groups, each in order of first
/// appearance.
pub fn detect_shared_endpoints(paths: &[PathDef]) -> Vec<Issue> {
    let starts = group_by_cell(paths.iter().filter_map(|p| Some((p.start_point()?, p.name.as_str()))));
    let ends = group_by_cell(paths.iter().filter_map(|p| Some((p.end_point()?, p.name.as_str()))));

    let shared = |kind: IssueKind, groups: Vec<((i64, i64), Vec<&str>)>| {
        groups
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(move |(key, names)| Issue::shared_endpoint(kind, key, &names))
            .collect::<Vec<_>>()
    };

    let mut issues = shared(IssueKind::SharedStart, starts);
    issues.extend(shared(IssueKind::SharedEnd, ends));
    issues
}

/// Bucket names by the integer cell of their point, keeping first-seen order.
fn group_by_cell<'a>(
    entries: impl Iterator<Item = (Point, &'a str)>,
) -> Vec<((i64, i64), Vec<&'a str>)> {
    let mut slots: HashMap<(i64, i64), usize> = HashMap::new();
    let mut groups: Vec<((i64, i64), Vec<&'a str>)> = Vec::new();

    for (point, name) in entries {
        let key = point.grid_key();
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(name);
    }

    groups
}

/// Every pair of axis-aligned segments from different paths that run along
/// the same line and share part of their span.
pub fn detect_segment_overlaps(paths: &[PathDef]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        for other in &paths[i + 1..] {
            for (index, segment) in path.segments.iter().enumerate() {
                for other_segment in &other.segments {
                    let overlaps = if segment.is_horizontal() && other_segment.is_horizontal() {
                        (segment.p1.y - other_segment.p1.y).abs() < COLLINEAR_TOLERANCE
                            && ranges_overlap(
                                segment.x_min(),
                                segment.x_max(),
                                other_segment.x_min(),
                                other_segment.x_max(),
                            )
                    } else if segment.is_vertical() && other_segment.is_vertical() {
                        (segment.p1.x - other_segment.p1.x).abs() < COLLINEAR_TOLERANCE
                            && ranges_overlap(
                                segment.y_min(),
                                segment.y_max(),
                                other_segment.y_min(),
                                other_segment.y_max(),
                            )
                    } else {
                        false
                    };

                    if overlaps {
                        issues.push(Issue::segment_overlap(path, index, segment, other));
                    }
                }
            }
        }
    }

    issues
}

/// Every pair of nodes whose boxes share area. Boxes that only touch along
/// an edge are fine.
pub fn detect_node_overlaps(nodes: &[Node]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        for other in &nodes[i + 1..] {
            if ranges_overlap(node.x_min(), node.x_max(), other.x_min(), other.x_max())
                && ranges_overlap(node.y_min(), node.y_max(), other.y_min(), other.y_max())
            {
                issues.push(Issue::node_overlap(node, other));
            }
        }
    }

    issues
}

// ============================================================================
// TESTS
// ============================================================================
