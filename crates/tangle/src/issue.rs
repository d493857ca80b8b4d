//! Findings produced by the detection passes.
//!
//! Every pass returns its own `Vec<Issue>`; [`Report`] is just the
//! concatenation plus the counts a caller needs to pick an exit status.

use std::fmt;

use serde::Serialize;

use crate::geometry::{Node, Point, Segment};
use crate::intersect::Intersection;
use crate::path::PathDef;

/// How bad a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// What kind of layout defect was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A segment passes through a node's body.
    NodeCrossing,
    /// Segments of two different paths cross.
    PathIntersection,
    /// Several paths leave from the same point.
    SharedStart,
    /// Several paths arrive at the same point.
    SharedEnd,
    /// Two paths run along the same line.
    SegmentOverlap,
    /// Two node boxes overlap.
    NodeOverlap,
}

impl IssueKind {
    /// Severity is fixed per kind.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::NodeCrossing | IssueKind::PathIntersection | IssueKind::NodeOverlap => {
                Severity::Error
            }
            IssueKind::SegmentOverlap | IssueKind::SharedStart => Severity::Warning,
            IssueKind::SharedEnd => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::NodeCrossing => "node_crossing",
            IssueKind::PathIntersection => "path_intersection",
            IssueKind::SharedStart => "shared_start",
            IssueKind::SharedEnd => "shared_end",
            IssueKind::SegmentOverlap => "segment_overlap",
            IssueKind::NodeOverlap => "node_overlap",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(rename = "issue_type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub description: String,
    /// Empty for node overlaps, which involve no path.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_path_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_node_name: Option<String>,
    /// Crossing point, or the shared point for endpoint groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
}

impl Issue {
    fn new(kind: IssueKind, path_name: &str, description: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            description,
            path_name: path_name.to_string(),
            segment_index: None,
            node_name: None,
            other_path_name: None,
            other_node_name: None,
            location: None,
        }
    }

    pub fn node_crossing(path: &PathDef, index: usize, segment: &Segment, node: &Node) -> Self {
        Self {
            segment_index: Some(index),
            node_name: Some(node.name.clone()),
            ..Self::new(
                IssueKind::NodeCrossing,
                &path.name,
                format!("Segment {} ({}) passes through node", index + 1, segment),
            )
        }
    }

    pub fn path_intersection(
        path: &PathDef,
        index: usize,
        other: &PathDef,
        other_index: usize,
        hit: &Intersection,
    ) -> Self {
        Self {
            segment_index: Some(index),
            other_path_name: Some(other.name.clone()),
            location: Some(hit.point),
            ..Self::new(
                IssueKind::PathIntersection,
                &path.name,
                format!(
                    "Segment {} intersects with {} segment {} at ({:.1}, {:.1}) [t={:.3}, u={:.3}]",
                    index + 1,
                    other.name,
                    other_index + 1,
                    hit.point.x,
                    hit.point.y,
                    hit.t,
                    hit.u
                ),
            )
        }
    }

    /// One issue per endpoint group; `names` has at least two members.
    pub fn shared_endpoint(kind: IssueKind, key: (i64, i64), names: &[&str]) -> Self {
        let which = match kind {
            IssueKind::SharedEnd => "end",
            _ => "start",
        };
        Self {
            other_path_name: names.get(1).map(|n| n.to_string()),
            location: Some(Point::new(key.0 as f64, key.1 as f64)),
            ..Self::new(
                kind,
                names.first().copied().unwrap_or_default(),
                format!(
                    "Multiple paths share {} point at ({}, {}): {}",
                    which,
                    key.0,
                    key.1,
                    names.join(", ")
                ),
            )
        }
    }

    pub fn segment_overlap(path: &PathDef, index: usize, segment: &Segment, other: &PathDef) -> Self {
        let description = if segment.is_horizontal() {
            format!("Horizontal segments overlap at y={}", segment.p1.y)
        } else {
            format!("Vertical segments overlap at x={}", segment.p1.x)
        };
        Self {
            segment_index: Some(index),
            other_path_name: Some(other.name.clone()),
            ..Self::new(IssueKind::SegmentOverlap, &path.name, description)
        }
    }

    /// `node` and `other` must overlap; the description gives the shared box.
    pub fn node_overlap(node: &Node, other: &Node) -> Self {
        let description = format!(
            "Nodes {} and {} overlap in x:{}-{}, y:{}-{}",
            node.name,
            other.name,
            node.x_min().max(other.x_min()),
            node.x_max().min(other.x_max()),
            node.y_min().max(other.y_min()),
            node.y_max().min(other.y_max())
        );
        Self {
            node_name: Some(node.name.clone()),
            other_node_name: Some(other.name.clone()),
            ..Self::new(IssueKind::NodeOverlap, "", description)
        }
    }
}

/// Run-level outcome, from which callers derive an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No errors and no warnings (info findings allowed).
    Pass,
    /// No errors, at least one warning.
    PassWithWarnings,
    /// At least one error.
    Fail,
}

/// Issue counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// All findings of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn summary(&self) -> Summary {
        self.issues.iter().fold(Summary::default(), |mut acc, issue| {
            match issue.severity {
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
                Severity::Info => acc.infos += 1,
            }
            acc
        })
    }

    pub fn verdict(&self) -> Verdict {
        let summary = self.summary();
        if summary.errors > 0 {
            Verdict::Fail
        } else if summary.warnings > 0 {
            Verdict::PassWithWarnings
        } else {
            Verdict::Pass
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Issues of one severity, in detection order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
