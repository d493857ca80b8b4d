//! # tangle
//!
//! Crossing, containment and overlap detection for rendered diagrams.
//!
//! Feed it the nodes (boxes) and paths (edges) of a laid-out flowchart and it
//! reports where edges run through boxes, cross each other, share endpoints
//! or run along the same line, and where boxes overlap each other.
//!
//! ```
//! use tangle::{AnalysisConfig, Verdict, extract_diagram};
//!
//! let svg = r#"<svg>
//!   <g class="node"><rect x="0" y="0" width="100" height="50"/><text>A</text></g>
//!   <g class="node"><rect x="200" y="0" width="100" height="50"/><text>B</text></g>
//!   <!-- A -> B -->
//!   <path d="M 100 25 L 200 25"/>
//! </svg>"#;
//!
//! let diagram = extract_diagram(svg).unwrap();
//! let report = diagram.analyze(&AnalysisConfig::default());
//! assert_eq!(report.verdict(), Verdict::Pass);
//! ```

pub mod detect;
pub mod extract;
pub mod geometry;
pub mod intersect;
pub mod issue;
pub mod path;

// Re-export common types at crate root for convenience.
pub use detect::{
    AnalysisConfig, analyze, detect_node_crossings, detect_node_overlaps,
    detect_path_intersections, detect_segment_overlaps, detect_shared_endpoints,
};
pub use extract::{Diagram, ExtractError, extract_diagram, extract_svg};
pub use geometry::{Node, Orientation, Point, Segment};
pub use intersect::{SegmentPosition, ranges_overlap, segment_crosses_node, segment_intersection, segments_intersect};
pub use issue::{Issue, IssueKind, Report, Severity, Summary, Verdict};
pub use path::{PathDef, parse_path_data, points_to_segments};
