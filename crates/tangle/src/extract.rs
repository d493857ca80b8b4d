//! Pull nodes and paths out of SVG (or HTML embedding SVG) markup.
//!
//! The document is streamed once with quick-xml; no tree is built. The scan
//! records every candidate it sees (node groups, large rectangles, paths and
//! the comment right before each path), then node strategies are tried in
//! order until one yields something.
//!
//! Nothing here resolves CSS, transforms or `<use>` references: coordinates
//! are taken as written, which is how diagram generators emit them.

use log::{debug, trace};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;
use thiserror::Error;

use crate::detect::{AnalysisConfig, analyze};
use crate::geometry::Node;
use crate::issue::Report;
use crate::path::PathDef;

/// Comment names longer than this are cut.
pub const MAX_PATH_NAME_CHARS: usize = 50;

/// Rectangles must be wider than this to count as nodes on their own.
pub const MIN_NODE_WIDTH: f64 = 50.0;

/// Rectangles must be taller than this to count as nodes on their own.
pub const MIN_NODE_HEIGHT: f64 = 20.0;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },
}

/// Everything the engine needs from one diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub paths: Vec<PathDef>,
}

impl Diagram {
    /// Run the detection passes over this diagram.
    pub fn analyze(&self, config: &AnalysisConfig) -> Report {
        analyze(&self.nodes, &self.paths, config)
    }
}

/// The `<svg …>…</svg>` slice of a document, or the whole document when
/// there is none (plain SVG without a closing tag is left for the parser).
pub fn extract_svg(document: &str) -> &str {
    let Some(start) = document.find("<svg") else {
        return document;
    };
    match document[start..].find("</svg>") {
        Some(end) => &document[start..start + end + "</svg>".len()],
        None => document,
    }
}

/// Extract nodes and paths from an SVG or HTML document.
pub fn extract_diagram(document: &str) -> Result<Diagram, ExtractError> {
    let scan = Scan::run(extract_svg(document))?;

    let nodes = NODE_STRATEGIES
        .iter()
        .find_map(|strategy| {
            let nodes = strategy.select(&scan);
            if nodes.is_empty() {
                None
            } else {
                debug!(strategy = strategy.name(), nodes = nodes.len(); "Selected node strategy");
                Some(nodes)
            }
        })
        .unwrap_or_default();

    let paths = scan.into_paths();
    debug!(nodes = nodes.len(), paths = paths.len(); "Extracted diagram");

    Ok(Diagram { nodes, paths })
}

// ============================================================================
// NODE STRATEGIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStrategy {
    /// `<g class="node…">` groups with a rect and a label.
    NodeGroups,
    /// Any rectangle big enough to be a box.
    LargeRects,
}

const NODE_STRATEGIES: [NodeStrategy; 2] = [NodeStrategy::NodeGroups, NodeStrategy::LargeRects];

impl NodeStrategy {
    fn name(self) -> &'static str {
        match self {
            NodeStrategy::NodeGroups => "node-groups",
            NodeStrategy::LargeRects => "large-rects",
        }
    }

    fn select(self, scan: &Scan) -> Vec<Node> {
        match self {
            NodeStrategy::NodeGroups => scan.group_nodes.clone(),
            NodeStrategy::LargeRects => scan
                .rects
                .iter()
                .filter(|r| r.width > MIN_NODE_WIDTH && r.height > MIN_NODE_HEIGHT)
                .enumerate()
                .map(|(i, r)| Node::new(format!("Node {}", i + 1), r.x, r.y, r.width, r.height))
                .collect(),
        }
    }
}

// ============================================================================
// DOCUMENT SCAN
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// A `<g class="node…">` being read.
#[derive(Debug, Default)]
struct OpenGroup {
    /// Element depth of the group itself.
    depth: usize,
    rect: Option<Rect>,
    label: Option<String>,
    /// Text collected from the `<text>` element currently open, if any.
    text: Option<String>,
}

#[derive(Debug)]
struct RawPath {
    comment: Option<String>,
    definition: String,
}

#[derive(Debug, Default)]
struct Scan {
    group_nodes: Vec<Node>,
    rects: Vec<Rect>,
    paths: Vec<RawPath>,
    depth: usize,
    defs_depth: usize,
    group: Option<OpenGroup>,
    pending_comment: Option<String>,
}

impl Scan {
    fn run(svg: &str) -> Result<Self, ExtractError> {
        let mut reader = Reader::from_str(svg);
        reader.config_mut().trim_text(true);

        let mut scan = Scan::default();
        let mut buf = Vec::new();

        loop {
            // A comment names the path only if nothing else comes in between
            let is_comment = match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    scan.start_element(e, false);
                    false
                }
                Ok(Event::Empty(ref e)) => {
                    scan.start_element(e, true);
                    false
                }
                Ok(Event::End(ref e)) => {
                    let name = e.local_name();
                    scan.end_element(name.as_ref());
                    false
                }
                Ok(Event::Text(ref e)) => {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(_) => String::from_utf8_lossy(e).into_owned(),
                    };
                    scan.text(&text);
                    false
                }
                Ok(Event::Comment(ref e)) => {
                    scan.comment(&String::from_utf8_lossy(e));
                    true
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ExtractError::Xml {
                        position: reader.error_position(),
                        message: e.to_string(),
                    });
                }
                _ => false,
            };

            if !is_comment {
                scan.pending_comment = None;
            }
            buf.clear();
        }

        Ok(scan)
    }

    fn comment(&mut self, comment: &str) {
        let comment = comment.trim();
        self.pending_comment = if comment.is_empty() {
            None
        } else {
            Some(comment.chars().take(MAX_PATH_NAME_CHARS).collect())
        };
    }

    fn in_defs(&self) -> bool {
        self.defs_depth > 0
    }

    fn start_element(&mut self, e: &BytesStart, is_empty: bool) {
        let local = e.local_name();
        let name = std::str::from_utf8(local.as_ref()).unwrap_or("");

        if !is_empty {
            self.depth += 1;
        }

        match name {
            "defs" if !is_empty => self.defs_depth += 1,
            _ if self.in_defs() => {}
            "g" if !is_empty && self.group.is_none() && is_node_group(e) => {
                self.group = Some(OpenGroup {
                    depth: self.depth,
                    ..OpenGroup::default()
                });
            }
            "rect" => {
                if let Some(rect) = parse_rect(e) {
                    if let Some(group) = self.group.as_mut() {
                        group.rect.get_or_insert(rect);
                    }
                    self.rects.push(rect);
                }
            }
            "text" if !is_empty => {
                if let Some(group) = self.group.as_mut() {
                    if group.label.is_none() {
                        group.text = Some(String::new());
                    }
                }
            }
            "path" => {
                let comment = self.pending_comment.take();
                if let Some(definition) = attribute(e, b"d") {
                    self.paths.push(RawPath { comment, definition });
                }
            }
            _ => {}
        }
    }

    fn end_element(&mut self, name: &[u8]) {
        match name {
            b"defs" if self.in_defs() => self.defs_depth -= 1,
            b"text" => {
                if let Some(group) = self.group.as_mut() {
                    if let Some(text) = group.text.take() {
                        let label = clean_label(&text);
                        if !label.is_empty() {
                            group.label = Some(label);
                        }
                    }
                }
            }
            b"g" if self.group.as_ref().is_some_and(|g| g.depth == self.depth) => {
                if let Some(group) = self.group.take() {
                    self.finish_group(group);
                }
            }
            _ => {}
        }

        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        if let Some(buffer) = self.group.as_mut().and_then(|g| g.text.as_mut()) {
            buffer.push_str(text);
        }
    }

    fn finish_group(&mut self, group: OpenGroup) {
        let Some(rect) = group.rect else {
            trace!("Node group without a usable rect");
            return;
        };
        let name = group.label.unwrap_or_else(|| "Unknown".to_string());
        self.group_nodes
            .push(Node::new(name, rect.x, rect.y, rect.width, rect.height));
    }

    /// Parse every collected path, naming the uncommented ones by shape.
    ///
    /// An uncommented path that repeats a commented path's `d` is the same
    /// edge drawn twice (a hit area or a highlight) and is dropped.
    fn into_paths(self) -> Vec<PathDef> {
        let commented: Vec<&str> = self
            .paths
            .iter()
            .filter(|p| p.comment.is_some())
            .map(|p| p.definition.as_str())
            .collect();

        let mut paths = Vec::new();
        for raw in &self.paths {
            match &raw.comment {
                Some(comment) => {
                    let path = PathDef::new(comment.as_str(), raw.definition.as_str());
                    if !path.is_empty() {
                        paths.push(path);
                    }
                }
                None if commented.contains(&raw.definition.as_str()) => {
                    trace!(definition = raw.definition.as_str(); "Skipping duplicate path");
                }
                None => {
                    let mut path = PathDef::new("", raw.definition.as_str());
                    if let (Some(start), Some(end)) = (path.start_point(), path.end_point()) {
                        path.name = format!("Path({},{})->({},{})", start.x, start.y, end.x, end.y);
                        paths.push(path);
                    }
                }
            }
        }

        paths
    }
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

fn is_node_group(e: &BytesStart) -> bool {
    attribute(e, b"class").is_some_and(|class| class.starts_with("node"))
}

/// A rect with finite numeric `x`, `y`, `width` and `height`.
fn parse_rect(e: &BytesStart) -> Option<Rect> {
    let number = |key: &[u8]| {
        attribute(e, key)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    };
    Some(Rect {
        x: number(b"x")?,
        y: number(b"y")?,
        width: number(b"width")?,
        height: number(b"height")?,
    })
}

/// Drop leading emoji and punctuation from a node label.
fn clean_label(text: &str) -> String {
    text.trim()
        .trim_start_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
        .trim()
        .to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::issue::Verdict;

    const FLOW: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 100">
  <defs>
    <marker id="arrow"><path d="M 0 0 L 10 5 L 0 10 Z"/></marker>
  </defs>
  <g class="node build">
    <rect x="0" y="0" width="100" height="50" rx="4"/>
    <text x="50" y="25">🔨 Build</text>
  </g>
  <g class="node-deploy">
    <rect width="100" height="50" x="200" y="0"/>
    <text x="250" y="25">Deploy</text>
  </g>
  <!-- Build -> Deploy -->
  <path d="M 100 25 L 200 25" stroke="black" marker-end="url(#arrow)"/>
</svg>"#;

    #[test]
    fn extracts_node_groups_and_commented_paths() {
        let diagram = extract_diagram(FLOW).unwrap();

        assert_eq!(
            diagram.nodes,
            vec![
                Node::new("Build", 0.0, 0.0, 100.0, 50.0),
                Node::new("Deploy", 200.0, 0.0, 100.0, 50.0),
            ]
        );
        assert_eq!(diagram.paths.len(), 1);
        assert_eq!(diagram.paths[0].name, "Build -> Deploy");
        assert_eq!(diagram.paths[0].segments.len(), 1);
        assert_eq!(diagram.analyze(&AnalysisConfig::default()).verdict(), Verdict::Pass);
    }

    #[test]
    fn html_page_is_reduced_to_its_svg() {
        let page = format!("<!DOCTYPE html><html><body><h1>Flow</h1>{FLOW}<br></body></html>");
        let slice = extract_svg(&page);
        assert!(slice.starts_with("<svg"));
        assert!(slice.ends_with("</svg>"));

        let diagram = extract_diagram(&page).unwrap();
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.paths.len(), 1);
    }

    #[test]
    fn document_without_svg_is_used_as_is() {
        let doc = r#"<g><path d="M 0 0 L 10 0"/></g>"#;
        assert_eq!(extract_svg(doc), doc);
        assert_eq!(extract_diagram(doc).unwrap().paths.len(), 1);
    }

    #[test]
    fn uncommented_paths_are_named_by_shape() {
        let svg = r#"<svg><path d="M 0 0 L 10 0 L 10 20.5"/></svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        assert_eq!(diagram.paths[0].name, "Path(0,0)->(10,20.5)");
    }

    #[test]
    fn duplicate_of_commented_path_is_skipped() {
        let svg = r#"<svg>
  <path d="M 0 0 L 50 0" stroke="transparent" stroke-width="10"/>
  <!-- A -> B -->
  <path d="M 0 0 L 50 0"/>
  <path d="M 0 10 L 50 10"/>
</svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        let names: Vec<_> = diagram.paths.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A -> B", "Path(0,10)->(50,10)"]);
    }

    #[test]
    fn comment_only_names_the_next_element() {
        let svg = r#"<svg>
  <!-- label for a circle -->
  <circle cx="5" cy="5" r="2"/>
  <path d="M 0 0 L 50 0"/>
</svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        assert_eq!(diagram.paths[0].name, "Path(0,0)->(50,0)");
    }

    #[test]
    fn long_comments_are_truncated() {
        let long = "x".repeat(80);
        let svg = format!("<svg><!-- {long} --><path d=\"M 0 0 L 1 1\"/></svg>");
        let diagram = extract_diagram(&svg).unwrap();
        assert_eq!(diagram.paths[0].name.chars().count(), MAX_PATH_NAME_CHARS);
    }

    #[test]
    fn paths_without_segments_are_dropped() {
        let svg = r#"<svg><!-- dot --><path d="M 5 5"/><path d=""/><path fill="red"/></svg>"#;
        assert!(extract_diagram(svg).unwrap().paths.is_empty());
    }

    #[test]
    fn defs_content_is_ignored() {
        let svg = r#"<svg>
  <defs>
    <g class="node"><rect x="0" y="0" width="100" height="50"/><text>Hidden</text></g>
    <path d="M 0 0 L 100 100"/>
  </defs>
  <rect x="10" y="10" width="5" height="5"/>
</svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        assert!(diagram.nodes.is_empty());
        assert!(diagram.paths.is_empty());
    }

    #[test]
    fn large_rects_are_used_when_there_are_no_node_groups() {
        let svg = r#"<svg>
  <rect x="0" y="0" width="400" height="300" fill="white"/>
  <rect x="10" y="10" width="40" height="40"/>
  <rect x="60" y="10" width="120" height="40"/>
</svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        assert_eq!(
            diagram.nodes,
            vec![
                Node::new("Node 1", 0.0, 0.0, 400.0, 300.0),
                Node::new("Node 2", 60.0, 10.0, 120.0, 40.0),
            ]
        );
    }

    #[test]
    fn node_group_rules() {
        let svg = r#"<svg>
  <g class="node"><rect x="0" y="0" width="10" height="10"/></g>
  <g class="node"><rect x="a" y="0" width="10" height="10"/><text>Broken</text></g>
  <g class="node">
    <g transform="translate(0,0)"><text>  -- Nested  </text></g>
    <rect x="20" y="0" width="10" height="10"/>
    <rect x="99" y="99" width="10" height="10"/>
  </g>
  <g class="cluster"><rect x="0" y="0" width="500" height="500"/></g>
</svg>"#;
        let diagram = extract_diagram(svg).unwrap();
        assert_eq!(
            diagram.nodes,
            vec![
                Node::new("Unknown", 0.0, 0.0, 10.0, 10.0),
                Node::new("Nested", 20.0, 0.0, 10.0, 10.0),
            ]
        );
    }

    #[test]
    fn text_entities_are_unescaped() {
        let svg = r#"<svg><g class="node"><rect x="0" y="0" width="9" height="9"/><text>R&amp;D</text></g></svg>"#;
        assert_eq!(extract_diagram(svg).unwrap().nodes[0].name, "R&D");
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let err = extract_diagram("<svg><g></svg>").unwrap_err();
        assert!(matches!(err, ExtractError::Xml { .. }));
        assert!(err.to_string().starts_with("XML parse error"));
    }

    #[test]
    fn empty_document_is_an_empty_diagram() {
        let diagram = extract_diagram("").unwrap();
        assert_eq!(diagram, Diagram::default());
    }

    #[test]
    fn extracted_path_endpoints() {
        let svg = r#"<svg><!-- e --><path d="M 10 20 H 50 V 80"/></svg>"#;
        let path = &extract_diagram(svg).unwrap().paths[0];
        assert_eq!(path.start_point(), Some(Point::new(10.0, 20.0)));
        assert_eq!(path.end_point(), Some(Point::new(50.0, 80.0)));
    }
}
