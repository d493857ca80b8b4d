//! Plain-text rendering of inventories and reports.

use tangle::{Diagram, IssueKind, Node, PathDef, Report, Severity, Verdict};

const RULE_WIDTH: usize = 70;

/// How much of a path's `d` attribute the inventory shows.
const DEFINITION_PREVIEW: usize = 60;

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    out.push_str(&format!("{rule}\n{title}\n{rule}\n"));
}

/// Node table, sorted top to bottom then left to right.
pub fn render_node_inventory(nodes: &[Node]) -> String {
    let mut out = String::from("\n");
    banner(&mut out, "NODE INVENTORY");
    out.push_str(&format!(
        "{:<25} {:>8} {:>8} {:>8} {:>8}\n",
        "Node Name", "x-min", "x-max", "y-min", "y-max"
    ));
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));

    let mut sorted: Vec<&Node> = nodes.iter().collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    for node in sorted {
        out.push_str(&format!(
            "{:<25} {:>8.0} {:>8.0} {:>8.0} {:>8.0}\n",
            node.name,
            node.x_min(),
            node.x_max(),
            node.y_min(),
            node.y_max()
        ));
    }
    out
}

/// Every path with its `d` preview and numbered segments.
pub fn render_path_inventory(paths: &[PathDef]) -> String {
    let mut out = String::from("\n");
    banner(&mut out, "PATH INVENTORY");

    for path in paths {
        let preview: String = path.definition.chars().take(DEFINITION_PREVIEW).collect();
        let ellipsis = if path.definition.chars().count() > DEFINITION_PREVIEW {
            "..."
        } else {
            ""
        };

        out.push_str(&format!("\n{}\n", path.name));
        out.push_str(&format!("  d=\"{preview}{ellipsis}\"\n"));
        out.push_str(&format!("  Segments ({}):\n", path.segments.len()));
        for (i, segment) in path.segments.iter().enumerate() {
            out.push_str(&format!("    {}. {}\n", i + 1, segment));
        }
    }
    out
}

pub fn render_inventory(diagram: &Diagram) -> String {
    let mut out = render_node_inventory(&diagram.nodes);
    out.push_str(&render_path_inventory(&diagram.paths));
    out
}

/// Issue counts per detection pass.
fn render_pass_counts(report: &Report) -> String {
    let count = |kinds: &[IssueKind]| report.issues.iter().filter(|i| kinds.contains(&i.kind)).count();

    let mut out = String::from("\nDetection results:\n");
    out.push_str(&format!(
        "  - Node-path crossings: {} issues\n",
        count(&[IssueKind::NodeCrossing])
    ));
    out.push_str(&format!(
        "  - Path-path intersections: {} issues\n",
        count(&[IssueKind::PathIntersection])
    ));
    out.push_str(&format!(
        "  - Shared endpoints: {} issues\n",
        count(&[IssueKind::SharedStart, IssueKind::SharedEnd])
    ));
    out.push_str(&format!(
        "  - Overlapping segments: {} issues\n",
        count(&[IssueKind::SegmentOverlap])
    ));
    out.push_str(&format!(
        "  - Node overlaps: {} issues\n",
        count(&[IssueKind::NodeOverlap])
    ));
    out
}

/// Issues grouped by severity, errors first.
pub fn render_issues(report: &Report) -> String {
    let mut out = String::from("\n");
    banner(&mut out, "DETECTED ISSUES");

    if report.is_empty() {
        out.push_str("\nNo issues detected. Diagram has a clean layout.\n\n");
        return out;
    }

    let summary = report.summary();

    if summary.errors > 0 {
        out.push_str(&format!("\nERRORS ({}):\n{}\n", summary.errors, "-".repeat(50)));
        for issue in report.with_severity(Severity::Error) {
            if issue.kind == IssueKind::NodeOverlap {
                // No path involved; the first node is the subject
                let node = issue.node_name.as_deref().unwrap_or_default();
                out.push_str(&format!("  * [{}] {}\n", issue.kind, node));
                if let Some(other) = &issue.other_node_name {
                    out.push_str(&format!("    -> Overlaps: {other}\n"));
                }
            } else {
                out.push_str(&format!("  * [{}] {}\n", issue.kind, issue.path_name));
                if let Some(node) = &issue.node_name {
                    out.push_str(&format!("    -> Crosses: {node}\n"));
                }
            }
            if let Some(other) = &issue.other_path_name {
                out.push_str(&format!("    -> With: {other}\n"));
            }
            out.push_str(&format!("    {}\n\n", issue.description));
        }
    }

    if summary.warnings > 0 {
        out.push_str(&format!("\nWARNINGS ({}):\n{}\n", summary.warnings, "-".repeat(50)));
        for issue in report.with_severity(Severity::Warning) {
            out.push_str(&format!("  * [{}] {}\n\n", issue.kind, issue.description));
        }
    }

    if summary.infos > 0 {
        out.push_str(&format!("\nINFO ({}):\n{}\n", summary.infos, "-".repeat(50)));
        for issue in report.with_severity(Severity::Info) {
            out.push_str(&format!("  * {}\n\n", issue.description));
        }
    }

    out
}

/// One-line outcome.
pub fn verdict_line(report: &Report) -> String {
    let summary = report.summary();
    match report.verdict() {
        Verdict::Pass => "PASS - No crossing issues detected".to_string(),
        Verdict::PassWithWarnings => {
            format!("WARNINGS - {} warnings, no blocking errors", summary.warnings)
        }
        Verdict::Fail => format!("FAIL - {} errors, {} warnings", summary.errors, summary.warnings),
    }
}

/// The full text report for `check`.
pub fn render_report(source: &str, diagram: &Diagram, report: &Report, inventory: bool) -> String {
    let mut out = String::new();
    banner(&mut out, "DIAGRAM CROSSING DETECTION REPORT");
    out.push_str(&format!("File: {source}\n"));
    out.push_str(&format!("Nodes found: {}\n", diagram.nodes.len()));
    out.push_str(&format!("Paths found: {}\n", diagram.paths.len()));

    if inventory {
        out.push_str(&render_inventory(diagram));
    }

    out.push_str(&render_pass_counts(report));
    out.push_str(&render_issues(report));

    banner(&mut out, "SUMMARY");
    out.push_str(&verdict_line(report));
    out.push('\n');
    out
}
