//! `tangle check` - run the detection passes over a diagram.

use log::{debug, info};
use serde::Serialize;

use tangle::{Issue, Report, Summary, Verdict};

use super::common::{load_diagram, source_label};
use super::report::render_report;
use crate::args::CheckArgs;
use crate::config::{Config, load_config};
use crate::error::CliError;

/// JSON form of a check run.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    pub file: &'a str,
    pub nodes: usize,
    pub paths: usize,
    pub verdict: Verdict,
    pub summary: Summary,
    pub issues: &'a [Issue],
}

/// Process exit status for a finished run.
pub fn exit_code(report: &Report, fail_on_warnings: bool) -> i32 {
    match report.verdict() {
        Verdict::Fail => 1,
        Verdict::PassWithWarnings if fail_on_warnings => 1,
        Verdict::Pass | Verdict::PassWithWarnings => 0,
    }
}

/// Command-line flags can only switch options on.
fn merge_flags(mut config: Config, args: &CheckArgs) -> Config {
    config.fail_on_warnings |= args.fail_on_warnings;
    config.inventory |= args.inventory;
    config
}

/// Execute the check command, returning the exit status.
pub fn cmd_check(args: &CheckArgs) -> Result<i32, CliError> {
    let config = merge_flags(load_config(args.config.as_deref())?, args);
    debug!(config:?; "Effective configuration");

    let diagram = load_diagram(&args.file)?;
    let report = diagram.analyze(&config.analysis);
    let label = source_label(&args.file);

    info!(
        file = label,
        errors = report.summary().errors,
        warnings = report.summary().warnings;
        "Analysis complete"
    );

    if args.json {
        let output = CheckOutput {
            file: label,
            nodes: diagram.nodes.len(),
            paths: diagram.paths.len(),
            verdict: report.verdict(),
            summary: report.summary(),
            issues: &report.issues,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_report(label, &diagram, &report, config.inventory));
    }

    Ok(exit_code(&report, config.fail_on_warnings))
}
