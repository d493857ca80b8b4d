//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Find edge crossings and overlaps in rendered flowchart diagrams
#[derive(Parser, Debug)]
#[command(name = "tangle", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the crossing/overlap checks and print a report
    Check(CheckArgs),
    /// List the nodes and paths found in a diagram
    Inventory(InventoryArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// SVG or HTML file to check ('-' reads stdin)
    pub file: String,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Include node and path inventories in the text report
    #[arg(long)]
    pub inventory: bool,

    /// Path to configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit with failure when only warnings are found
    #[arg(long)]
    pub fail_on_warnings: bool,
}

#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// SVG or HTML file to read ('-' reads stdin)
    pub file: String,

    /// Print the inventory as JSON
    #[arg(long)]
    pub json: bool,
}
