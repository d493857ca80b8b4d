//! tangle - find edge crossings and overlaps in rendered diagrams
//!
//! Usage:
//!   tangle check <file> [--json] [--inventory] [--config PATH] [--fail-on-warnings]
//!   tangle inventory <file> [--json]
//!
//! `<file>` is an SVG or an HTML page embedding one; `-` reads stdin.
//!
//! Exit status: 0 when the diagram passes (warnings allowed), 1 when it
//! fails, 2 when the input or configuration could not be read.

mod args;
mod cli;
mod config;
mod error;

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error};

use args::{Cli, Command};
use cli::{cmd_check, cmd_inventory};

/// Exit status for I/O, configuration and markup errors.
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(cli:?; "Parsed arguments");

    let result = match &cli.command {
        Command::Check(args) => cmd_check(args),
        Command::Inventory(args) => cmd_inventory(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!("{err}");
            process::exit(EXIT_ERROR);
        }
    }
}
