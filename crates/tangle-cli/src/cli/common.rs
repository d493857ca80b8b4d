//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};

use log::debug;

use tangle::{Diagram, extract_diagram};

use crate::error::CliError;

/// Read a document from a file, or from stdin when `source` is `-`.
pub fn read_input(source: &str) -> Result<String, CliError> {
    let read_error = |source_err| CliError::Read {
        path: source.to_string(),
        source: source_err,
    };

    if source == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).map_err(read_error)?;
        Ok(content)
    } else {
        fs::read_to_string(source).map_err(read_error)
    }
}

/// Read and extract a diagram in one step.
pub fn load_diagram(source: &str) -> Result<Diagram, CliError> {
    let content = read_input(source)?;
    debug!(source = source, bytes = content.len(); "Read input");
    Ok(extract_diagram(&content)?)
}

/// Display name for an input source.
pub fn source_label(source: &str) -> &str {
    if source == "-" { "<stdin>" } else { source }
}
