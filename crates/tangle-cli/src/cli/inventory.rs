//! `tangle inventory` - list what was extracted from a diagram.

use super::common::load_diagram;
use super::report::render_inventory;
use crate::args::InventoryArgs;
use crate::error::CliError;

/// Execute the inventory command.
pub fn cmd_inventory(args: &InventoryArgs) -> Result<i32, CliError> {
    let diagram = load_diagram(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagram)?);
    } else {
        print!("{}", render_inventory(&diagram));
    }

    Ok(0)
}
