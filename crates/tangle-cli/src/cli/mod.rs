//! CLI command implementations.
//!
//! - `check` - Run the detection passes and report issues
//! - `inventory` - List the nodes and paths extracted from a diagram

pub mod check;
pub mod common;
pub mod inventory;
pub mod report;

pub use check::cmd_check;
pub use inventory::cmd_inventory;
