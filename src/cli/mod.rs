//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod estimate;
pub mod extract;
pub mod group;
pub mod item;
pub mod manpower;

pub use estimate::{handle_estimate_command, EstimateCommands};
pub use extract::{handle_extract, handle_extract_status};
pub use group::{handle_group_command, GroupCommands};
pub use item::{handle_item_command, ItemCommands};
pub use manpower::{handle_manpower_command, ManpowerCommands};
