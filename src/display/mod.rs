//! Display formatting for terminal output
//!
//! Tables for groups, items, the manpower catalogue, working sets, the
//! ledger and extracted MTO rows.

pub mod estimate;
pub mod extract;
pub mod group;
pub mod manpower;

pub use estimate::{format_ledger, format_row, format_working_set};
pub use extract::format_extraction;
pub use group::{format_group_details, format_group_list, format_item_table};
pub use manpower::{format_manpower_catalogue, format_manpower_selection};
