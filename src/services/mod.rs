//! Service layer for manhours-cli
//!
//! Business logic on top of the storage layer: validation, uniqueness,
//! audit logging, and the estimating session workflow.

pub mod estimate;
pub mod group;
pub mod manpower;

pub use estimate::{EstimateService, Finished, Opened};
pub use group::{GroupService, GroupWithItems, ItemInput, ItemUpdate};
pub use manpower::{ManpowerRecord, ManpowerService};
