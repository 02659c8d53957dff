//! Core data models for manhours-cli
//!
//! This module contains the record-store entities (item groups, group items,
//! manpower items) and the value types shared across the crate.

pub mod group;
pub mod ids;
pub mod manpower;
pub mod money;
pub mod unit;

pub use group::{GroupItem, ItemGroup, ItemValidationError};
pub use ids::{GroupId, ItemId, ManpowerItemId, RowId};
pub use manpower::{ManpowerCategory, ManpowerItem, ManpowerValidationError};
pub use money::Money;
pub use unit::{is_man_hour_unit, UnitCode, HOURS_PER_PERSON_DAY, MAN_HOUR_UNIT};
