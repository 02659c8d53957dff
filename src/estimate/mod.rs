//! Estimation core
//!
//! Rows, the derivation pass, bulk duration, working sets and the
//! consolidation ledger. Nothing here performs I/O; items come in through the
//! `RecordStore` trait and results leave as plain values.

pub mod derive;
pub mod duration;
pub mod ledger;
pub mod row;
pub mod working_set;

pub use derive::{recompute, recompute_all};
pub use duration::BulkDuration;
pub use ledger::{ConsolidationLedger, FinishOutcome, LedgerEntry};
pub use row::{EstimateRow, RowField, RowIdentity};
pub use working_set::{RemoveOutcome, WorkingSet};

use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{GroupId, GroupItem, ItemGroup};

/// Read access to the item catalogue
pub trait RecordStore {
    fn list_groups(&self) -> ManhoursResult<Vec<ItemGroup>>;

    fn list_items(&self, group_id: GroupId) -> ManhoursResult<Vec<GroupItem>>;

    /// Find a group by id ("3", "grp-3") or case-insensitive name
    fn find_group(&self, identifier: &str) -> ManhoursResult<Option<ItemGroup>> {
        let groups = self.list_groups()?;
        if let Ok(id) = identifier.parse::<GroupId>() {
            if let Some(group) = groups.iter().find(|g| g.id == id) {
                return Ok(Some(group.clone()));
            }
        }
        let wanted = identifier.trim().to_lowercase();
        Ok(groups
            .into_iter()
            .find(|g| g.name.to_lowercase() == wanted))
    }
}

/// Open a working set for the named group, seeded from the store's items
pub fn open_working_set(store: &impl RecordStore, group: &str) -> ManhoursResult<WorkingSet> {
    let group = store
        .find_group(group)?
        .ok_or_else(|| ManhoursError::group_not_found(group))?;
    let items = store.list_items(group.id)?;
    tracing::debug!(group = %group.name, items = items.len(), "opening working set");
    Ok(WorkingSet::open(group.name, &items))
}
