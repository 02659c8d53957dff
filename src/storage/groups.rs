//! ItemGroup and GroupItem repository for JSON storage
//!
//! Manages loading and saving groups and their items to groups.json

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{GroupId, GroupItem, ItemGroup, ItemId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable contents of groups.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupData {
    #[serde(default)]
    pub next_group_id: i64,
    #[serde(default)]
    pub next_item_id: i64,
    pub groups: Vec<ItemGroup>,
    pub items: Vec<GroupItem>,
}

#[derive(Default)]
struct GroupTables {
    next_group_id: i64,
    next_item_id: i64,
    groups: BTreeMap<GroupId, ItemGroup>,
    items: BTreeMap<ItemId, GroupItem>,
}

/// Repository for group and item persistence
pub struct GroupRepository {
    path: PathBuf,
    tables: RwLock<GroupTables>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            tables: RwLock::new(GroupTables::default()),
        }
    }

    fn read(&self) -> ManhoursResult<RwLockReadGuard<'_, GroupTables>> {
        self.tables
            .read()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> ManhoursResult<RwLockWriteGuard<'_, GroupTables>> {
        self.tables
            .write()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load groups and items from disk
    pub fn load(&self) -> ManhoursResult<()> {
        let file_data: GroupData = read_json(&self.path)?;
        let mut tables = self.write()?;

        tables.groups = file_data.groups.into_iter().map(|g| (g.id, g)).collect();
        tables.items = file_data.items.into_iter().map(|i| (i.id, i)).collect();

        // Counters never fall behind the highest stored id
        let max_group = tables.groups.keys().last().map_or(0, |id| id.value());
        let max_item = tables.items.keys().last().map_or(0, |id| id.value());
        tables.next_group_id = file_data.next_group_id.max(max_group + 1);
        tables.next_item_id = file_data.next_item_id.max(max_item + 1);

        Ok(())
    }

    /// Save groups and items to disk
    pub fn save(&self) -> ManhoursResult<()> {
        let tables = self.read()?;
        let file_data = GroupData {
            next_group_id: tables.next_group_id,
            next_item_id: tables.next_item_id,
            groups: tables.groups.values().cloned().collect(),
            items: tables.items.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    // Group operations

    /// Reserve the next serial group id
    pub fn next_group_id(&self) -> ManhoursResult<GroupId> {
        let mut tables = self.write()?;
        let id = tables.next_group_id.max(1);
        tables.next_group_id = id + 1;
        Ok(GroupId::new(id))
    }

    pub fn get_group(&self, id: GroupId) -> ManhoursResult<Option<ItemGroup>> {
        Ok(self.read()?.groups.get(&id).cloned())
    }

    /// All groups ordered by id
    pub fn get_all_groups(&self) -> ManhoursResult<Vec<ItemGroup>> {
        Ok(self.read()?.groups.values().cloned().collect())
    }

    /// Case-insensitive name lookup
    pub fn get_group_by_name(&self, name: &str) -> ManhoursResult<Option<ItemGroup>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .read()?
            .groups
            .values()
            .find(|g| g.name.to_lowercase() == wanted)
            .cloned())
    }

    pub fn upsert_group(&self, group: ItemGroup) -> ManhoursResult<()> {
        self.write()?.groups.insert(group.id, group);
        Ok(())
    }

    /// Delete a group together with its items
    pub fn delete_group(
        &self,
        id: GroupId,
    ) -> ManhoursResult<Option<(ItemGroup, Vec<GroupItem>)>> {
        let mut tables = self.write()?;
        let Some(group) = tables.groups.remove(&id) else {
            return Ok(None);
        };

        let item_ids: Vec<ItemId> = tables
            .items
            .values()
            .filter(|i| i.group_id == id)
            .map(|i| i.id)
            .collect();
        let removed = item_ids
            .iter()
            .filter_map(|item_id| tables.items.remove(item_id))
            .collect();

        Ok(Some((group, removed)))
    }

    pub fn group_count(&self) -> ManhoursResult<usize> {
        Ok(self.read()?.groups.len())
    }

    // Item operations

    /// Reserve the next serial item id
    pub fn next_item_id(&self) -> ManhoursResult<ItemId> {
        let mut tables = self.write()?;
        let id = tables.next_item_id.max(1);
        tables.next_item_id = id + 1;
        Ok(ItemId::new(id))
    }

    pub fn get_item(&self, id: ItemId) -> ManhoursResult<Option<GroupItem>> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    /// Items of one group ordered by id
    pub fn get_items_in_group(&self, group_id: GroupId) -> ManhoursResult<Vec<GroupItem>> {
        Ok(self
            .read()?
            .items
            .values()
            .filter(|i| i.group_id == group_id)
            .cloned()
            .collect())
    }

    pub fn get_all_items(&self) -> ManhoursResult<Vec<GroupItem>> {
        Ok(self.read()?.items.values().cloned().collect())
    }

    pub fn upsert_item(&self, item: GroupItem) -> ManhoursResult<()> {
        self.write()?.items.insert(item.id, item);
        Ok(())
    }

    pub fn delete_item(&self, id: ItemId) -> ManhoursResult<Option<GroupItem>> {
        Ok(self.write()?.items.remove(&id))
    }
}
