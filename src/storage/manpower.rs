//! Manpower catalogue repository, stored in manpower.json

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{ManpowerItem, ManpowerItemId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ManpowerData {
    #[serde(default)]
    next_id: i64,
    items: Vec<ManpowerItem>,
}

#[derive(Default)]
struct ManpowerTable {
    next_id: i64,
    items: BTreeMap<ManpowerItemId, ManpowerItem>,
}

/// Repository for manpower item persistence
pub struct ManpowerRepository {
    path: PathBuf,
    table: RwLock<ManpowerTable>,
}

impl ManpowerRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(ManpowerTable::default()),
        }
    }

    pub fn load(&self) -> ManhoursResult<()> {
        let file_data: ManpowerData = read_json(&self.path)?;
        let mut table = self
            .table
            .write()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        table.items = file_data.items.into_iter().map(|i| (i.id, i)).collect();
        let max_id = table.items.keys().last().map_or(0, |id| id.value());
        table.next_id = file_data.next_id.max(max_id + 1);
        Ok(())
    }

    pub fn save(&self) -> ManhoursResult<()> {
        let table = self
            .table
            .read()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = ManpowerData {
            next_id: table.next_id,
            items: table.items.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Reserve the next serial id
    pub fn next_id(&self) -> ManhoursResult<ManpowerItemId> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let id = table.next_id.max(1);
        table.next_id = id + 1;
        Ok(ManpowerItemId::new(id))
    }

    pub fn get(&self, id: ManpowerItemId) -> ManhoursResult<Option<ManpowerItem>> {
        let table = self
            .table
            .read()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(table.items.get(&id).cloned())
    }

    /// All items ordered by id
    pub fn get_all(&self) -> ManhoursResult<Vec<ManpowerItem>> {
        let table = self
            .table
            .read()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(table.items.values().cloned().collect())
    }

    pub fn upsert(&self, item: ManpowerItem) -> ManhoursResult<()> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        table.items.insert(item.id, item);
        Ok(())
    }

    pub fn delete(&self, id: ManpowerItemId) -> ManhoursResult<Option<ManpowerItem>> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(table.items.remove(&id))
    }

    pub fn count(&self) -> ManhoursResult<usize> {
        let table = self
            .table
            .read()
            .map_err(|e| ManhoursError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(table.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manpower.json");
        let repo = ManpowerRepository::new(path.clone());

        for (code, desc) in [("WLD-01", "Welder"), ("RIG-01", "Rigger")] {
            let item = ManpowerItem::new(
                repo.next_id().unwrap(),
                code,
                desc,
                "Mechanical",
                Money::from_cents(4500),
            );
            repo.upsert(item).unwrap();
        }
        repo.save().unwrap();

        let reloaded = ManpowerRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
        assert_eq!(
            reloaded.get(ManpowerItemId::new(2)).unwrap().unwrap().code,
            "RIG-01"
        );
        assert_eq!(reloaded.next_id().unwrap(), ManpowerItemId::new(3));
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ManpowerRepository::new(temp_dir.path().join("manpower.json"));
        let id = repo.next_id().unwrap();
        repo.upsert(ManpowerItem::new(id, "PNT-01", "Painter", "Civil", Money::zero()))
            .unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert!(repo.get_all().unwrap().is_empty());
    }
}
