//! Item group service
//!
//! Business logic for item groups and their priced items: validation,
//! uniqueness, cascade delete and audit logging.

use crate::audit::EntityType;
use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{
    GroupId, GroupItem, ItemGroup, ItemId, ItemValidationError, Money, UnitCode,
};
use crate::storage::Storage;

/// Service for item group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

/// A group together with its items
#[derive(Debug, Clone)]
pub struct GroupWithItems {
    pub group: ItemGroup,
    pub items: Vec<GroupItem>,
}

/// Field values for creating an item; strings come straight from the CLI
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub item_no: Option<String>,
    pub description: String,
    pub unit: String,
    pub unit_rate: String,
}

/// Changes to an existing item; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub item_no: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub unit_rate: Option<String>,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Group Operations ===

    /// Create a new group with a unique name
    pub fn create_group(&self, name: &str) -> ManhoursResult<ItemGroup> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ManhoursError::Validation(
                ItemValidationError::EmptyName.to_string(),
            ));
        }

        if self.storage.groups.get_group_by_name(name)?.is_some() {
            return Err(ManhoursError::Duplicate {
                entity_type: "Item Group",
                identifier: name.to_string(),
            });
        }

        let group = ItemGroup::new(self.storage.groups.next_group_id()?, name);
        group
            .validate()
            .map_err(|e| ManhoursError::Validation(e.to_string()))?;

        self.storage.groups.upsert_group(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::ItemGroup,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        tracing::info!(id = %group.id, name = %group.name, "group created");
        Ok(group)
    }

    pub fn get_group(&self, id: GroupId) -> ManhoursResult<Option<ItemGroup>> {
        self.storage.groups.get_group(id)
    }

    /// Find a group by name or ID string ("3", "grp-3")
    pub fn find_group(&self, identifier: &str) -> ManhoursResult<Option<ItemGroup>> {
        if let Some(group) = self.storage.groups.get_group_by_name(identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.parse::<GroupId>() {
            return self.storage.groups.get_group(id);
        }

        Ok(None)
    }

    /// Find a group or fail with a not-found error
    pub fn require_group(&self, identifier: &str) -> ManhoursResult<ItemGroup> {
        self.find_group(identifier)?
            .ok_or_else(|| ManhoursError::group_not_found(identifier))
    }

    pub fn list_groups(&self) -> ManhoursResult<Vec<ItemGroup>> {
        self.storage.groups.get_all_groups()
    }

    pub fn list_groups_with_items(&self) -> ManhoursResult<Vec<GroupWithItems>> {
        let groups = self.storage.groups.get_all_groups()?;
        let mut result = Vec::with_capacity(groups.len());

        for group in groups {
            let items = self.storage.groups.get_items_in_group(group.id)?;
            result.push(GroupWithItems { group, items });
        }

        Ok(result)
    }

    /// Rename a group, keeping names unique
    pub fn rename_group(&self, id: GroupId, name: &str) -> ManhoursResult<ItemGroup> {
        let mut group = self
            .storage
            .groups
            .get_group(id)?
            .ok_or_else(|| ManhoursError::group_not_found(id.to_string()))?;
        let before = group.clone();

        if let Some(existing) = self.storage.groups.get_group_by_name(name)? {
            if existing.id != id {
                return Err(ManhoursError::Duplicate {
                    entity_type: "Item Group",
                    identifier: name.trim().to_string(),
                });
            }
        }

        group.rename(name);
        group
            .validate()
            .map_err(|e| ManhoursError::Validation(e.to_string()))?;

        self.storage.groups.upsert_group(group.clone())?;
        self.storage.groups.save()?;

        if before.name != group.name {
            self.storage.log_update(
                EntityType::ItemGroup,
                group.id.to_string(),
                Some(group.name.clone()),
                &before,
                &group,
            )?;
        }

        Ok(group)
    }

    /// Delete a group and every item in it; returns the number of items removed
    pub fn delete_group(&self, id: GroupId) -> ManhoursResult<usize> {
        let (group, items) = self
            .storage
            .groups
            .delete_group(id)?
            .ok_or_else(|| ManhoursError::group_not_found(id.to_string()))?;
        self.storage.groups.save()?;

        for item in &items {
            self.storage.log_delete(
                EntityType::GroupItem,
                item.id.to_string(),
                Some(item.description.clone()),
                item,
            )?;
        }
        self.storage.log_delete(
            EntityType::ItemGroup,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        tracing::info!(id = %group.id, items = items.len(), "group deleted");
        Ok(items.len())
    }

    // === Item Operations ===

    /// Create an item in a group
    pub fn create_item(&self, group_id: GroupId, input: ItemInput) -> ManhoursResult<GroupItem> {
        if self.storage.groups.get_group(group_id)?.is_none() {
            return Err(ManhoursError::group_not_found(group_id.to_string()));
        }

        let unit = parse_unit(&input.unit)?;
        let rate = parse_item_rate(&input.unit_rate)?;

        let mut item = GroupItem::new(
            self.storage.groups.next_item_id()?,
            group_id,
            input.description,
            unit,
            rate,
        );
        item.set_item_no(input.item_no);
        item.validate()
            .map_err(|e| ManhoursError::Validation(e.to_string()))?;

        self.storage.groups.upsert_item(item.clone())?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::GroupItem,
            item.id.to_string(),
            Some(item.description.clone()),
            &item,
        )?;

        Ok(item)
    }

    pub fn get_item(&self, id: ItemId) -> ManhoursResult<Option<GroupItem>> {
        self.storage.groups.get_item(id)
    }

    /// Apply changes to an item; unchanged updates are not audited
    pub fn update_item(&self, id: ItemId, update: ItemUpdate) -> ManhoursResult<GroupItem> {
        let mut item = self
            .storage
            .groups
            .get_item(id)?
            .ok_or_else(|| ManhoursError::item_not_found(id.to_string()))?;
        let before = item.clone();

        if let Some(item_no) = update.item_no {
            item.set_item_no(Some(item_no));
        }
        if let Some(description) = update.description {
            item.description = description.trim().to_string();
        }
        if let Some(unit) = update.unit {
            item.unit = parse_unit(&unit)?.code().to_string();
        }
        if let Some(rate) = update.unit_rate {
            item.unit_rate = parse_item_rate(&rate)?;
        }
        item.updated_at = chrono::Utc::now();

        item.validate()
            .map_err(|e| ManhoursError::Validation(e.to_string()))?;

        self.storage.groups.upsert_item(item.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::GroupItem,
            item.id.to_string(),
            Some(item.description.clone()),
            &before,
            &item,
        )?;

        Ok(item)
    }

    pub fn delete_item(&self, id: ItemId) -> ManhoursResult<GroupItem> {
        let item = self
            .storage
            .groups
            .delete_item(id)?
            .ok_or_else(|| ManhoursError::item_not_found(id.to_string()))?;
        self.storage.groups.save()?;

        self.storage.log_delete(
            EntityType::GroupItem,
            item.id.to_string(),
            Some(item.description.clone()),
            &item,
        )?;

        Ok(item)
    }

    /// Items of one group ordered by id
    pub fn list_items(&self, group_id: GroupId) -> ManhoursResult<Vec<GroupItem>> {
        self.storage.groups.get_items_in_group(group_id)
    }

    /// Items matching a term on description or item number, optionally
    /// limited to one group
    pub fn search_items(
        &self,
        term: &str,
        group_id: Option<GroupId>,
    ) -> ManhoursResult<Vec<GroupItem>> {
        let items = match group_id {
            Some(id) => self.storage.groups.get_items_in_group(id)?,
            None => self.storage.groups.get_all_items()?,
        };
        Ok(items.into_iter().filter(|i| i.matches(term)).collect())
    }
}

fn parse_unit(unit: &str) -> ManhoursResult<UnitCode> {
    unit.parse::<UnitCode>().map_err(|_| {
        ManhoursError::Validation(ItemValidationError::UnknownUnit(unit.trim().to_string()).to_string())
    })
}

fn parse_item_rate(rate: &str) -> ManhoursResult<Money> {
    if rate.trim().is_empty() {
        return Err(ManhoursError::Validation("Unit rate is required".into()));
    }
    let money = Money::parse(rate).map_err(|e| ManhoursError::Validation(e.to_string()))?;
    if money.is_negative() {
        return Err(ManhoursError::Validation(
            ItemValidationError::NegativeRate.to_string(),
        ));
    }
    Ok(money.to_rate_scale())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ManhoursPaths;
    use crate::audit::Operation;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(desc: &str, unit: &str, rate: &str) -> ItemInput {
        ItemInput {
            item_no: None,
            description: desc.into(),
            unit: unit.into(),
            unit_rate: rate.into(),
        }
    }

    #[test]
    fn test_create_group() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        let group = service.create_group("Scaffolding").unwrap();
        assert_eq!(group.id, GroupId::new(1));
        assert!(service.find_group("scaffolding").unwrap().is_some());
        assert!(service.find_group("grp-1").unwrap().is_some());
    }

    #[test]
    fn test_duplicate_group_name() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        service.create_group("Electrical").unwrap();
        let result = service.create_group("ELECTRICAL");
        assert!(matches!(result, Err(ManhoursError::Duplicate { .. })));
    }

    #[test]
    fn test_empty_group_name() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        assert!(service.create_group("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_rename_group() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let civil = service.create_group("Civil").unwrap();
        service.create_group("Piping").unwrap();

        let renamed = service.rename_group(civil.id, "Civil Works").unwrap();
        assert_eq!(renamed.name, "Civil Works");
        assert!(matches!(
            service.rename_group(civil.id, "piping"),
            Err(ManhoursError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_create_item_canonicalises_rate() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create_group("Scaffolding").unwrap();

        let item = service
            .create_item(group.id, input("Scaffolder", "mh", "12.345"))
            .unwrap();
        assert_eq!(item.unit, "MH");
        assert_eq!(item.unit_rate.to_string(), "12.35");
    }

    #[test]
    fn test_create_item_rejects_bad_input() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create_group("Scaffolding").unwrap();

        for bad in [
            input("Scaffolder", "HOURS", "10"),
            input("Scaffolder", "MH", ""),
            input("Scaffolder", "MH", "-5"),
            input("  ", "MH", "10"),
        ] {
            assert!(service.create_item(group.id, bad).unwrap_err().is_validation());
        }

        let missing = service.create_item(GroupId::new(99), input("X", "EA", "1"));
        assert!(missing.unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_item() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create_group("Electrical").unwrap();
        let item = service
            .create_item(group.id, input("Cable tray", "LM", "10"))
            .unwrap();

        let updated = service
            .update_item(
                item.id,
                ItemUpdate {
                    item_no: Some("E-01".into()),
                    unit_rate: Some("12.5".into()),
                    ..ItemUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.item_no.as_deref(), Some("E-01"));
        assert_eq!(updated.unit_rate, Money::from_cents(1250));
        assert_eq!(updated.unit, "LM");
    }

    #[test]
    fn test_search_items() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create_group("Electrical").unwrap();
        let mut tray = input("Cable tray", "LM", "10");
        tray.item_no = Some("E-01".into());
        service.create_item(group.id, tray).unwrap();
        service
            .create_item(group.id, input("Electrician", "MH", "25"))
            .unwrap();

        assert_eq!(service.search_items("TRAY", None).unwrap().len(), 1);
        assert_eq!(service.search_items("e-0", Some(group.id)).unwrap().len(), 1);
        assert_eq!(service.search_items("", Some(group.id)).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_group_cascades_and_audits() {
        let (_temp, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        let group = service.create_group("Scaffolding").unwrap();
        service
            .create_item(group.id, input("Scaffolder", "MH", "50"))
            .unwrap();
        service
            .create_item(group.id, input("Helper", "MH", "30"))
            .unwrap();

        assert_eq!(service.delete_group(group.id).unwrap(), 2);
        assert!(service.list_items(group.id).unwrap().is_empty());

        let entries = storage.audit().read_all().unwrap();
        let deletes = entries
            .iter()
            .filter(|e| e.operation == Operation::Delete)
            .count();
        assert_eq!(deletes, 3);
    }
}
