//! Manpower catalogue service
//!
//! Browsing by category, bulk import from CSV or JSON, and selection of
//! roles by code.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{ManpowerCategory, ManpowerItem, ManpowerItemId, Money};
use crate::storage::Storage;

/// One record of an import file, keyed the way catalogue spreadsheets are
#[derive(Debug, Clone, Deserialize)]
pub struct ManpowerRecord {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Rate")]
    pub rate: RateValue,
}

/// Rates arrive as JSON numbers or as text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Text(String),
    Number(serde_json::Number),
}

impl RateValue {
    fn to_money(&self) -> ManhoursResult<Money> {
        let text = match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        };
        Money::parse(&text).map_err(|e| ManhoursError::Import(e.to_string()))
    }
}

/// Service for the manpower catalogue
pub struct ManpowerService<'a> {
    storage: &'a Storage,
}

impl<'a> ManpowerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a single manpower item
    pub fn create(
        &self,
        code: &str,
        description: &str,
        category: &str,
        rate: &str,
    ) -> ManhoursResult<ManpowerItem> {
        let rate = Money::parse(rate).map_err(|e| ManhoursError::Validation(e.to_string()))?;
        let item = ManpowerItem::new(
            self.storage.manpower.next_id()?,
            code,
            description,
            category,
            rate,
        );
        item.validate()
            .map_err(|e| ManhoursError::Validation(e.to_string()))?;

        self.storage.manpower.upsert(item.clone())?;
        self.storage.manpower.save()?;

        self.storage.log_create(
            EntityType::ManpowerItem,
            item.id.to_string(),
            Some(item.code.clone()),
            &item,
        )?;

        Ok(item)
    }

    /// Categories in name order, items by description within each
    pub fn list_by_category(&self) -> ManhoursResult<Vec<ManpowerCategory>> {
        let mut grouped: BTreeMap<String, Vec<ManpowerItem>> = BTreeMap::new();
        for item in self.storage.manpower.get_all()? {
            grouped.entry(item.category.clone()).or_default().push(item);
        }

        Ok(grouped
            .into_iter()
            .map(|(name, mut items)| {
                items.sort_by(|a, b| a.description.cmp(&b.description));
                ManpowerCategory { name, items }
            })
            .collect())
    }

    /// Items for the given codes, in the order requested
    pub fn select_by_codes(&self, codes: &[String]) -> ManhoursResult<Vec<ManpowerItem>> {
        let all = self.storage.manpower.get_all()?;
        codes
            .iter()
            .map(|code| {
                all.iter()
                    .find(|item| item.code.eq_ignore_ascii_case(code.trim()))
                    .cloned()
                    .ok_or_else(|| ManhoursError::manpower_not_found(code.trim()))
            })
            .collect()
    }

    pub fn delete(&self, id: ManpowerItemId) -> ManhoursResult<ManpowerItem> {
        let item = self
            .storage
            .manpower
            .delete(id)?
            .ok_or_else(|| ManhoursError::manpower_not_found(id.to_string()))?;
        self.storage.manpower.save()?;

        self.storage.log_delete(
            EntityType::ManpowerItem,
            item.id.to_string(),
            Some(item.code.clone()),
            &item,
        )?;

        Ok(item)
    }

    /// Import a JSON array of records
    pub fn import_json(&self, json: &str) -> ManhoursResult<Vec<ManpowerItem>> {
        let records: Vec<ManpowerRecord> =
            serde_json::from_str(json).map_err(|e| ManhoursError::Import(e.to_string()))?;
        self.import_records(records)
    }

    /// Import CSV with a `Code,Description,Category,Rate` header
    pub fn import_csv<R: Read>(&self, reader: R) -> ManhoursResult<Vec<ManpowerItem>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<ManpowerRecord>, _>>()
            .map_err(|e| ManhoursError::Import(e.to_string()))?;
        self.import_records(records)
    }

    /// Validate every record, then insert them all; nothing is stored if any
    /// record is rejected
    pub fn import_records(&self, records: Vec<ManpowerRecord>) -> ManhoursResult<Vec<ManpowerItem>> {
        if records.is_empty() {
            return Err(ManhoursError::Import("No manpower records to import".into()));
        }

        let mut items = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let item = ManpowerItem::new(
                self.storage.manpower.next_id()?,
                &record.code,
                &record.description,
                &record.category,
                record.rate.to_money()?,
            );
            item.validate().map_err(|e| {
                ManhoursError::Import(format!("Record {}: {}", index + 1, e))
            })?;
            items.push(item);
        }

        for item in &items {
            self.storage.manpower.upsert(item.clone())?;
        }
        self.storage.manpower.save()?;

        let entries: Vec<AuditEntry> = items
            .iter()
            .map(|item| {
                AuditEntry::create(
                    EntityType::ManpowerItem,
                    item.id.to_string(),
                    Some(item.code.clone()),
                    item,
                )
            })
            .collect();
        self.storage.audit().log_batch(&entries)?;

        tracing::info!(count = items.len(), "manpower items imported");
        Ok(items)
    }
}
