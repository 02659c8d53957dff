//! ItemGroup and GroupItem models
//!
//! Items are organized into named groups (work packages such as
//! "Scaffolding" or "Electrical"). Each item carries a unit of measure and a
//! unit rate used to price estimate rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ItemId};
use super::money::Money;
use super::unit::UnitCode;

const MAX_NAME_LEN: usize = 100;

/// A named group of billable items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemGroup {
    /// Serial identifier
    pub id: GroupId,

    /// Group name, unique across the store
    pub name: String,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last modified
    pub updated_at: DateTime<Utc>,
}

impl ItemGroup {
    /// Create a new group with an id allocated by the repository
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into().trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename the group
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
        self.updated_at = Utc::now();
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }

        if self.name.len() > MAX_NAME_LEN {
            return Err(ItemValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for ItemGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A priced line item belonging to one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupItem {
    /// Serial identifier
    pub id: ItemId,

    /// Owning group
    pub group_id: GroupId,

    /// Optional catalogue number
    #[serde(default)]
    pub item_no: Option<String>,

    /// Item description
    pub description: String,

    /// Unit-of-measure code
    pub unit: String,

    /// Price per unit, two decimal places
    pub unit_rate: Money,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the item was last modified
    pub updated_at: DateTime<Utc>,
}

impl GroupItem {
    /// Create a new item; the rate is canonicalised to two decimal places
    pub fn new(
        id: ItemId,
        group_id: GroupId,
        description: impl Into<String>,
        unit: UnitCode,
        unit_rate: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            group_id,
            item_no: None,
            description: description.into().trim().to_string(),
            unit: unit.code().to_string(),
            unit_rate: unit_rate.to_rate_scale(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the catalogue number (blank clears it)
    pub fn with_item_no(mut self, item_no: impl Into<String>) -> Self {
        self.set_item_no(Some(item_no.into()));
        self
    }

    /// Set or clear the catalogue number
    pub fn set_item_no(&mut self, item_no: Option<String>) {
        self.item_no = item_no
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.updated_at = Utc::now();
    }

    /// Item number for display, empty when absent
    pub fn item_no_or_blank(&self) -> &str {
        self.item_no.as_deref().unwrap_or("")
    }

    /// Whether the item matches a case-insensitive search term on its
    /// description or item number
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.description.to_lowercase().contains(&term)
            || self
                .item_no
                .as_deref()
                .is_some_and(|no| no.to_lowercase().contains(&term))
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }

        if self.unit.parse::<UnitCode>().is_err() {
            return Err(ItemValidationError::UnknownUnit(self.unit.clone()));
        }

        if self.unit_rate.is_negative() {
            return Err(ItemValidationError::NegativeRate);
        }

        Ok(())
    }
}

impl fmt::Display for GroupItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item_no {
            Some(no) => write!(f, "{} {}", no, self.description),
            None => write!(f, "{}", self.description),
        }
    }
}

/// Validation errors for groups and items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyDescription,
    UnknownUnit(String),
    NegativeRate,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Group name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::EmptyDescription => write!(f, "Item description is required"),
            Self::UnknownUnit(unit) => write!(
                f,
                "Unknown unit '{}' (expected one of: {})",
                unit,
                UnitCode::choices()
            ),
            Self::NegativeRate => write!(f, "Unit rate cannot be negative"),
        }
    }
}

impl std::error::Error for ItemValidationError {}
