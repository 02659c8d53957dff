//! Estimate rows
//!
//! A row is one priced line inside a working set. Rows seeded from the record
//! store copy their item's identifying fields; rows added ad hoc start blank
//! and carry a synthetic negative id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::derive::recompute;
use crate::models::{is_man_hour_unit, GroupItem, Money, RowId, HOURS_PER_PERSON_DAY};

/// One editable line of an estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRow {
    pub id: RowId,
    #[serde(default)]
    pub item_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
    pub unit_rate: Money,
    pub days: u32,
    pub persons: u32,
    /// Free-form on non-MH rows; derived from days and persons on MH rows
    pub total_hours: Decimal,
    /// Always `total_hours × unit_rate` after a recomputation pass
    pub total_value: Money,
}

impl EstimateRow {
    /// Seed a row from a record-store item
    pub fn seed(item: &GroupItem) -> Self {
        let total_hours = if is_man_hour_unit(&item.unit) {
            Decimal::from(HOURS_PER_PERSON_DAY)
        } else {
            Decimal::ONE
        };

        recompute(&Self {
            id: RowId::from(item.id),
            item_no: item.item_no_or_blank().to_string(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            unit_rate: item.unit_rate.to_rate_scale(),
            days: 1,
            persons: 1,
            total_hours,
            total_value: Money::zero(),
        })
    }

    /// A blank ad hoc row
    pub fn blank(id: RowId) -> Self {
        Self {
            id,
            item_no: String::new(),
            description: String::new(),
            unit: String::new(),
            unit_rate: Money::zero().to_rate_scale(),
            days: 1,
            persons: 1,
            total_hours: Decimal::from(HOURS_PER_PERSON_DAY),
            total_value: Money::zero().to_rate_scale(),
        }
    }

    pub fn is_man_hour(&self) -> bool {
        is_man_hour_unit(&self.unit)
    }

    /// The fields compared when deciding whether a row is locked
    pub fn identity(&self) -> RowIdentity {
        RowIdentity {
            item_no: self.item_no.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            unit_rate: self.unit_rate,
        }
    }

    /// `persons × 10 × days`, regardless of unit
    pub fn required_qty(&self) -> u64 {
        u64::from(self.persons)
            .checked_mul(u64::from(HOURS_PER_PERSON_DAY))
            .and_then(|v| v.checked_mul(u64::from(self.days)))
            .unwrap_or(0)
    }

    /// Crew notation shown on exports, e.g. "2x10x3"
    pub fn nos_hrs_days(&self) -> String {
        format!("{}x{}x{}", self.persons, HOURS_PER_PERSON_DAY, self.days)
    }
}

/// Identifying fields of a row or item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIdentity {
    pub item_no: String,
    pub description: String,
    pub unit: String,
    pub unit_rate: Money,
}

impl From<&GroupItem> for RowIdentity {
    fn from(item: &GroupItem) -> Self {
        Self {
            item_no: item.item_no_or_blank().to_string(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            unit_rate: item.unit_rate.to_rate_scale(),
        }
    }
}

/// Editable row fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    ItemNo,
    Description,
    Unit,
    UnitRate,
    Days,
    Persons,
    TotalHours,
}

impl RowField {
    pub fn all() -> &'static [Self] {
        &[
            Self::ItemNo,
            Self::Description,
            Self::Unit,
            Self::UnitRate,
            Self::Days,
            Self::Persons,
            Self::TotalHours,
        ]
    }

    /// Whether the field is one of the identifying fields frozen on locked rows
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Self::ItemNo | Self::Description | Self::Unit | Self::UnitRate
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemNo => "item-no",
            Self::Description => "description",
            Self::Unit => "unit",
            Self::UnitRate => "rate",
            Self::Days => "days",
            Self::Persons => "persons",
            Self::TotalHours => "hours",
        }
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RowField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "item-no" | "itemno" | "no" => Ok(Self::ItemNo),
            "description" | "desc" => Ok(Self::Description),
            "unit" | "uom" => Ok(Self::Unit),
            "rate" | "unit-rate" => Ok(Self::UnitRate),
            "days" => Ok(Self::Days),
            "persons" | "nos" => Ok(Self::Persons),
            "hours" | "total-hours" => Ok(Self::TotalHours),
            other => Err(format!(
                "Unknown field '{}' (expected one of: {})",
                other,
                Self::all()
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, ItemId, UnitCode};

    fn item(unit: UnitCode, cents: i64) -> GroupItem {
        GroupItem::new(
            ItemId::new(3),
            GroupId::new(1),
            "Scaffolder",
            unit,
            Money::from_cents(cents),
        )
        .with_item_no("SC-01")
    }

    #[test]
    fn test_seed_man_hour_row() {
        let row = EstimateRow::seed(&item(UnitCode::Mh, 5000));
        assert_eq!(row.id, RowId::new(3));
        assert_eq!(row.item_no, "SC-01");
        assert_eq!((row.days, row.persons), (1, 1));
        assert_eq!(row.total_hours, Decimal::from(10));
        assert_eq!(row.total_value, Money::from_cents(50000));
    }

    #[test]
    fn test_seed_other_unit_row() {
        let row = EstimateRow::seed(&item(UnitCode::Ea, 2000));
        assert_eq!(row.total_hours, Decimal::ONE);
        assert_eq!(row.total_value, Money::from_cents(2000));
    }

    #[test]
    fn test_blank_row() {
        let row = EstimateRow::blank(RowId::new(-1));
        assert!(row.id.is_synthetic());
        assert!(row.unit.is_empty());
        assert_eq!(row.total_hours, Decimal::from(10));
        assert!(row.total_value.is_zero());
    }

    #[test]
    fn test_required_qty_and_notation() {
        let mut row = EstimateRow::seed(&item(UnitCode::Ea, 2000));
        row.days = 3;
        row.persons = 2;
        assert_eq!(row.required_qty(), 60);
        assert_eq!(row.nos_hrs_days(), "2x10x3");
    }

    #[test]
    fn test_identity_matches_item() {
        let item = item(UnitCode::Mh, 5000);
        let row = EstimateRow::seed(&item);
        assert_eq!(row.identity(), RowIdentity::from(&item));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!("Total_Hours".parse::<RowField>().unwrap(), RowField::TotalHours);
        assert_eq!("rate".parse::<RowField>().unwrap(), RowField::UnitRate);
        assert!("colour".parse::<RowField>().is_err());
        assert!(RowField::Unit.is_identity());
        assert!(!RowField::Days.is_identity());
    }
}
