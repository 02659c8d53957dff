//! The working set: editable rows for one group
//!
//! A working set is opened from a group's items, edited row by row, and
//! finally handed to the consolidation ledger. It always holds at least one
//! row. Every mutating operation finishes with a recomputation pass, so the
//! rows it exposes always satisfy the derivation invariants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::derive::{parse_count, parse_hours, parse_rate, recompute, recompute_all};
use super::duration::BulkDuration;
use super::row::{EstimateRow, RowField, RowIdentity};
use crate::error::{ManhoursError, ManhoursResult};
use crate::models::{GroupItem, Money, RowId};

/// Result of a remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(EstimateRow),
    /// The request was refused because only one row remained
    LastRowKept,
}

/// In-progress rows for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingSet {
    group_name: String,
    rows: Vec<EstimateRow>,
    /// Identifying fields of the group's items when the set was opened
    snapshot: Vec<RowIdentity>,
    next_synthetic_id: i64,
    opened_at: DateTime<Utc>,
}

impl WorkingSet {
    /// Open a working set seeded with one row per item.
    ///
    /// A group with no items opens with a single blank row.
    pub fn open(group_name: impl Into<String>, items: &[GroupItem]) -> Self {
        let mut set = Self {
            group_name: group_name.into(),
            rows: items.iter().map(EstimateRow::seed).collect(),
            snapshot: items.iter().map(RowIdentity::from).collect(),
            next_synthetic_id: -1,
            opened_at: Utc::now(),
        };
        if set.rows.is_empty() {
            set.add_row();
        }
        set
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn rows(&self) -> &[EstimateRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&EstimateRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the row at `index` matches an item in the opening snapshot.
    ///
    /// Decided by value equality each time, so an ad hoc row edited to match
    /// an item becomes locked too.
    pub fn is_locked(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| self.snapshot.contains(&row.identity()))
    }

    /// Edit one field of a row from user input.
    ///
    /// Numeric input is parsed leniently. Identifying fields of locked rows
    /// and the hours of MH rows are read-only.
    pub fn edit_field(
        &mut self,
        index: usize,
        field: RowField,
        value: &str,
    ) -> ManhoursResult<&EstimateRow> {
        if index >= self.rows.len() {
            return Err(ManhoursError::row_not_found(index + 1));
        }
        if field.is_identity() && self.is_locked(index) {
            return Err(ManhoursError::Locked(format!(
                "{} on row {} comes from the item catalogue",
                field,
                index + 1
            )));
        }

        let row = &mut self.rows[index];
        if field == RowField::TotalHours && row.is_man_hour() {
            return Err(ManhoursError::Locked(format!(
                "hours on row {} are derived from days and persons",
                index + 1
            )));
        }

        let value = value.trim();
        match field {
            RowField::ItemNo => row.item_no = value.to_string(),
            RowField::Description => row.description = value.to_string(),
            RowField::Unit => row.unit = value.to_string(),
            RowField::UnitRate => row.unit_rate = parse_rate(value),
            RowField::Days => row.days = parse_count(value),
            RowField::Persons => row.persons = parse_count(value),
            RowField::TotalHours => row.total_hours = parse_hours(value),
        }
        *row = recompute(row);

        Ok(&self.rows[index])
    }

    /// Append a blank ad hoc row and return its synthetic id
    pub fn add_row(&mut self) -> RowId {
        let id = RowId::new(self.next_synthetic_id);
        self.next_synthetic_id -= 1;
        self.rows.push(EstimateRow::blank(id));
        id
    }

    /// Remove a row. The last remaining row is never removed.
    pub fn remove_row(&mut self, index: usize) -> ManhoursResult<RemoveOutcome> {
        if index >= self.rows.len() {
            return Err(ManhoursError::row_not_found(index + 1));
        }
        if self.rows.len() == 1 {
            return Ok(RemoveOutcome::LastRowKept);
        }
        Ok(RemoveOutcome::Removed(self.rows.remove(index)))
    }

    /// Set days and persons on every MH row; returns the number of rows changed
    pub fn apply_bulk_duration(&mut self, duration: BulkDuration) -> usize {
        let applied = duration.apply(&mut self.rows);
        recompute_all(&mut self.rows);
        applied
    }

    /// Sum of row values
    pub fn total_value(&self) -> Money {
        self.rows.iter().map(|r| r.total_value).sum()
    }

    /// Sum of row hours
    pub fn total_hours(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, r| {
                acc.checked_add(r.total_hours).unwrap_or(acc)
            })
    }

    /// Consume the set, yielding its rows
    pub fn into_rows(self) -> Vec<EstimateRow> {
        self.rows
    }
}
