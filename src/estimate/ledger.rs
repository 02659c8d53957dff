//! Consolidation ledger
//!
//! Finished groups accumulate here for the rest of the session, in the order
//! they were first finished. Finishing a group again replaces its rows but
//! keeps its position.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::row::EstimateRow;
use super::working_set::WorkingSet;
use crate::models::Money;

/// Rows of one finished group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    group_name: String,
    rows: Vec<EstimateRow>,
    finished_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn rows(&self) -> &[EstimateRow] {
        &self.rows
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn subtotal(&self) -> Money {
        self.rows.iter().map(|r| r.total_value).sum()
    }

    pub fn total_hours(&self) -> Decimal {
        self.rows.iter().fold(Decimal::ZERO, |acc, r| {
            acc.checked_add(r.total_hours).unwrap_or(acc)
        })
    }
}

/// Whether `finish` added a new entry or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    Added,
    Replaced,
}

/// Ordered mapping of group name to finished rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationLedger {
    entries: Vec<LedgerEntry>,
}

impl ConsolidationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the rows unchanged under the group name
    pub fn finish(&mut self, group_name: impl Into<String>, rows: Vec<EstimateRow>) -> FinishOutcome {
        let entry = LedgerEntry {
            group_name: group_name.into(),
            rows,
            finished_at: Utc::now(),
        };

        match self
            .entries
            .iter_mut()
            .find(|e| e.group_name == entry.group_name)
        {
            Some(existing) => {
                *existing = entry;
                FinishOutcome::Replaced
            }
            None => {
                self.entries.push(entry);
                FinishOutcome::Added
            }
        }
    }

    /// Move a working set's rows into the ledger
    pub fn finish_working_set(&mut self, set: WorkingSet) -> FinishOutcome {
        let name = set.group_name().to_string();
        self.finish(name, set.into_rows())
    }

    /// Sum of every row value across all entries
    pub fn grand_total(&self) -> Money {
        self.entries.iter().map(|e| e.subtotal()).sum()
    }

    /// Every row with its group name, in ledger then row order
    pub fn flatten(&self) -> impl Iterator<Item = (&str, &EstimateRow)> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.rows.iter().map(move |r| (e.group_name.as_str(), r)))
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entry(&self, group_name: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.group_name == group_name)
    }

    /// Subtotal for one group, if it has been finished
    pub fn subtotal(&self, group_name: &str) -> Option<Money> {
        self.entry(group_name).map(LedgerEntry::subtotal)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of rows across entries
    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|e| e.rows.len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
