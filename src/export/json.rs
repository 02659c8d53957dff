//! JSON export of the consolidation ledger
//!
//! Dumps every finished group with its rows and subtotals, plus schema
//! versioning so a dump can be read back and checked.

use crate::error::{ManhoursError, ManhoursResult};
use crate::estimate::{recompute, ConsolidationLedger, EstimateRow};
use crate::models::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Currency label of all amounts
    pub currency: String,

    /// Finished groups in ledger order
    pub groups: Vec<GroupExport>,

    /// Sum of every row value
    pub grand_total: Money,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// One finished group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupExport {
    pub group: String,
    pub finished_at: DateTime<Utc>,
    pub subtotal: Money,
    pub rows: Vec<EstimateRow>,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub group_count: usize,
    pub row_count: usize,
    pub total_hours: Decimal,
}

impl LedgerExport {
    /// Create an export from the ledger
    pub fn from_ledger(ledger: &ConsolidationLedger, currency: &str) -> Self {
        let groups: Vec<GroupExport> = ledger
            .entries()
            .iter()
            .map(|entry| GroupExport {
                group: entry.group_name().to_string(),
                finished_at: entry.finished_at(),
                subtotal: entry.subtotal(),
                rows: entry.rows().to_vec(),
            })
            .collect();

        let total_hours = ledger
            .entries()
            .iter()
            .fold(Decimal::ZERO, |acc, e| {
                acc.checked_add(e.total_hours()).unwrap_or(acc)
            });

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            currency: currency.to_string(),
            metadata: ExportMetadata {
                group_count: groups.len(),
                row_count: ledger.row_count(),
                total_hours,
            },
            groups,
            grand_total: ledger.grand_total(),
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        // Every row must already satisfy the derivation rules
        for group in &self.groups {
            for (index, row) in group.rows.iter().enumerate() {
                if recompute(row) != *row {
                    return Err(format!(
                        "Row {} of group '{}' has inconsistent totals",
                        index + 1,
                        group.group
                    ));
                }
            }
            let subtotal: Money = group.rows.iter().map(|r| r.total_value).sum();
            if subtotal != group.subtotal {
                return Err(format!("Subtotal mismatch in group '{}'", group.group));
            }
        }

        let total: Money = self.groups.iter().map(|g| g.subtotal).sum();
        if total != self.grand_total {
            return Err("Grand total does not match group subtotals".to_string());
        }

        Ok(())
    }

    /// Rebuild a ledger from the export
    pub fn into_ledger(self) -> ConsolidationLedger {
        let mut ledger = ConsolidationLedger::new();
        for group in self.groups {
            ledger.finish(group.group, group.rows);
        }
        ledger
    }
}

/// Export the ledger to JSON
pub fn export_ledger_json<W: Write>(
    ledger: &ConsolidationLedger,
    currency: &str,
    writer: &mut W,
    pretty: bool,
) -> ManhoursResult<()> {
    let export = LedgerExport::from_ledger(ledger, currency);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| ManhoursError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a JSON export
pub fn import_from_json(json_str: &str) -> ManhoursResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| ManhoursError::Import(e.to_string()))?;

    export.validate().map_err(ManhoursError::Import)?;

    Ok(export)
}
