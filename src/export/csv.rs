//! CSV export of the consolidation ledger
//!
//! One line per row, tagged with its group, for spreadsheet tools that do not
//! read .xlsx.

use crate::error::ManhoursResult;
use crate::estimate::ConsolidationLedger;
use std::io::Write;

const HEADERS: [&str; 9] = [
    "Group",
    "Item No.",
    "Description",
    "Unit",
    "Unit Rate",
    "Days",
    "Persons",
    "Total Hours",
    "Total Value",
];

/// Export every ledger row to CSV
pub fn export_ledger_csv<W: Write>(ledger: &ConsolidationLedger, writer: W) -> ManhoursResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for (group, row) in ledger.flatten() {
        csv_writer.write_record([
            group.to_string(),
            row.item_no.clone(),
            row.description.clone(),
            row.unit.clone(),
            row.unit_rate.to_string(),
            row.days.to_string(),
            row.persons.to_string(),
            row.total_hours.normalize().to_string(),
            row.total_value.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
