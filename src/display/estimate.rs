//! Working set and ledger display
//!
//! Rows are numbered from 1, matching the positions the `estimate` commands
//! accept. Locked rows are marked so the user knows which fields are frozen.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::estimate::{ConsolidationLedger, EstimateRow, WorkingSet};

#[derive(Tabled)]
struct RowLine {
    #[tabled(rename = "#")]
    position: String,
    #[tabled(rename = "Item No.")]
    item_no: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Unit Rate")]
    rate: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Persons")]
    persons: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl RowLine {
    fn new(position: String, row: &EstimateRow) -> Self {
        // Days and persons only drive MH rows
        let (days, persons) = if row.is_man_hour() {
            (row.days.to_string(), row.persons.to_string())
        } else {
            ("-".to_string(), "-".to_string())
        };
        Self {
            position,
            item_no: row.item_no.clone(),
            description: row.description.clone(),
            unit: row.unit.clone(),
            rate: row.unit_rate.to_string(),
            days,
            persons,
            hours: row.total_hours.normalize().to_string(),
            value: row.total_value.to_string(),
        }
    }
}

#[derive(Tabled)]
struct LedgerLine {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

/// Format the open working set with its totals
pub fn format_working_set(set: &WorkingSet, currency: &str) -> String {
    let lines = set.rows().iter().enumerate().map(|(index, row)| {
        let marker = if set.is_locked(index) { "*" } else { "" };
        RowLine::new(format!("{}{}", index + 1, marker), row)
    });

    let mut output = format!(
        "Working set: {} (opened {})\n",
        set.group_name(),
        set.opened_at().format("%Y-%m-%d %H:%M UTC")
    );
    output.push_str(&Table::new(lines).with(Style::psql()).to_string());
    output.push('\n');
    output.push_str(&format!(
        "Total hours: {}   Total value: {}\n",
        set.total_hours().normalize(),
        set.total_value().format_with_currency(currency)
    ));
    if (0..set.len()).any(|i| set.is_locked(i)) {
        output.push_str("* catalogue row: item no., description, unit and rate are locked\n");
    }
    output
}

/// Format a single row after an edit
pub fn format_row(position: usize, row: &EstimateRow) -> String {
    Table::new([RowLine::new(position.to_string(), row)])
        .with(Style::psql())
        .to_string()
}

/// Format per-group subtotals and the grand total; with `detailed`, every
/// row follows its group's line
pub fn format_ledger(ledger: &ConsolidationLedger, currency: &str, detailed: bool) -> String {
    if ledger.is_empty() {
        return "No groups finished yet.\n\nOpen one with 'manhours estimate open <group>'."
            .to_string();
    }

    let mut output = String::new();
    let lines = ledger.entries().iter().map(|entry| LedgerLine {
        group: entry.group_name().to_string(),
        rows: entry.rows().len(),
        hours: entry.total_hours().normalize().to_string(),
        subtotal: entry.subtotal().to_string(),
    });
    output.push_str(&Table::new(lines).with(Style::psql()).to_string());
    output.push('\n');

    if detailed {
        for entry in ledger.entries() {
            output.push_str(&format!("\n{}\n", entry.group_name()));
            let rows = entry
                .rows()
                .iter()
                .enumerate()
                .map(|(i, row)| RowLine::new((i + 1).to_string(), row));
            output.push_str(&Table::new(rows).with(Style::psql()).to_string());
            output.push('\n');
        }
    }

    output.push_str(&format!(
        "\nGrand total: {}\n",
        ledger.grand_total().format_with_currency(currency)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, GroupItem, ItemId, Money, UnitCode};

    fn set() -> WorkingSet {
        let item = GroupItem::new(
            ItemId::new(1),
            GroupId::new(1),
            "Scaffolder",
            UnitCode::Mh,
            Money::from_cents(5000),
        );
        let mut set = WorkingSet::open("Scaffolding", &[item]);
        set.add_row();
        set
    }

    #[test]
    fn test_working_set_marks_locked_rows() {
        let set = set();
        let output = format_working_set(&set, "SAR");
        assert!(output.starts_with("Working set: Scaffolding (opened "));
        let opened = set.opened_at().format("%Y-%m-%d %H:%M").to_string();
        assert!(output.contains(&opened));
        assert!(output.contains("1*"));
        assert!(output.contains("Total value: 500.00 SAR"));
        assert!(output.contains("are locked"));
    }

    #[test]
    fn test_ledger_summary() {
        let mut ledger = ConsolidationLedger::new();
        ledger.finish_working_set(set());

        let output = format_ledger(&ledger, "SAR", true);
        assert!(output.contains("Scaffolding"));
        assert!(output.contains("Grand total: 500.00 SAR"));
        assert!(format_ledger(&ConsolidationLedger::new(), "SAR", false)
            .contains("No groups finished yet"));
    }
}
