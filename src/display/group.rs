//! Item group display formatting
//!
//! Formats groups and their items for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{GroupItem, ItemGroup};
use crate::services::group::GroupWithItems;

#[derive(Tabled)]
struct GroupLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Items")]
    items: usize,
}

#[derive(Tabled)]
struct ItemLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item No.")]
    item_no: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Unit Rate")]
    rate: String,
}

/// Format groups with their item counts
pub fn format_group_list(groups: &[GroupWithItems]) -> String {
    if groups.is_empty() {
        return "No item groups found.\n\nCreate one with 'manhours group create <name>'."
            .to_string();
    }

    let lines = groups.iter().map(|g| GroupLine {
        id: g.group.id.to_string(),
        name: g.group.name.clone(),
        items: g.items.len(),
    });
    Table::new(lines).with(Style::psql()).to_string()
}

/// Format items as a table
pub fn format_item_table(items: &[GroupItem]) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }

    let lines = items.iter().map(|item| ItemLine {
        id: item.id.to_string(),
        item_no: item.item_no_or_blank().to_string(),
        description: item.description.clone(),
        unit: item.unit.clone(),
        rate: item.unit_rate.to_string(),
    });
    Table::new(lines).with(Style::psql()).to_string()
}

/// Format a group header followed by its items
pub fn format_group_details(group: &ItemGroup, items: &[GroupItem]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:       {}\n", group.id));
    output.push_str(&format!("  Items:    {}\n", items.len()));
    output.push_str(&format!(
        "  Created:  {}\n",
        group.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push('\n');
    output.push_str(&format_item_table(items));
    output.push('\n');

    output
}
