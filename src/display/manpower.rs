//! Manpower catalogue display

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{ManpowerCategory, ManpowerItem, Money};

#[derive(Tabled)]
struct ManpowerLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

fn manpower_table(items: &[ManpowerItem]) -> String {
    let lines = items.iter().map(|item| ManpowerLine {
        id: item.id.to_string(),
        code: item.code.clone(),
        description: item.description.clone(),
        rate: item.rate.to_string(),
    });
    Table::new(lines).with(Style::psql()).to_string()
}

/// Format the catalogue, one table per category
pub fn format_manpower_catalogue(categories: &[ManpowerCategory]) -> String {
    if categories.is_empty() {
        return "No manpower items found.\n\nImport some with 'manhours manpower import <file>'."
            .to_string();
    }

    let mut output = String::new();
    for (i, category) in categories.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{} ({})\n", category.name, category.items.len()));
        output.push_str(&manpower_table(&category.items));
        output.push('\n');
    }
    output
}

/// Format a selection of roles with a rate total
pub fn format_manpower_selection(items: &[ManpowerItem], currency: &str) -> String {
    if items.is_empty() {
        return "No manpower items selected.".to_string();
    }

    let total: Money = items.iter().map(|i| i.rate).sum();
    format!(
        "{}\n{} selected, combined rate {}\n",
        manpower_table(items),
        items.len(),
        total.format_with_currency(currency)
    )
}
