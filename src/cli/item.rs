//! Group item CLI commands

use clap::Subcommand;

use crate::display::format_item_table;
use crate::error::ManhoursResult;
use crate::models::{ItemId, UnitCode};
use crate::services::{GroupService, ItemInput, ItemUpdate};
use crate::storage::Storage;

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemCommands {
    /// List the items of a group
    List {
        /// Group name or ID
        group: String,
    },

    /// Add an item to a group
    Add {
        /// Group name or ID
        group: String,
        /// Item description
        description: String,
        /// Unit code (MH, EA, LS, LM, CUM, SQM)
        #[arg(short, long)]
        unit: String,
        /// Unit rate (e.g. "45" or "45.50")
        #[arg(short, long)]
        rate: String,
        /// Catalogue item number
        #[arg(short = 'n', long)]
        item_no: Option<String>,
    },

    /// Edit an item
    Edit {
        /// Item ID ("4" or "itm-4")
        item: ItemId,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New unit code
        #[arg(short, long)]
        unit: Option<String>,
        /// New unit rate
        #[arg(short, long)]
        rate: Option<String>,
        /// New item number (empty clears it)
        #[arg(short = 'n', long)]
        item_no: Option<String>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        item: ItemId,
    },

    /// Search items by description or item number
    Search {
        /// Search term (case-insensitive)
        term: String,
        /// Limit the search to one group
        #[arg(short, long)]
        group: Option<String>,
    },

    /// List the recognised unit codes
    Units,
}

/// Handle an item command
pub fn handle_item_command(storage: &Storage, cmd: ItemCommands) -> ManhoursResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        ItemCommands::List { group } => {
            let group = service.require_group(&group)?;
            let items = service.list_items(group.id)?;
            println!("{}", format_item_table(&items));
        }

        ItemCommands::Add {
            group,
            description,
            unit,
            rate,
            item_no,
        } => {
            let group = service.require_group(&group)?;
            let item = service.create_item(
                group.id,
                ItemInput {
                    item_no,
                    description,
                    unit,
                    unit_rate: rate,
                },
            )?;
            println!("Added item: {}", item);
            println!("  Group: {}", group.name);
            println!("  ID:    {}", item.id);
            println!("  Rate:  {} / {}", item.unit_rate, item.unit);
        }

        ItemCommands::Edit {
            item,
            description,
            unit,
            rate,
            item_no,
        } => {
            if description.is_none() && unit.is_none() && rate.is_none() && item_no.is_none() {
                println!("No changes specified. Use --description, --unit, --rate or --item-no.");
                return Ok(());
            }

            let updated = service.update_item(
                item,
                ItemUpdate {
                    item_no,
                    description,
                    unit,
                    unit_rate: rate,
                },
            )?;
            println!("Updated item: {}", updated);
        }

        ItemCommands::Delete { item } => {
            let deleted = service.delete_item(item)?;
            println!("Deleted item: {}", deleted);
        }

        ItemCommands::Search { term, group } => {
            let group_id = match group {
                Some(g) => Some(service.require_group(&g)?.id),
                None => None,
            };
            let items = service.search_items(&term, group_id)?;
            println!("{}", format_item_table(&items));
        }

        ItemCommands::Units => {
            println!("{}", UnitCode::choices());
        }
    }

    Ok(())
}
