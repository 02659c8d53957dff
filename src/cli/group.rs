//! Item group CLI commands

use clap::Subcommand;

use crate::display::{format_group_details, format_group_list};
use crate::error::ManhoursResult;
use crate::services::GroupService;
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// List all groups with their item counts
    List,

    /// Create a new group
    Create {
        /// Group name (must be unique)
        name: String,
    },

    /// Show a group and its items
    Show {
        /// Group name or ID
        group: String,
    },

    /// Rename a group
    Rename {
        /// Group name or ID
        group: String,
        /// New name
        name: String,
    },

    /// Delete a group and all of its items
    Delete {
        /// Group name or ID
        group: String,
    },
}

/// Handle a group command
pub fn handle_group_command(storage: &Storage, cmd: GroupCommands) -> ManhoursResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::List => {
            let groups = service.list_groups_with_items()?;
            println!("{}", format_group_list(&groups));
        }

        GroupCommands::Create { name } => {
            let group = service.create_group(&name)?;
            println!("Created group: {}", group.name);
            println!("  ID: {}", group.id);
        }

        GroupCommands::Show { group } => {
            let group = service.require_group(&group)?;
            let items = service.list_items(group.id)?;
            print!("{}", format_group_details(&group, &items));
        }

        GroupCommands::Rename { group, name } => {
            let group = service.require_group(&group)?;
            let renamed = service.rename_group(group.id, &name)?;
            println!("Renamed group '{}' to '{}'", group.name, renamed.name);
        }

        GroupCommands::Delete { group } => {
            let group = service.require_group(&group)?;
            let removed = service.delete_group(group.id)?;
            println!("Deleted group: {} ({} items removed)", group.name, removed);
        }
    }

    Ok(())
}
