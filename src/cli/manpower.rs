//! Manpower catalogue CLI commands

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_manpower_catalogue, format_manpower_selection};
use crate::error::ManhoursResult;
use crate::models::ManpowerItemId;
use crate::services::ManpowerService;
use crate::storage::Storage;

/// Manpower subcommands
#[derive(Subcommand)]
pub enum ManpowerCommands {
    /// List the catalogue grouped by category
    List,

    /// Add a single manpower item
    Add {
        /// Catalogue code
        code: String,
        /// Role description
        description: String,
        /// Category
        #[arg(short, long)]
        category: String,
        /// Rate
        #[arg(short, long)]
        rate: String,
    },

    /// Import items from a .json array or a .csv file with
    /// Code, Description, Category and Rate columns
    Import {
        /// Path to the file
        file: PathBuf,
    },

    /// Show the selected roles and their combined rate
    Select {
        /// Catalogue codes
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Delete a manpower item
    Delete {
        /// Item ID ("3" or "mp-3")
        id: ManpowerItemId,
    },
}

/// Handle a manpower command
pub fn handle_manpower_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ManpowerCommands,
) -> ManhoursResult<()> {
    let service = ManpowerService::new(storage);

    match cmd {
        ManpowerCommands::List => {
            print!("{}", format_manpower_catalogue(&service.list_by_category()?));
        }

        ManpowerCommands::Add {
            code,
            description,
            category,
            rate,
        } => {
            let item = service.create(&code, &description, &category, &rate)?;
            println!("Added manpower item: {}", item);
            println!("  ID: {}", item.id);
        }

        ManpowerCommands::Import { file } => {
            let is_json = file
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));

            let items = if is_json {
                service.import_json(&std::fs::read_to_string(&file)?)?
            } else {
                service.import_csv(BufReader::new(File::open(&file)?))?
            };
            println!("Imported {} manpower items from {}", items.len(), file.display());
        }

        ManpowerCommands::Select { codes } => {
            let items = service.select_by_codes(&codes)?;
            print!("{}", format_manpower_selection(&items, &settings.currency_code));
        }

        ManpowerCommands::Delete { id } => {
            let item = service.delete(id)?;
            println!("Deleted manpower item: {}", item);
        }
    }

    Ok(())
}
