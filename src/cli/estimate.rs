//! Estimating session CLI commands
//!
//! Rows are addressed by their 1-based position as shown by `estimate show`.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_ledger, format_row, format_working_set};
use crate::error::ManhoursResult;
use crate::estimate::{FinishOutcome, RemoveOutcome, RowField};
use crate::export::ExportFormat;
use crate::services::EstimateService;
use crate::storage::Storage;

/// Estimate subcommands
#[derive(Subcommand)]
pub enum EstimateCommands {
    /// Open a group's working set (replaces any unfinished one)
    Open {
        /// Group name or ID
        group: String,
    },

    /// Show the open working set
    Show,

    /// Edit one field of a row
    Edit {
        /// Row number as shown by 'estimate show'
        row: usize,
        /// Field: item-no, description, unit, rate, days, persons, hours
        field: RowField,
        /// New value
        value: String,
    },

    /// Append a blank row
    #[command(name = "add-row")]
    AddRow,

    /// Remove a row (the last remaining row is kept)
    #[command(name = "remove-row")]
    RemoveRow {
        /// Row number
        row: usize,
    },

    /// Set days and persons on every MH row
    Duration {
        /// Working days
        #[arg(short, long, default_value = "1")]
        days: String,
        /// Persons
        #[arg(short, long, default_value = "1")]
        persons: String,
    },

    /// Move the working set into the consolidated estimate
    Finish,

    /// Discard the working set
    Cancel,

    /// Show subtotals per group and the grand total
    Summary {
        /// Also list every row
        #[arg(short, long)]
        detailed: bool,
    },

    /// Export the consolidated estimate
    Export {
        /// Output file (defaults to the configured workbook name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format: xlsx, csv, json or yaml (defaults to the file extension)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Clear the consolidated estimate and any open working set
    Reset,
}

/// Handle an estimate command
pub fn handle_estimate_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EstimateCommands,
) -> ManhoursResult<()> {
    let service = EstimateService::new(storage);
    let currency = settings.currency_code.as_str();

    match cmd {
        EstimateCommands::Open { group } => {
            let opened = service.open(&group)?;
            if let Some(previous) = opened.discarded {
                println!("Discarded unfinished working set for '{}'", previous);
            }
            print!("{}", format_working_set(&opened.working_set, currency));
        }

        EstimateCommands::Show => {
            print!("{}", format_working_set(&service.current()?, currency));
        }

        EstimateCommands::Edit { row, field, value } => {
            let updated = service.edit(row, field, &value)?;
            println!("{}", format_row(row, &updated));
        }

        EstimateCommands::AddRow => {
            let (position, _) = service.add_row()?;
            println!("Added row {}", position);
        }

        EstimateCommands::RemoveRow { row } => match service.remove_row(row)? {
            RemoveOutcome::Removed(removed) => {
                let label = if removed.description.is_empty() {
                    "(blank)"
                } else {
                    removed.description.as_str()
                };
                println!("Removed row {}: {}", row, label);
            }
            RemoveOutcome::LastRowKept => {
                println!("Row {} is the only row left and was kept.", row);
            }
        },

        EstimateCommands::Duration { days, persons } => {
            let (duration, applied) = service.apply_duration(&days, &persons)?;
            println!(
                "Applied {} day(s) x {} person(s) to {} MH row(s)",
                duration.days, duration.persons, applied
            );
        }

        EstimateCommands::Finish => {
            let finished = service.finish()?;
            let verb = match finished.outcome {
                FinishOutcome::Added => "Added",
                FinishOutcome::Replaced => "Replaced",
            };
            println!(
                "{} '{}': {} rows, subtotal {}",
                verb,
                finished.group_name,
                finished.rows,
                finished.subtotal.format_with_currency(currency)
            );
            println!(
                "Grand total: {}",
                finished.grand_total.format_with_currency(currency)
            );
        }

        EstimateCommands::Cancel => {
            let group = service.cancel()?;
            println!("Discarded working set for '{}'", group);
        }

        EstimateCommands::Summary { detailed } => {
            print!("{}", format_ledger(&service.ledger()?, currency, detailed));
        }

        EstimateCommands::Export { output, format } => {
            let path = output.unwrap_or_else(|| PathBuf::from(&settings.manhours_export_file));
            let format = format
                .or_else(|| ExportFormat::from_path(&path))
                .unwrap_or(ExportFormat::Xlsx);

            service.export(format, &path, currency)?;
            println!("Exported consolidated estimate ({}) to {}", format, path.display());
        }

        EstimateCommands::Reset => {
            service.reset()?;
            println!("Consolidated estimate cleared.");
        }
    }

    Ok(())
}
