use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use manhours_cli::cli::{
    handle_estimate_command, handle_extract, handle_extract_status, handle_group_command,
    handle_item_command, handle_manpower_command,
};
use manhours_cli::config::{paths::ManhoursPaths, settings::Settings};
use manhours_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "manhours",
    version,
    about = "Manhour and cost estimation from predefined item groups",
    long_about = "manhours builds cost estimates from catalogued item groups. Open a \
                  group, adjust days and persons, finish it into the consolidated \
                  estimate, and export the result as a spreadsheet."
)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Item group management
    #[command(subcommand)]
    Group(manhours_cli::cli::GroupCommands),

    /// Group item management
    #[command(subcommand)]
    Item(manhours_cli::cli::ItemCommands),

    /// Manpower catalogue
    #[command(subcommand)]
    Manpower(manhours_cli::cli::ManpowerCommands),

    /// Estimating session: open a group, edit rows, finish, export
    #[command(subcommand, alias = "est")]
    Estimate(manhours_cli::cli::EstimateCommands),

    /// Extract an MTO table from a PDF and export it as a workbook
    Extract {
        /// Path to the PDF
        pdf: PathBuf,
        /// Workbook to write (defaults to the configured MTO file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the extracted rows as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show whether MTO extraction is configured
    #[command(name = "extract-status")]
    ExtractStatus,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config {
        /// Set the currency code used in totals and column titles
        #[arg(long)]
        currency: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let paths = ManhoursPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Group(cmd)) => {
            handle_group_command(&storage, cmd)?;
        }
        Some(Commands::Item(cmd)) => {
            handle_item_command(&storage, cmd)?;
        }
        Some(Commands::Manpower(cmd)) => {
            handle_manpower_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Estimate(cmd)) => {
            handle_estimate_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Extract { pdf, output, json }) => {
            handle_extract(&settings, &pdf, output, json)?;
        }
        Some(Commands::ExtractStatus) => handle_extract_status(&settings),
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing manhours-cli at: {}", paths.base_dir().display());
            manhours_cli::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  manhours group create <name>");
            println!("  manhours item add <group> <description> --unit MH --rate <rate>");
            println!("  manhours estimate open <group>");
        }
        Some(Commands::Config { currency }) => {
            if let Some(code) = currency {
                settings.currency_code = code.trim().to_uppercase();
                settings.save(&paths)?;
            }
            println!("manhours-cli Configuration");
            println!("==========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:           {}", settings.currency_code);
            println!("  Manhours workbook:  {}", settings.manhours_export_file);
            println!("  MTO workbook:       {}", settings.mto_export_file);
            println!("  Model:              {}", settings.llm.model);
            println!("  API key variable:   {}", settings.llm.api_key_env);
        }
        None => {
            println!("manhours - manhour and cost estimation");
            println!();
            println!("Run 'manhours --help' for usage information.");
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MANHOURS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
