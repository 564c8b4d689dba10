//! Warehouse CLI - inventory tracking on a CSV file
//!
//! Without a subcommand an interactive menu runs; each subcommand performs
//! the matching menu action once and exits.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use warehouse::error::Result;
use warehouse::inventory::Inventory;
use warehouse::logging::{self, Verbosity};
use warehouse::progress::ProgressBar;
use warehouse::record::{ItemUpdate, Record};
use warehouse::shell::{self, Shell};
use warehouse::store::{DEFAULT_FILENAME, RecordStore};

#[derive(Parser)]
#[command(name = "warehouse")]
#[command(version)]
#[command(about = "Warehouse inventory tracker.", long_about = None)]
struct Cli {
    /// Path to the inventory CSV file
    #[arg(short, long, global = true, value_name = "FILE", default_value = DEFAULT_FILENAME)]
    file: PathBuf,

    /// Delay between progress bar steps, in milliseconds
    #[arg(long, global = true, value_name = "MS", default_value_t = 100)]
    progress_delay_ms: u64,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item
    #[command(alias = "a")]
    Add {
        /// Item name
        item: String,

        /// Quantity on hand
        #[arg(short = 'n', long)]
        quantity: String,

        /// Expiration date (YYYY-MM-DD)
        #[arg(short, long, value_name = "DATE")]
        expiration_date: String,

        /// Unit price
        #[arg(short, long)]
        price: String,
    },

    /// Remove every record with this name (any case)
    #[command(alias = "rm")]
    Remove {
        /// Item name
        item: String,
    },

    /// Update fields of every record with exactly this name
    #[command(alias = "u")]
    Update {
        /// Item name
        item: String,

        /// New quantity
        #[arg(short = 'n', long)]
        quantity: Option<String>,

        /// New expiration date (YYYY-MM-DD)
        #[arg(short, long, value_name = "DATE")]
        expiration_date: Option<String>,

        /// New unit price
        #[arg(short, long)]
        price: Option<String>,
    },

    /// Print every record as stored
    #[command(alias = "ls")]
    List,

    /// Print the full report ordered by expiration date
    #[command(alias = "r")]
    Report,

    /// Print items whose expiration date has passed
    #[command(alias = "x")]
    Expired,

    /// Search for an item by name (any case)
    #[command(alias = "s")]
    Search {
        /// Item name
        item: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e.describe());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let progress = ProgressBar::new(Duration::from_millis(cli.progress_delay_ms));
    let mut inventory = Inventory::open(RecordStore::new(cli.file), progress)?;

    let Some(command) = cli.command else {
        let mut shell = Shell::new(io::stdin().lock(), io::stdout());
        return shell.run(&mut inventory);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let out: &mut dyn Write = &mut out;
    match command {
        Commands::Add {
            item,
            quantity,
            expiration_date,
            price,
        } => inventory.add_item(out, Record::new(item, quantity, expiration_date, price)),
        Commands::Remove { item } => inventory.remove_item(out, &item).map(drop),
        Commands::Update {
            item,
            quantity,
            expiration_date,
            price,
        } => {
            // An empty value keeps the current field, as a blank menu answer does.
            let update = ItemUpdate::from_inputs(
                quantity.as_deref().unwrap_or_default(),
                expiration_date.as_deref().unwrap_or_default(),
                price.as_deref().unwrap_or_default(),
            );
            inventory.update_item(out, &item, &update).map(drop)
        }
        Commands::List => shell::write_raw(out, inventory.records()),
        Commands::Report => inventory.full_report(out).map(drop),
        Commands::Expired => inventory.expired_items(out).map(drop),
        Commands::Search { item } => inventory.search_item(out, &item).map(drop),
    }
}
