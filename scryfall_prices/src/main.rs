//! Scryfall Prices - MTG bulk data and collection pricing
//!
//! Fetches Scryfall bulk data, converts it to CSV and prices a card
//! collection. Runs one command and exits.

use clap::{Parser, Subcommand};
use mtg_common::BulkDataType;
use scryfall_prices::pipeline::{self, DatasetSource};
use scryfall_prices::scryfall::SCRYFALL_URL;
use scryfall_prices::Result;
use std::path::PathBuf;

/// Scryfall bulk data downloader and collection price reconciler
#[derive(Parser, Debug)]
#[command(name = "scryfall_prices")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory for date-stamped bulk data downloads
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Scryfall API base URL
    #[arg(long, global = true, default_value = SCRYFALL_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

/// Options selecting the card database
#[derive(clap::Args, Debug)]
struct DatasetArgs {
    /// Path to a Scryfall bulk data JSON file on your local machine.
    /// Downloaded when omitted.
    #[arg(long)]
    json_db_path: Option<PathBuf>,

    /// Bulk data type to download
    #[arg(long, default_value_t = BulkDataType::DefaultCards)]
    bulk_data_type: BulkDataType,

    /// Download again even if today's file already exists
    #[arg(long, default_value_t = false)]
    refresh: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download a bulk data file
    Fetch {
        /// Destination path (default: <data-dir>/<date>_<type>_scryfall.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bulk data type to download
        #[arg(long, default_value_t = BulkDataType::DefaultCards)]
        bulk_data_type: BulkDataType,

        /// Download again even if the destination already exists
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Convert the card database to a flat CSV
    ToCsv {
        /// Path to where the CSV will be written on your local machine
        #[arg(short, long, visible_alias = "output-path")]
        output: PathBuf,

        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Price a collection CSV (card_name, set_name, collector_number, finish)
    Reconcile {
        /// Collection CSV file
        #[arg(short, long)]
        collection: PathBuf,

        /// Path to where the priced CSV will be written
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Write the sorted list of distinct set names to a CSV
    SetNames {
        /// Path to where the CSV will be written
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// List cards whose name contains the given text
    Search {
        /// Card name or part of it
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        dataset: DatasetArgs,
    },
}

impl Args {
    fn source(&self, dataset: &DatasetArgs) -> DatasetSource {
        DatasetSource {
            json_db_path: dataset.json_db_path.clone(),
            bulk_data_type: dataset.bulk_data_type,
            data_dir: self.data_dir.clone(),
            check_cache: !dataset.refresh,
            api_url: self.api_url.clone(),
        }
    }
}

fn main() {
    // Set RUST_LOG to control the level, e.g. RUST_LOG=scryfall_prices=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Fetch {
            output,
            bulk_data_type,
            refresh,
        } => {
            let source = DatasetSource {
                json_db_path: None,
                bulk_data_type: *bulk_data_type,
                data_dir: args.data_dir.clone(),
                check_cache: !refresh,
                api_url: args.api_url.clone(),
            };
            let path = source.fetch(output.as_deref())?;
            println!("{}", path.display());
        }
        Command::ToCsv { output, dataset } => {
            let rows = pipeline::convert_to_csv(&args.source(dataset), output)?;
            log::info!("Converted {} cards to {}", rows, output.display());
        }
        Command::Reconcile {
            collection,
            output,
            dataset,
        } => {
            let stats = pipeline::reconcile_collection(&args.source(dataset), collection, output)?;
            if stats.unknown_finish > 0 {
                log::warn!(
                    "{} collection rows had an unknown finish and were left unpriced",
                    stats.unknown_finish
                );
            }
            log::info!(
                "Wrote {} priced rows to {}",
                stats.output_rows,
                output.display()
            );
        }
        Command::SetNames { output, dataset } => {
            pipeline::write_set_names(&args.source(dataset), output)?;
        }
        Command::Search { name, dataset } => {
            for card in pipeline::search(&args.source(dataset), name)? {
                println!("{}", pipeline::describe_card(&card));
            }
        }
    }
    Ok(())
}
