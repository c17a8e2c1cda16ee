//! Command-level operations
//!
//! Each function runs one complete command: resolve the dataset (downloading
//! it if needed), transform it, and write a single output file.

use crate::error::{Error, Result};
use crate::reconcile::{check_collection_columns, reconcile_with_stats, ReconcileStats};
use crate::scryfall::{todays_dataset_path, ScryfallClient, SCRYFALL_URL};
use crate::table::{cell_text, value, Row, Table};
use mtg_common::BulkDataType;
use std::path::{Path, PathBuf};

/// Where the card database comes from
#[derive(Debug, Clone)]
pub struct DatasetSource {
    /// Existing local JSON file. When set, nothing is downloaded.
    pub json_db_path: Option<PathBuf>,
    pub bulk_data_type: BulkDataType,
    /// Directory for date-stamped downloads
    pub data_dir: PathBuf,
    /// Reuse today's file if it is already on disk
    pub check_cache: bool,
    pub api_url: String,
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self {
            json_db_path: None,
            bulk_data_type: BulkDataType::default(),
            data_dir: PathBuf::from("."),
            check_cache: true,
            api_url: SCRYFALL_URL.to_string(),
        }
    }
}

impl DatasetSource {
    /// Source backed by an existing local file
    pub fn local<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            json_db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Download the bulk dataset to `output`, or to today's path in
    /// `data_dir` when no output is given
    pub fn fetch(&self, output: Option<&Path>) -> Result<PathBuf> {
        let destination = match output {
            Some(path) => path.to_path_buf(),
            None => todays_dataset_path(&self.data_dir, self.bulk_data_type),
        };
        let client = ScryfallClient::with_base_url(&self.api_url)?;
        client.download(self.bulk_data_type, &destination, self.check_cache)
    }

    /// Path of the dataset file, downloading it unless a local file was given
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.json_db_path {
            Some(path) => Ok(path.clone()),
            None => self.fetch(None),
        }
    }

    /// Resolve and load the dataset as a flattened table
    pub fn load(&self) -> Result<Table> {
        Table::load(self.resolve()?)
    }
}

/// Fail early, before any download or parsing, if `output` is taken
fn ensure_free(output: &Path) -> Result<()> {
    if output.exists() {
        log::error!("Output file already exists: {}", output.display());
        return Err(Error::DestinationExists(output.to_path_buf()));
    }
    Ok(())
}

/// Write the full flattened dataset to `output`. Returns the row count.
pub fn convert_to_csv(source: &DatasetSource, output: &Path) -> Result<usize> {
    ensure_free(output)?;
    let table = source.load()?;
    table.to_csv(output)?;
    Ok(table.len())
}

/// Price the collection CSV at `collection` and write the result to `output`
pub fn reconcile_collection(
    source: &DatasetSource,
    collection: &Path,
    output: &Path,
) -> Result<ReconcileStats> {
    ensure_free(output)?;
    let entries = Table::from_csv(collection)?;
    log::info!(
        "Read {} collection rows from {}",
        entries.len(),
        collection.display()
    );
    check_collection_columns(&entries)?;

    let dataset = source.load()?;
    let (priced, stats) = reconcile_with_stats(&entries, &dataset)?;
    priced.to_csv(output)?;
    Ok(stats)
}

/// Write the sorted distinct set names to `output`. Returns how many.
pub fn write_set_names(source: &DatasetSource, output: &Path) -> Result<usize> {
    ensure_free(output)?;
    let dataset = source.load()?;

    let names = dataset.set_names();
    let mut table = Table::with_columns(["set_name"]);
    for name in &names {
        let mut row = Row::new();
        row.insert("set_name".to_string(), name.clone().into());
        table.push(row);
    }

    table.to_csv(output)?;
    log::info!("Found {} distinct sets", names.len());
    Ok(names.len())
}

/// Cards whose name contains `query`, ignoring case
pub fn search(source: &DatasetSource, query: &str) -> Result<Vec<Row>> {
    let dataset = source.load()?;
    let found: Vec<Row> = dataset.find_cards(query).into_iter().cloned().collect();
    log::info!("{} cards match {:?}", found.len(), query);
    Ok(found)
}

/// One-line summary of a card row: name, set, number and USD prices
pub fn describe_card(card: &Row) -> String {
    let field = |column: &str| value(card, column).and_then(cell_text);
    let price = |column: &str| field(column).unwrap_or_else(|| "-".to_string());

    format!(
        "{} | {} #{} | usd {} | foil {} | etched {}",
        field("name").unwrap_or_default(),
        field("set_name").unwrap_or_default(),
        field("collector_number").unwrap_or_default(),
        price("prices_usd"),
        price("prices_usd_foil"),
        price("prices_usd_etched"),
    )
}
