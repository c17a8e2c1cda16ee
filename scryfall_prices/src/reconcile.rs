//! Collection price reconciliation
//!
//! Left-joins a user's collection against the Scryfall card table on
//! (lower-cased name, set name, collector number) and picks the USD price
//! matching each entry's finish.

use crate::error::{Error, Result};
use crate::table::{cell_text, value, Row, Table};
use mtg_common::Finish;
use serde_json::Value;
use std::collections::HashMap;

/// Columns a collection file must provide
pub const COLLECTION_COLUMNS: [&str; 4] = ["card_name", "set_name", "collector_number", "finish"];

/// Columns of the reconciled output, in order
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "card_name",
    "set_name",
    "collector_number",
    "finish",
    "type_line",
    "mana_value",
    "price",
];

/// Dataset column that must be present for a card to take part in the join
const BASE_PRICE_COLUMN: &str = "prices_usd";
/// Scryfall's name for the mana value
const MANA_VALUE_COLUMN: &str = "cmc";

/// (lower-cased name, set name, collector number)
type JoinKey = (String, String, String);

/// Counters describing one reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Collection rows read
    pub collection_rows: usize,
    /// Rows written to the output (more than the collection on duplicate matches)
    pub output_rows: usize,
    /// Collection rows with at least one dataset match
    pub matched: usize,
    /// Collection rows with no dataset match
    pub unmatched: usize,
    /// Collection rows whose finish is not foil, nonfoil or etched
    pub unknown_finish: usize,
    /// Output rows that ended up with a price
    pub priced: usize,
}

/// Join `collection` against `dataset` and compute a `price` column.
///
/// See [`reconcile_with_stats`].
pub fn reconcile(collection: &Table, dataset: &Table) -> Result<Table> {
    reconcile_with_stats(collection, dataset).map(|(table, _)| table)
}

/// Join `collection` against `dataset`, returning the enriched table and run
/// counters.
///
/// Dataset cards without a base USD price are dropped before the join. Every
/// collection row appears in the output at least once; a key matching several
/// dataset cards yields one output row per card. An unknown finish leaves the
/// price empty and is logged, the row is still emitted.
pub fn reconcile_with_stats(
    collection: &Table,
    dataset: &Table,
) -> Result<(Table, ReconcileStats)> {
    check_collection_columns(collection)?;

    let priced_cards = dataset.filter(|card| value(card, BASE_PRICE_COLUMN).is_some());
    log::info!(
        "{} of {} cards have a USD price",
        priced_cards.len(),
        dataset.len()
    );

    let mut index: HashMap<JoinKey, Vec<&Row>> = HashMap::new();
    for card in priced_cards.rows() {
        if let Some(key) = join_key(card, "name") {
            index.entry(key).or_default().push(card);
        }
    }

    let mut output = Table::with_columns(OUTPUT_COLUMNS);
    let mut stats = ReconcileStats::default();

    for (line, entry) in collection.rows().iter().enumerate() {
        stats.collection_rows += 1;

        let finish = entry_finish(entry);
        if finish.is_none() {
            stats.unknown_finish += 1;
            log::warn!(
                "Unknown finish {:?} for {} ({} #{}) on row {}, price left empty",
                text(entry, "finish").unwrap_or_default(),
                text(entry, "card_name").unwrap_or_default(),
                text(entry, "set_name").unwrap_or_default(),
                text(entry, "collector_number").unwrap_or_default(),
                line + 1
            );
        }

        match join_key(entry, "card_name").and_then(|key| index.get(&key)) {
            Some(cards) => {
                stats.matched += 1;
                if cards.len() > 1 {
                    log::debug!(
                        "{} dataset cards match {} ({} #{})",
                        cards.len(),
                        text(entry, "card_name").unwrap_or_default(),
                        text(entry, "set_name").unwrap_or_default(),
                        text(entry, "collector_number").unwrap_or_default()
                    );
                }
                for card in cards {
                    output.push(enriched(entry, Some(*card), finish));
                }
            }
            None => {
                stats.unmatched += 1;
                output.push(enriched(entry, None, finish));
            }
        }
    }

    stats.output_rows = output.len();
    stats.priced = output
        .rows()
        .iter()
        .filter(|row| value(row, "price").is_some())
        .count();

    log::info!(
        "Reconciled {} collection rows: {} matched, {} unmatched, {} unknown finish, {} priced",
        stats.collection_rows,
        stats.matched,
        stats.unmatched,
        stats.unknown_finish,
        stats.priced
    );

    Ok((output, stats))
}

/// Fail with [`Error::MissingColumn`] unless `collection` has every
/// column in [`COLLECTION_COLUMNS`]
pub fn check_collection_columns(collection: &Table) -> Result<()> {
    for column in COLLECTION_COLUMNS {
        if !collection.has_column(column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Build the join key from `name_column`, `set_name` and `collector_number`.
/// `None` when any part is missing.
fn join_key(row: &Row, name_column: &str) -> Option<JoinKey> {
    Some((
        text(row, name_column)?.to_lowercase(),
        text(row, "set_name")?,
        text(row, "collector_number")?,
    ))
}

fn entry_finish(entry: &Row) -> Option<Finish> {
    value(entry, "finish")
        .and_then(Value::as_str)
        .and_then(|finish| finish.parse().ok())
}

fn text(row: &Row, column: &str) -> Option<String> {
    value(row, column).and_then(cell_text)
}

fn enriched(entry: &Row, card: Option<&Row>, finish: Option<Finish>) -> Row {
    let mut row = Row::new();
    let mut copy = |column: &str, source: Option<&Value>| {
        if let Some(v) = source {
            row.insert(column.to_string(), v.clone());
        }
    };

    copy("card_name", value(entry, "card_name"));
    copy("set_name", value(entry, "set_name"));
    copy("collector_number", value(entry, "collector_number"));
    copy("finish", value(entry, "finish"));

    if let Some(card) = card {
        copy("type_line", value(card, "type_line"));
        copy("mana_value", value(card, MANA_VALUE_COLUMN));
        copy(
            "price",
            finish.and_then(|finish| value(card, finish.usd_price_column())),
        );
    }

    row
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
