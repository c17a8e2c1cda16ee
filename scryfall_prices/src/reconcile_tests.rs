//! Tests for collection price reconciliation

use super::{reconcile, reconcile_with_stats, ReconcileStats, OUTPUT_COLUMNS};
use crate::error::Error;
use crate::table::Table;
use serde_json::{json, Map, Value};

fn table(rows: Value) -> Table {
    let records: Vec<Map<String, Value>> = serde_json::from_value(rows).unwrap();
    Table::from_records(records)
}

fn dataset() -> Table {
    table(json!([
        {
            "name": "Lightning Bolt",
            "set_name": "Magic 2010",
            "collector_number": "146",
            "type_line": "Instant",
            "cmc": 1.0,
            "prices": { "usd": "1.25", "usd_foil": "4.50", "usd_etched": null }
        },
        {
            "name": "Sol Ring",
            "set_name": "Commander Legends",
            "collector_number": "472",
            "type_line": "Artifact",
            "cmc": 1.0,
            "prices": { "usd": "2.00", "usd_foil": "6.00", "usd_etched": "12.00" }
        },
        {
            "name": "Black Lotus",
            "set_name": "Limited Edition Alpha",
            "collector_number": "232",
            "type_line": "Artifact",
            "cmc": 0.0,
            "prices": { "usd": null, "usd_foil": "99999.00" }
        }
    ]))
}

fn entry(name: &str, set: &str, cn: &str, finish: &str) -> Value {
    json!({
        "card_name": name,
        "set_name": set,
        "collector_number": cn,
        "finish": finish
    })
}

#[test]
fn foil_uses_foil_price() {
    let collection = table(json!([entry("Lightning Bolt", "Magic 2010", "146", "foil")]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.get(0, "price"), Some(&json!("4.50")));
    assert_eq!(out.get(0, "type_line"), Some(&json!("Instant")));
    assert_eq!(out.get(0, "mana_value"), Some(&json!(1.0)));
}

#[test]
fn each_finish_selects_its_column() {
    let collection = table(json!([
        entry("Sol Ring", "Commander Legends", "472", "nonfoil"),
        entry("Sol Ring", "Commander Legends", "472", "foil"),
        entry("Sol Ring", "Commander Legends", "472", "etched"),
    ]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.get(0, "price"), Some(&json!("2.00")));
    assert_eq!(out.get(1, "price"), Some(&json!("6.00")));
    assert_eq!(out.get(2, "price"), Some(&json!("12.00")));
}

#[test]
fn name_match_ignores_case() {
    let collection = table(json!([entry("LIGHTNING bolt", "Magic 2010", "146", "nonfoil")]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.get(0, "price"), Some(&json!("1.25")));
    // the collection's spelling is kept
    assert_eq!(out.get(0, "card_name"), Some(&json!("LIGHTNING bolt")));
}

#[test]
fn set_and_collector_number_must_match_exactly() {
    let collection = table(json!([
        entry("Lightning Bolt", "magic 2010", "146", "nonfoil"),
        entry("Lightning Bolt", "Magic 2010", "147", "nonfoil"),
    ]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(stats.unmatched, 2);
    assert_eq!(out.get(0, "price"), None);
    assert_eq!(out.get(1, "price"), None);
}

#[test]
fn unmatched_row_is_kept_without_card_data() {
    let collection = table(json!([entry("Nonexistent Card", "Nowhere", "1", "nonfoil")]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.get(0, "card_name"), Some(&json!("Nonexistent Card")));
    assert_eq!(out.get(0, "price"), None);
    assert_eq!(out.get(0, "type_line"), None);
    assert_eq!(out.get(0, "mana_value"), None);
}

#[test]
fn finish_must_match_exact_spelling() {
    let collection = table(json!([
        entry("Lightning Bolt", "Magic 2010", "146", "FOIL"),
        entry("Sol Ring", "Commander Legends", "472", "NonFoil"),
    ]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out.get(0, "price"), None);
    assert_eq!(out.get(0, "finish"), Some(&json!("FOIL")));
    assert_eq!(out.get(1, "price"), None);
    assert_eq!(stats.unknown_finish, 2);
    assert_eq!(stats.matched, 2);
}

#[test]
fn unknown_finish_leaves_price_empty_and_is_counted() {
    let collection = table(json!([
        entry("Lightning Bolt", "Magic 2010", "146", "signed"),
        entry("Lightning Bolt", "Magic 2010", "146", "foil"),
    ]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out.get(0, "price"), None);
    assert_eq!(out.get(0, "finish"), Some(&json!("signed")));
    // card metadata is still joined
    assert_eq!(out.get(0, "type_line"), Some(&json!("Instant")));
    assert_eq!(out.get(1, "price"), Some(&json!("4.50")));
    assert_eq!(stats.unknown_finish, 1);
}

#[test]
fn missing_finish_cell_counts_as_unknown() {
    let collection = table(json!([{
        "card_name": "Sol Ring",
        "set_name": "Commander Legends",
        "collector_number": "472",
        "finish": null
    }]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.get(0, "price"), None);
    assert_eq!(stats.unknown_finish, 1);
}

#[test]
fn null_finish_price_is_missing() {
    // Lightning Bolt has no etched printing price
    let collection = table(json!([entry("Lightning Bolt", "Magic 2010", "146", "etched")]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.get(0, "price"), None);
    assert_eq!(stats.matched, 1);
    assert_eq!(stats.priced, 0);
}

#[test]
fn cards_without_base_price_are_excluded() {
    // Black Lotus only has a foil price, so it never joins, even for foil
    let collection = table(json!([entry("Black Lotus", "Limited Edition Alpha", "232", "foil")]));

    let (out, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.get(0, "price"), None);
    assert_eq!(out.get(0, "type_line"), None);
    assert_eq!(stats.unmatched, 1);
}

#[test]
fn duplicate_collection_rows_are_kept() {
    let collection = table(json!([
        entry("Sol Ring", "Commander Legends", "472", "foil"),
        entry("Sol Ring", "Commander Legends", "472", "foil"),
    ]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out.rows()[0], out.rows()[1]);
}

#[test]
fn duplicate_dataset_matches_multiply_rows() {
    let mut records = dataset();
    let reprint: Map<String, Value> = serde_json::from_value(json!({
        "name": "Sol Ring",
        "set_name": "Commander Legends",
        "collector_number": "472",
        "type_line": "Artifact",
        "cmc": 1.0,
        "prices": { "usd": "2.10", "usd_foil": "6.60" }
    }))
    .unwrap();
    records.push(crate::flatten::flatten(&reprint));
    let collection = table(json!([entry("Sol Ring", "Commander Legends", "472", "foil")]));

    let (out, stats) = reconcile_with_stats(&collection, &records).unwrap();

    // left-join semantics: one output row per matching card, dataset order
    assert_eq!(out.len(), 2);
    assert_eq!(out.get(0, "price"), Some(&json!("6.00")));
    assert_eq!(out.get(1, "price"), Some(&json!("6.60")));
    assert_eq!(stats.matched, 1);
    assert_eq!(stats.output_rows, 2);
}

#[test]
fn output_has_fixed_columns_and_drops_extras() {
    let collection = table(json!([{
        "card_name": "Sol Ring",
        "set_name": "Commander Legends",
        "collector_number": "472",
        "finish": "nonfoil",
        "location": "binder 3",
        "quantity": "2"
    }]));

    let out = reconcile(&collection, &dataset()).unwrap();

    assert_eq!(out.columns(), &OUTPUT_COLUMNS);
    assert!(!out.has_column("location"));
    assert!(!out.rows()[0].contains_key("location"));
}

#[test]
fn missing_required_column_is_an_error() {
    let collection = table(json!([{
        "card_name": "Sol Ring",
        "set_name": "Commander Legends",
        "collector_number": "472"
    }]));

    let result = reconcile(&collection, &dataset());

    assert!(matches!(result, Err(Error::MissingColumn(ref c)) if c == "finish"));
}

#[test]
fn collection_order_is_preserved() {
    let collection = table(json!([
        entry("Unknown", "X", "9", "foil"),
        entry("Sol Ring", "Commander Legends", "472", "nonfoil"),
        entry("Lightning Bolt", "Magic 2010", "146", "nonfoil"),
    ]));

    let out = reconcile(&collection, &dataset()).unwrap();
    let names: Vec<&Value> = out.rows().iter().map(|row| &row["card_name"]).collect();

    assert_eq!(
        names,
        vec![&json!("Unknown"), &json!("Sol Ring"), &json!("Lightning Bolt")]
    );
}

#[test]
fn stats_add_up() {
    let collection = table(json!([
        entry("Sol Ring", "Commander Legends", "472", "foil"),
        entry("Lightning Bolt", "Magic 2010", "146", "scratched"),
        entry("Nope", "Nope", "0", "nonfoil"),
    ]));

    let (_, stats) = reconcile_with_stats(&collection, &dataset()).unwrap();

    assert_eq!(
        stats,
        ReconcileStats {
            collection_rows: 3,
            output_rows: 3,
            matched: 2,
            unmatched: 1,
            unknown_finish: 1,
            priced: 1,
        }
    );
}

#[test]
fn empty_collection_gives_empty_output() {
    let collection = Table::with_columns(["card_name", "set_name", "collector_number", "finish"]);

    let out = reconcile(&collection, &dataset()).unwrap();

    assert!(out.is_empty());
    assert_eq!(out.columns(), &OUTPUT_COLUMNS);
}
