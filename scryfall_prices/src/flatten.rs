//! Flattening of nested card records into single-level rows

use serde_json::{Map, Value};

/// One flattened record: column name to leaf value
pub type FlatRecord = Map<String, Value>;

/// Separator placed between the segments of a nested key path
pub const SEPARATOR: &str = "_";

/// Flatten a nested JSON object.
///
/// Nested objects are inlined with their keys prefixed by the parent key and
/// [`SEPARATOR`], so `{"prices": {"usd": "1"}}` becomes `{"prices_usd": "1"}`.
/// Arrays and scalars are kept whole. Key order follows the input.
pub fn flatten(record: &Map<String, Value>) -> FlatRecord {
    let mut flat = Map::new();
    flatten_into(&mut flat, None, record);
    flat
}

fn flatten_into(flat: &mut FlatRecord, prefix: Option<&str>, record: &Map<String, Value>) {
    for (key, value) in record {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(flat, Some(&path), nested),
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}
