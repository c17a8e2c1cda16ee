//! In-memory card table
//!
//! A table is an ordered list of flattened rows plus the union of their
//! column names in first-seen order. A cell that is absent from a row, or
//! holds JSON `null`, is a missing value.

use crate::error::{Error, Result};
use crate::flatten::{flatten, FlatRecord};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// One table row
pub type Row = FlatRecord;

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    known: HashSet<String>,
    rows: Vec<Row>,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with a fixed column order
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.add_column(column.into());
        }
        table
    }

    /// Build a table from raw (nested) records, flattening each one
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let mut table = Self::new();
        for record in records {
            table.push(flatten(&record));
        }
        table
    }

    /// Load a JSON array of card records, as downloaded from Scryfall
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading card database: {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let records: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
        let table = Self::from_records(records);

        log::info!(
            "Loaded {} cards with {} columns",
            table.len(),
            table.columns.len()
        );
        Ok(table)
    }

    /// Read a CSV file with a header row. Every cell is text; empty cells
    /// are missing values.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading CSV: {}", path.display());

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = rdr.headers()?.clone();
        let mut table = Self::with_columns(headers.iter());

        for result in rdr.records() {
            let record = result?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .filter(|(_, field)| !field.is_empty())
                .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
                .collect();
            table.push(row);
        }

        log::debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Write the table as CSV to a new file.
    ///
    /// Fails with [`Error::DestinationExists`] if anything is already at
    /// `path`; the existing file is left untouched.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(Error::DestinationExists(path.to_path_buf()));
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::DestinationExists(path.to_path_buf()),
                _ => Error::Io(e),
            })?;

        self.write_csv(BufWriter::new(file))?;
        log::info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Write the header and all rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        if !self.columns.is_empty() {
            wtr.write_record(&self.columns)?;
            for row in &self.rows {
                wtr.write_record(
                    self.columns
                        .iter()
                        .map(|column| row.get(column).and_then(cell_text).unwrap_or_default()),
                )?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    /// Append a row, registering any columns not seen before
    pub fn push(&mut self, row: Row) {
        for key in row.keys() {
            if !self.known.contains(key) {
                self.add_column(key.clone());
            }
        }
        self.rows.push(row);
    }

    fn add_column(&mut self, column: String) {
        if self.known.insert(column.clone()) {
            self.columns.push(column);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.known.contains(column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (`row`, `column`), `None` when absent or null
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| value(r, column))
    }

    /// New table with only the rows matching `keep`, columns unchanged
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            known: self.known.clone(),
            rows: self.rows.iter().filter(|row| keep(*row)).cloned().collect(),
        }
    }

    /// Sorted, distinct `set_name` values
    pub fn set_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| value(row, "set_name").and_then(cell_text))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose `name` contains `query`, ignoring case
    pub fn find_cards(&self, query: &str) -> Vec<&Row> {
        let query = query.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                value(row, "name")
                    .and_then(Value::as_str)
                    .map(|name| name.to_lowercase().contains(&query))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Value of `column` in `row`, treating JSON `null` as missing
pub fn value<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

/// Text form of a cell as written to CSV. `None` for null.
///
/// Strings are written verbatim, numbers and booleans as JSON literals,
/// arrays and objects as compact JSON.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
