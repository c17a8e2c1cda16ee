//! Error types for scryfall_prices

use mtg_common::BulkDataType;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for scryfall_prices operations
#[derive(Debug, Error)]
pub enum PricesError {
    /// HTTP request failed (network error, connection refused, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code from the registry or the download host
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Failed to parse JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Failed to read or write CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The registry does not offer the requested dataset
    #[error("Bulk data type not available from Scryfall: {0}")]
    BulkDataNotFound(BulkDataType),
    /// Refusing to overwrite an existing output file
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    /// A required column is missing from an input table
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Short alias used throughout the crate
pub type Error = PricesError;

/// Result alias for scryfall_prices operations
pub type Result<T> = std::result::Result<T, PricesError>;
