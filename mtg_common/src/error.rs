//! Error types for mtg_common

use thiserror::Error;

/// Failure to read one of the closed vocabularies from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown finish: {0}")]
    UnknownFinish(String),
    #[error("unknown bulk data type: {0}")]
    UnknownBulkDataType(String),
}
