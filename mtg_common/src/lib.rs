//! Shared types for MTG card data.
//!
//! Holds the closed vocabularies used across tools: card finishes and the
//! Scryfall bulk-data catalogue.

pub mod bulk_data;
pub mod error;
pub mod finish;

pub use bulk_data::{BulkData, BulkDataList, BulkDataType};
pub use error::ParseError;
pub use finish::Finish;
