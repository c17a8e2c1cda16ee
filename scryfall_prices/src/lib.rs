//! Scryfall Prices - MTG bulk data and collection pricing
//!
//! Downloads Scryfall bulk card data, flattens the nested card records into
//! CSV-ready tables and prices a personal collection against them.

pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod reconcile;
pub mod scryfall;
pub mod table;

pub use error::{Error, Result};
pub use flatten::flatten;
pub use pipeline::DatasetSource;
pub use reconcile::{reconcile, reconcile_with_stats, ReconcileStats};
pub use scryfall::ScryfallClient;
pub use table::Table;
