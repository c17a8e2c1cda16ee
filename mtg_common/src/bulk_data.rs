//! Scryfall bulk-data catalogue types
//!
//! Scryfall publishes periodically regenerated snapshots of its card database.
//! The `/bulk-data` endpoint lists them; each entry names a dataset type and
//! the URI of its current file.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bulk datasets published by Scryfall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkDataType {
    OracleCards,
    UniqueArtwork,
    #[default]
    DefaultCards,
    AllCards,
    Rulings,
}

impl BulkDataType {
    /// Returns the identifier Scryfall uses in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkDataType::OracleCards => "oracle_cards",
            BulkDataType::UniqueArtwork => "unique_artwork",
            BulkDataType::DefaultCards => "default_cards",
            BulkDataType::AllCards => "all_cards",
            BulkDataType::Rulings => "rulings",
        }
    }

    pub fn all() -> &'static [BulkDataType] {
        &[
            BulkDataType::OracleCards,
            BulkDataType::UniqueArtwork,
            BulkDataType::DefaultCards,
            BulkDataType::AllCards,
            BulkDataType::Rulings,
        ]
    }
}

impl fmt::Display for BulkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkDataType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BulkDataType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownBulkDataType(s.to_string()))
    }
}

/// One entry of the `/bulk-data` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkData {
    /// Raw `type` field. Kept as text so that datasets added by Scryfall later
    /// do not break parsing of the whole listing.
    #[serde(rename = "type")]
    pub kind: String,
    pub download_uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl BulkData {
    /// The dataset type, if it is one we know about
    pub fn bulk_data_type(&self) -> Option<BulkDataType> {
        self.kind.parse().ok()
    }
}

/// Response body of the `/bulk-data` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDataList {
    #[serde(default)]
    pub data: Vec<BulkData>,
}

impl BulkDataList {
    /// Select the descriptor for `wanted`. `None` means the registry does not
    /// currently offer that dataset.
    pub fn find(self, wanted: BulkDataType) -> Option<BulkData> {
        self.data
            .into_iter()
            .find(|entry| entry.bulk_data_type() == Some(wanted))
    }
}
