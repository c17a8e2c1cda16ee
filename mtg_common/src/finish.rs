use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical print treatment of a card. Each finish has its own market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Nonfoil,
    Foil,
    Etched,
}

impl Finish {
    /// Returns the Scryfall spelling (e.g., "nonfoil", "etched")
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Nonfoil => "nonfoil",
            Finish::Foil => "foil",
            Finish::Etched => "etched",
        }
    }

    /// Name of the flattened Scryfall column holding the USD price for this finish
    pub fn usd_price_column(&self) -> &'static str {
        match self {
            Finish::Nonfoil => "prices_usd",
            Finish::Foil => "prices_usd_foil",
            Finish::Etched => "prices_usd_etched",
        }
    }

    /// Returns all finishes
    pub fn all() -> &'static [Finish] {
        &[Finish::Nonfoil, Finish::Foil, Finish::Etched]
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finish {
    type Err = ParseError;

    /// Only the exact Scryfall spellings are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nonfoil" => Ok(Finish::Nonfoil),
            "foil" => Ok(Finish::Foil),
            "etched" => Ok(Finish::Etched),
            _ => Err(ParseError::UnknownFinish(s.to_string())),
        }
    }
}
