//! Record identity: store-assigned integer ids with a display prefix
//!
//! Ids are plain SQLite rowids so they follow insertion order. For display
//! they are shown as `PREFIX@N` (e.g. `LOT@3`), and the CLI accepts either
//! that form or the bare number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Record type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordPrefix {
    /// Stock lot
    Lot,
    /// Usage (consumption) record
    Use,
    /// Wishlist item
    Wish,
}

impl RecordPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Lot => "LOT",
            RecordPrefix::Use => "USE",
            RecordPrefix::Wish => "WISH",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [RecordPrefix] {
        &[RecordPrefix::Lot, RecordPrefix::Use, RecordPrefix::Wish]
    }
}

impl fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::all()
            .iter()
            .find(|p| p.as_str() == upper)
            .copied()
            .ok_or_else(|| IdParseError::UnknownPrefix(s.to_string()))
    }
}

/// Store-assigned record id
pub type RecordId = i64;

/// Errors from parsing a record reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("unknown record prefix: {0}")]
    UnknownPrefix(String),

    #[error("expected a {expected} reference, got {found}")]
    WrongPrefix {
        expected: RecordPrefix,
        found: RecordPrefix,
    },

    #[error("invalid record number: {0}")]
    InvalidNumber(String),
}

/// Format an id as a short reference (`LOT@3`)
pub fn format_ref(prefix: RecordPrefix, id: RecordId) -> String {
    format!("{}@{}", prefix.as_str(), id)
}

/// Parse `LOT@3`, `lot@3` or `3` into a record id of the expected kind
pub fn parse_ref(input: &str, expected: RecordPrefix) -> Result<RecordId, IdParseError> {
    let input = input.trim();
    let number = match input.split_once('@') {
        Some((prefix, number)) => {
            let found: RecordPrefix = prefix.parse()?;
            if found != expected {
                return Err(IdParseError::WrongPrefix { expected, found });
            }
            number
        }
        None => input,
    };

    number
        .parse::<RecordId>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| IdParseError::InvalidNumber(number.to_string()))
}
