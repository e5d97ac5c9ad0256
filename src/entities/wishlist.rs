//! Wishlist item - a future purchase, independent of current stock

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::core::error::InventoryError;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::store::{optional_text, parse_text_column, Record};

/// How badly the item is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum WishPriority {
    #[default]
    Low,
    Needed,
    Urgent,
}

impl std::fmt::Display for WishPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WishPriority::Low => write!(f, "low"),
            WishPriority::Needed => write!(f, "needed"),
            WishPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for WishPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(WishPriority::Low),
            "needed" => Ok(WishPriority::Needed),
            "urgent" => Ok(WishPriority::Urgent),
            _ => Err(format!(
                "Invalid priority: {}. Use low, needed, or urgent",
                s
            )),
        }
    }
}

/// Purchase state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum WishStatus {
    #[default]
    ToBuy,
    Bought,
}

impl std::fmt::Display for WishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WishStatus::ToBuy => write!(f, "to_buy"),
            WishStatus::Bought => write!(f, "bought"),
        }
    }
}

impl std::str::FromStr for WishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to_buy" | "tobuy" => Ok(WishStatus::ToBuy),
            "bought" => Ok(WishStatus::Bought),
            _ => Err(format!("Invalid wishlist status: {}. Use to_buy or bought", s)),
        }
    }
}

/// A wishlist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Store-assigned id (WISH@N)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    pub product: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default)]
    pub priority: WishPriority,

    /// Shop or product link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default)]
    pub status: WishStatus,
}

impl WishlistItem {
    /// Create an entry marked to buy
    pub fn new(
        product: impl Into<String>,
        color: Option<String>,
        priority: WishPriority,
        link: Option<String>,
    ) -> Result<Self, InventoryError> {
        let product = product.into();
        if product.trim().is_empty() {
            return Err(InventoryError::validation("product", "must not be empty"));
        }

        Ok(Self {
            id: None,
            product,
            color: color.filter(|c| !c.trim().is_empty()),
            priority,
            link: link.filter(|l| !l.trim().is_empty()),
            status: WishStatus::ToBuy,
        })
    }
}

impl Record for WishlistItem {
    const TABLE: &'static str = "wishlist";
    const PREFIX: RecordPrefix = RecordPrefix::Wish;
    const COLUMNS: &'static [&'static str] = &["product", "color", "priority", "link", "status"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.product.clone()),
            optional_text(&self.color),
            Value::Text(self.priority.to_string()),
            optional_text(&self.link),
            Value::Text(self.status.to_string()),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            product: row.get(1)?,
            color: row.get(2)?,
            priority: parse_text_column(row, 3)?,
            link: row.get(4)?,
            status: parse_text_column(row, 5)?,
        })
    }
}
