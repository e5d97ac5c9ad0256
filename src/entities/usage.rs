//! Usage record - one consumption event in the append-only ledger

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::core::error::InventoryError;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::store::{datetime_from_row, datetime_to_sql, optional_text, Record};

/// A length of thread taken from a lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Store-assigned id (USE@N)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Lot the thread was taken from
    pub stock_lot_id: RecordId,

    /// Meters consumed
    pub quantity_used: f64,

    pub used_at: DateTime<Utc>,

    /// Project the thread went into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl UsageRecord {
    /// Create a record stamped now; `quantity_m` must be positive
    pub fn new(
        stock_lot_id: RecordId,
        quantity_m: f64,
        project: Option<String>,
    ) -> Result<Self, InventoryError> {
        if !quantity_m.is_finite() || quantity_m <= 0.0 {
            return Err(InventoryError::validation(
                "amount",
                format!("must be greater than 0, got {}", quantity_m),
            ));
        }

        Ok(Self {
            id: None,
            stock_lot_id,
            quantity_used: quantity_m,
            used_at: Utc::now(),
            project: project.filter(|p| !p.trim().is_empty()),
        })
    }
}

impl Record for UsageRecord {
    const TABLE: &'static str = "usage_history";
    const PREFIX: RecordPrefix = RecordPrefix::Use;
    const COLUMNS: &'static [&'static str] =
        &["stock_lot_id", "quantity_used", "used_at", "project"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.stock_lot_id),
            Value::Real(self.quantity_used),
            datetime_to_sql(&self.used_at),
            optional_text(&self.project),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            stock_lot_id: row.get(1)?,
            quantity_used: row.get(2)?,
            used_at: datetime_from_row(row, 3)?,
            project: row.get(4)?,
        })
    }
}
