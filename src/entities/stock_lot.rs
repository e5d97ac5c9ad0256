//! Stock lot - a batch of thread acquired in one intake

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::core::error::InventoryError;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::store::{datetime_from_row, datetime_to_sql, Record};

/// Unit used when recording consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[serde(rename = "cm")]
    Centimeters,
    #[default]
    #[serde(rename = "m")]
    Meters,
}

impl LengthUnit {
    /// Convert an amount in this unit to meters
    pub fn to_meters(self, amount: f64) -> f64 {
        match self {
            LengthUnit::Centimeters => amount / 100.0,
            LengthUnit::Meters => amount,
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Centimeters => write!(f, "cm"),
            LengthUnit::Meters => write!(f, "m"),
        }
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeters),
            "m" | "meter" | "meters" => Ok(LengthUnit::Meters),
            _ => Err(format!("Invalid length unit: {}. Use cm or m", s)),
        }
    }
}

/// Thresholds below which a lot is flagged as running low
///
/// Both comparisons are strict: a lot sitting exactly on a threshold is not low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowStockThreshold {
    /// Absolute floor in meters
    pub absolute_m: f64,
    /// Fraction of the initial length
    pub ratio: f64,
}

impl Default for LowStockThreshold {
    fn default() -> Self {
        Self {
            absolute_m: 5.0,
            ratio: 0.15,
        }
    }
}

/// Everything captured on the intake form
#[derive(Debug, Clone, Default)]
pub struct LotIntake {
    pub thread_type: String,
    pub material: String,
    pub color: String,
    /// Length of one skein/spool in meters
    pub unit_length: f64,
    /// Number of skeins/spools bought together
    pub lot_count: u32,
    /// Price paid for the whole lot
    pub total_price: f64,
    pub source: String,
    pub photo: Option<Vec<u8>>,
}

/// A stock lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    /// Store-assigned id (LOT@N)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Thread type (e.g. wool, silk)
    #[serde(rename = "type")]
    pub thread_type: String,

    /// Precise material (e.g. alpaca)
    pub material: String,

    /// Color as a hex string
    pub color: String,

    /// Total length at intake, meters
    pub initial_length: f64,

    /// Length still available, meters
    pub remaining_length: f64,

    /// Number of skeins in the lot
    pub lot_count: u32,

    /// Acquisition price of the whole lot
    pub price: f64,

    /// Brand or shop
    pub source: String,

    /// Texture photo, raw image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<u8>>,

    pub created_at: DateTime<Utc>,
}

impl StockLot {
    /// Validate an intake and build the lot with its full length available
    pub fn intake(intake: LotIntake) -> Result<Self, InventoryError> {
        if !intake.unit_length.is_finite() || intake.unit_length <= 0.0 {
            return Err(InventoryError::validation(
                "unit_length",
                format!("must be greater than 0, got {}", intake.unit_length),
            ));
        }
        if intake.lot_count < 1 {
            return Err(InventoryError::validation("lot_count", "must be at least 1"));
        }
        if !intake.total_price.is_finite() || intake.total_price < 0.0 {
            return Err(InventoryError::validation(
                "price",
                format!("must be 0 or more, got {}", intake.total_price),
            ));
        }

        let total_length = intake.unit_length * f64::from(intake.lot_count);

        Ok(Self {
            id: None,
            thread_type: intake.thread_type,
            material: intake.material,
            color: intake.color,
            initial_length: total_length,
            remaining_length: total_length,
            lot_count: intake.lot_count,
            price: intake.total_price,
            source: intake.source,
            photo: intake.photo,
            created_at: Utc::now(),
        })
    }

    /// Remaining length as a fraction of the initial length (0..=1)
    pub fn remaining_pct(&self) -> f64 {
        if self.initial_length > 0.0 {
            self.remaining_length / self.initial_length
        } else {
            0.0
        }
    }

    /// Whether this lot is below either low-stock threshold
    pub fn is_low_stock(&self, threshold: &LowStockThreshold) -> bool {
        self.remaining_length < threshold.absolute_m
            || self.remaining_length < self.initial_length * threshold.ratio
    }

    /// Whether any thread is left to consume
    pub fn is_available(&self) -> bool {
        self.remaining_length > 0.0
    }

    /// Case-insensitive match on type or material
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.thread_type.to_lowercase().contains(&needle)
            || self.material.to_lowercase().contains(&needle)
    }
}

impl Record for StockLot {
    const TABLE: &'static str = "stock_lots";
    const PREFIX: RecordPrefix = RecordPrefix::Lot;
    const COLUMNS: &'static [&'static str] = &[
        "type",
        "material",
        "color_hex",
        "initial_length",
        "remaining_length",
        "lot_count",
        "price",
        "source",
        "photo",
        "created_at",
    ];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.thread_type.clone()),
            Value::Text(self.material.clone()),
            Value::Text(self.color.clone()),
            Value::Real(self.initial_length),
            Value::Real(self.remaining_length),
            Value::Integer(i64::from(self.lot_count)),
            Value::Real(self.price),
            Value::Text(self.source.clone()),
            self.photo.clone().map(Value::Blob).unwrap_or(Value::Null),
            datetime_to_sql(&self.created_at),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            thread_type: row.get(1)?,
            material: row.get(2)?,
            color: row.get(3)?,
            initial_length: row.get(4)?,
            remaining_length: row.get(5)?,
            lot_count: row.get(6)?,
            price: row.get(7)?,
            source: row.get(8)?,
            photo: row.get(9)?,
            created_at: datetime_from_row(row, 10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(unit_length: f64, lot_count: u32) -> LotIntake {
        LotIntake {
            thread_type: "Laine".to_string(),
            material: "Alpaga".to_string(),
            color: "#334455".to_string(),
            unit_length,
            lot_count,
            total_price: 20.0,
            source: "Drops".to_string(),
            photo: None,
        }
    }

    fn lot_with(initial: f64, remaining: f64) -> StockLot {
        let mut lot = StockLot::intake(intake(initial, 1)).unwrap();
        lot.remaining_length = remaining;
        lot
    }

    #[test]
    fn test_intake_multiplies_length_by_count() {
        let lot = StockLot::intake(intake(100.0, 2)).unwrap();
        assert_eq!(lot.initial_length, 200.0);
        assert_eq!(lot.remaining_length, 200.0);
        assert_eq!(lot.lot_count, 2);
        assert!(lot.id.is_none());
    }

    #[test]
    fn test_intake_rejects_bad_numbers() {
        assert!(matches!(
            StockLot::intake(intake(0.0, 1)),
            Err(InventoryError::Validation { field: "unit_length", .. })
        ));
        assert!(matches!(
            StockLot::intake(intake(-3.0, 1)),
            Err(InventoryError::Validation { field: "unit_length", .. })
        ));
        assert!(matches!(
            StockLot::intake(intake(10.0, 0)),
            Err(InventoryError::Validation { field: "lot_count", .. })
        ));

        let mut negative_price = intake(10.0, 1);
        negative_price.total_price = -1.0;
        assert!(matches!(
            StockLot::intake(negative_price),
            Err(InventoryError::Validation { field: "price", .. })
        ));
    }

    #[test]
    fn test_length_unit_conversion() {
        assert_eq!(LengthUnit::Centimeters.to_meters(250.0), 2.5);
        assert_eq!(LengthUnit::Meters.to_meters(250.0), 250.0);
        assert_eq!("CM".parse::<LengthUnit>().unwrap(), LengthUnit::Centimeters);
        assert!("yd".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_low_stock_boundaries_are_strict() {
        let threshold = LowStockThreshold::default();

        // exactly 5 m, and 5 m is more than 15% of 20 m
        assert!(!lot_with(20.0, 5.0).is_low_stock(&threshold));
        // exactly 15% of 100 m (15 m), above the absolute floor
        assert!(!lot_with(100.0, 15.0).is_low_stock(&threshold));

        assert!(lot_with(20.0, 4.99).is_low_stock(&threshold));
        assert!(lot_with(200.0, 10.0).is_low_stock(&threshold));
    }

    #[test]
    fn test_remaining_pct() {
        assert_eq!(lot_with(200.0, 50.0).remaining_pct(), 0.25);
        assert_eq!(lot_with(200.0, 0.0).remaining_pct(), 0.0);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let lot = lot_with(10.0, 10.0);
        assert!(lot.matches("laine"));
        assert!(lot.matches("ALPA"));
        assert!(!lot.matches("soie"));
    }

    #[test]
    fn test_serializes_type_field() {
        let lot = lot_with(10.0, 10.0);
        let yaml = serde_yml::to_string(&lot).unwrap();
        assert!(yaml.contains("type: Laine"));
        assert!(!yaml.contains("photo"));
    }
}
