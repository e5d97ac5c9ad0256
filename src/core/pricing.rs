//! Sale price calculator
//!
//! production cost = hours × hourly rate + material cost
//! sale price      = production cost × (1 + margin / 100)
//!
//! The margin is not clamped: negative or >100 values are applied as given.

use serde::Serialize;

/// Sale prices above this are flagged as premium pieces
pub const PREMIUM_THRESHOLD: f64 = 100.0;

/// Result of a price calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub production_cost: f64,
    pub sale_price: f64,
}

impl PriceQuote {
    /// Whether the sale price is above [`PREMIUM_THRESHOLD`]
    pub fn is_premium(&self) -> bool {
        self.sale_price > PREMIUM_THRESHOLD
    }
}

/// Compute production cost and suggested sale price
pub fn suggested_price(hours: f64, hourly_rate: f64, material_cost: f64, margin_pct: f64) -> PriceQuote {
    let production_cost = hours * hourly_rate + material_cost;
    PriceQuote {
        production_cost,
        sale_price: production_cost * (1.0 + margin_pct / 100.0),
    }
}
