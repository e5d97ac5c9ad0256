//! Stock ledger - lot intake, consumption and derived metrics
//!
//! The ledger owns the only mutation of a lot after intake: consumption.
//! A consumption decrements the lot and appends a [`UsageRecord`] inside one
//! [`Store::atomically`] section, so the lot and the history never disagree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::error::InventoryError;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::store::Store;
use crate::entities::stock_lot::{LengthUnit, LotIntake, LowStockThreshold, StockLot};
use crate::entities::usage::UsageRecord;

/// Outcome of a successful consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consumption {
    /// The appended ledger entry
    pub usage: UsageRecord,
    /// Meters left on the lot afterwards
    pub new_remaining: f64,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DashboardMetrics {
    /// Sum of remaining length over all lots, meters
    pub total_remaining_m: f64,
    /// Sum of acquisition price over all lots (not the value of what remains)
    pub total_value: f64,
    /// Sum of all recorded consumption, meters
    pub total_consumed_m: f64,
    /// Number of lots
    pub lot_count: usize,
}

/// Remaining meters for one material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialShare {
    pub material: String,
    pub remaining_m: f64,
    pub lots: usize,
}

/// Lengths closer than this are equal; a lot left with less is empty
const LENGTH_TOLERANCE_M: f64 = 1e-9;

/// Stock ledger over any [`Store`]
pub struct Ledger<S: Store> {
    store: S,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new lot; its whole length starts out available
    pub fn add_lot(&mut self, intake: LotIntake) -> Result<StockLot, InventoryError> {
        let lot = StockLot::intake(intake)?;
        let lot = self.store.put(lot)?;

        tracing::info!(
            lot = ?lot.id,
            material = %lot.material,
            length_m = lot.initial_length,
            "lot added"
        );
        Ok(lot)
    }

    /// Take `amount` (in `unit`) from a lot
    ///
    /// Fails without touching anything if the lot is missing or holds less
    /// than the requested length. Otherwise the decrement and the usage
    /// record are committed together.
    pub fn consume(
        &mut self,
        lot_id: RecordId,
        amount: f64,
        unit: LengthUnit,
        project: Option<String>,
    ) -> Result<Consumption, InventoryError> {
        let amount_m = unit.to_meters(amount);
        let usage = UsageRecord::new(lot_id, amount_m, project)?;

        let result = self.store.atomically::<Consumption, InventoryError, _>(|store| {
            let mut lot: StockLot = store.get(lot_id)?.ok_or(InventoryError::NotFound {
                prefix: RecordPrefix::Lot,
                id: lot_id,
            })?;

            if amount_m > lot.remaining_length + LENGTH_TOLERANCE_M {
                return Err(InventoryError::InsufficientStock {
                    lot_id,
                    requested: amount_m,
                    remaining: lot.remaining_length,
                });
            }

            let left = lot.remaining_length - amount_m;
            lot.remaining_length = if left < LENGTH_TOLERANCE_M { 0.0 } else { left };
            let lot = store.put(lot)?;
            let usage = store.put(usage)?;

            Ok(Consumption {
                usage,
                new_remaining: lot.remaining_length,
            })
        });

        match &result {
            Ok(done) => tracing::info!(
                lot = lot_id,
                used_m = amount_m,
                remaining_m = done.new_remaining,
                "consumption recorded"
            ),
            Err(e) => tracing::warn!(lot = lot_id, used_m = amount_m, error = %e, "consumption rejected"),
        }
        result
    }

    /// Fetch one lot
    pub fn get_lot(&self, lot_id: RecordId) -> Result<StockLot, InventoryError> {
        self.store
            .get(lot_id)?
            .ok_or(InventoryError::NotFound {
                prefix: RecordPrefix::Lot,
                id: lot_id,
            })
    }

    /// All lots in insertion order
    pub fn lots(&self) -> Result<Vec<StockLot>, InventoryError> {
        Ok(self.store.query()?)
    }

    /// Lots whose type or material contains `text` (case-insensitive)
    pub fn search(&self, text: &str) -> Result<Vec<StockLot>, InventoryError> {
        Ok(self.lots()?.into_iter().filter(|l| l.matches(text)).collect())
    }

    /// Lots with thread left to consume
    pub fn available_lots(&self) -> Result<Vec<StockLot>, InventoryError> {
        Ok(self.lots()?.into_iter().filter(StockLot::is_available).collect())
    }

    /// Lots under either threshold, in insertion order
    pub fn low_stock_items(
        &self,
        threshold: &LowStockThreshold,
    ) -> Result<Vec<StockLot>, InventoryError> {
        Ok(self
            .lots()?
            .into_iter()
            .filter(|l| l.is_low_stock(threshold))
            .collect())
    }

    /// Usage history, optionally restricted to one lot
    pub fn history(&self, lot_id: Option<RecordId>) -> Result<Vec<UsageRecord>, InventoryError> {
        if let Some(id) = lot_id {
            self.get_lot(id)?;
        }
        let records: Vec<UsageRecord> = self.store.query()?;
        Ok(records
            .into_iter()
            .filter(|u| lot_id.map_or(true, |id| u.stock_lot_id == id))
            .collect())
    }

    /// Dashboard totals
    pub fn dashboard_metrics(&self) -> Result<DashboardMetrics, InventoryError> {
        let lots = self.lots()?;
        let usage: Vec<UsageRecord> = self.store.query()?;

        Ok(DashboardMetrics {
            total_remaining_m: lots.iter().map(|l| l.remaining_length).sum(),
            total_value: lots.iter().map(|l| l.price).sum(),
            total_consumed_m: usage.iter().map(|u| u.quantity_used).sum(),
            lot_count: lots.len(),
        })
    }

    /// Remaining meters grouped by material, largest first
    pub fn material_breakdown(&self) -> Result<Vec<MaterialShare>, InventoryError> {
        let mut by_material: BTreeMap<String, MaterialShare> = BTreeMap::new();
        for lot in self.lots()? {
            let share = by_material
                .entry(lot.material.clone())
                .or_insert_with(|| MaterialShare {
                    material: lot.material.clone(),
                    remaining_m: 0.0,
                    lots: 0,
                });
            share.remaining_m += lot.remaining_length;
            share.lots += 1;
        }

        let mut shares: Vec<MaterialShare> = by_material.into_values().collect();
        shares.sort_by(|a, b| b.remaining_m.total_cmp(&a.remaining_m));
        Ok(shares)
    }

    /// Photo bytes attached to a lot, if any
    pub fn photo(&self, lot_id: RecordId) -> Result<Option<Vec<u8>>, InventoryError> {
        Ok(self.get_lot(lot_id)?.photo)
    }
}
