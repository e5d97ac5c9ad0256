//! Errors surfaced by the ledger and the wishlist

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::store::StoreError;

/// Errors from inventory operations
#[derive(Debug, Error, Diagnostic)]
pub enum InventoryError {
    /// Bad input: non-positive length or count, negative price, empty name
    #[error("invalid {field}: {reason}")]
    #[diagnostic(code(ficelle::validation))]
    Validation { field: &'static str, reason: String },

    /// Consumption larger than what is left on the lot
    #[error("not enough thread on LOT@{lot_id}: requested {requested:.2} m, only {remaining:.2} m left")]
    #[diagnostic(
        code(ficelle::insufficient_stock),
        help("consume at most the remaining length, or pick another lot")
    )]
    InsufficientStock {
        lot_id: RecordId,
        requested: f64,
        remaining: f64,
    },

    /// Operation on an id that does not exist
    #[error("{prefix}@{id} not found")]
    #[diagnostic(code(ficelle::not_found))]
    NotFound { prefix: RecordPrefix, id: RecordId },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        InventoryError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
