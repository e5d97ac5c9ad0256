//! Record type definitions
//!
//! - [`StockLot`] - a batch of thread acquired in one intake
//! - [`UsageRecord`] - one consumption event against a lot
//! - [`WishlistItem`] - a desired future purchase

pub mod stock_lot;
pub mod usage;
pub mod wishlist;

pub use stock_lot::{LengthUnit, LotIntake, LowStockThreshold, StockLot};
pub use usage::UsageRecord;
pub use wishlist::{WishPriority, WishStatus, WishlistItem};
