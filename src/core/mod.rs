//! Core module - storage, ledger operations and supporting types

pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod pricing;
pub mod project;
pub mod store;
pub mod wishlist;

pub use config::Config;
pub use error::InventoryError;
pub use identity::{format_ref, parse_ref, IdParseError, RecordId, RecordPrefix};
pub use ledger::{Consumption, DashboardMetrics, Ledger, MaterialShare};
pub use pricing::{suggested_price, PriceQuote};
pub use project::{Project, ProjectError};
pub use store::{MemoryStore, Record, SqliteStore, Store, StoreError};
pub use wishlist::Wishlist;
