//! Ficelle: an inventory tracker for craft thread supplies
//!
//! Records stock lots, deducts consumption against projects, flags lots
//! running low, suggests sale prices and keeps a purchase wishlist, all in a
//! local SQLite file.

pub mod cli;
pub mod core;
pub mod entities;
