//! Wishlist manager

use crate::core::error::InventoryError;
use crate::core::identity::RecordId;
use crate::core::store::Store;
use crate::entities::wishlist::{WishPriority, WishlistItem};

/// Purchase wishlist over any [`Store`]
pub struct Wishlist<S: Store> {
    store: S,
}

impl<S: Store> Wishlist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add an entry; it starts out as to-buy
    pub fn add_item(
        &mut self,
        product: impl Into<String>,
        color: Option<String>,
        priority: WishPriority,
        link: Option<String>,
    ) -> Result<WishlistItem, InventoryError> {
        let item = WishlistItem::new(product, color, priority, link)?;
        let item = self.store.put(item)?;
        tracing::info!(item = ?item.id, product = %item.product, "wishlist item added");
        Ok(item)
    }

    /// Delete an entry by id
    ///
    /// A missing id is not an error: nothing changes and `false` is returned.
    pub fn remove_item(&mut self, id: RecordId) -> Result<bool, InventoryError> {
        let removed = self.store.delete::<WishlistItem>(id)?;
        if removed {
            tracing::info!(item = id, "wishlist item removed");
        } else {
            tracing::debug!(item = id, "wishlist item already absent");
        }
        Ok(removed)
    }

    /// All entries in insertion order
    pub fn items(&self) -> Result<Vec<WishlistItem>, InventoryError> {
        Ok(self.store.query()?)
    }
}
