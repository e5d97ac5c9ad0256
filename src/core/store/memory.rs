//! In-memory store for tests
//!
//! Records are kept as serde_json values per table. `atomically` snapshots
//! the tables and restores them when the closure fails.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{Record, Store, StoreError};
use crate::core::identity::RecordId;

type Table = BTreeMap<RecordId, serde_json::Value>;

/// A [`Store`] that lives entirely in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Table>,
    next_ids: HashMap<&'static str, RecordId>,
    failing_tables: HashSet<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` into `table` fail with [`StoreError::WriteFailed`]
    pub fn fail_writes_to(&mut self, table: &'static str) {
        self.failing_tables.insert(table);
    }

    fn decode<R: Record>(value: &serde_json::Value) -> Result<R, StoreError> {
        serde_json::from_value(value.clone()).map_err(|e| StoreError::Codec {
            table: R::TABLE,
            message: e.to_string(),
        })
    }
}

impl Store for MemoryStore {
    fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        self.tables
            .get(R::TABLE)
            .and_then(|table| table.get(&id))
            .map(Self::decode::<R>)
            .transpose()
    }

    fn put<R: Record>(&mut self, mut record: R) -> Result<R, StoreError> {
        if self.failing_tables.contains(R::TABLE) {
            return Err(StoreError::WriteFailed {
                table: R::TABLE,
                message: "injected failure".to_string(),
            });
        }

        let id = match record.id() {
            Some(id) => {
                let exists = self
                    .tables
                    .get(R::TABLE)
                    .is_some_and(|table| table.contains_key(&id));
                if !exists {
                    return Err(StoreError::MissingRecord {
                        prefix: R::PREFIX,
                        id,
                    });
                }
                id
            }
            None => {
                let next = self.next_ids.entry(R::TABLE).or_insert(1);
                let id = *next;
                *next += 1;
                record.set_id(id);
                id
            }
        };

        let value = serde_json::to_value(&record).map_err(|e| StoreError::Codec {
            table: R::TABLE,
            message: e.to_string(),
        })?;
        self.tables.entry(R::TABLE).or_default().insert(id, value);
        Ok(record)
    }

    fn delete<R: Record>(&mut self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .get_mut(R::TABLE)
            .is_some_and(|table| table.remove(&id).is_some()))
    }

    fn query<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        match self.tables.get(R::TABLE) {
            Some(table) => table.values().map(Self::decode::<R>).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        let tables = self.tables.clone();
        let next_ids = self.next_ids.clone();

        let outcome = f(self);
        if outcome.is_err() {
            self.tables = tables;
            self.next_ids = next_ids;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::usage::UsageRecord;
    use crate::entities::wishlist::{WishPriority, WishlistItem};

    fn wish(product: &str) -> WishlistItem {
        WishlistItem::new(product, None, WishPriority::Low, None).unwrap()
    }

    #[test]
    fn test_ids_are_per_table() {
        let mut store = MemoryStore::new();
        let item = store.put(wish("Coton")).unwrap();
        let usage = store.put(UsageRecord::new(1, 2.0, None).unwrap()).unwrap();
        assert_eq!(item.id, Some(1));
        assert_eq!(usage.id, Some(1));
    }

    #[test]
    fn test_query_preserves_insertion_order() {
        let mut store = MemoryStore::new();
        for name in ["b", "a", "c"] {
            store.put(wish(name)).unwrap();
        }
        let products: Vec<String> = store
            .query::<WishlistItem>()
            .unwrap()
            .into_iter()
            .map(|w| w.product)
            .collect();
        assert_eq!(products, ["b", "a", "c"]);
    }

    #[test]
    fn test_update_of_missing_record_names_it() {
        let mut store = MemoryStore::new();
        let mut item = wish("Lin");
        item.id = Some(4);
        let err = store.put(item).unwrap_err();
        assert_eq!(err.to_string(), "WISH@4 does not exist");
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let mut store = MemoryStore::new();
        let first = store.put(wish("one")).unwrap();
        store.delete::<WishlistItem>(first.id.unwrap()).unwrap();
        let second = store.put(wish("two")).unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[test]
    fn test_injected_failure_and_rollback() {
        let mut store = MemoryStore::new();
        store.fail_writes_to(UsageRecord::TABLE);

        let result = store.atomically::<(), StoreError, _>(|s| {
            s.put(wish("kept?"))?;
            s.put(UsageRecord::new(1, 1.0, None).unwrap())?;
            Ok(())
        });

        assert!(matches!(result, Err(StoreError::WriteFailed { .. })));
        assert!(store.query::<WishlistItem>().unwrap().is_empty());
    }
}
