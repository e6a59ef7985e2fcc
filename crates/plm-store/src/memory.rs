//! In-memory metadata store for testing and ephemeral use.
//!
//! [`InMemoryMetadataStore`] keeps all records in a `BTreeMap` protected by a
//! `RwLock`. Data is lost when the store is dropped.

use std::collections::BTreeMap;
use std::sync::RwLock;

use plm_types::ListMetadata;

use crate::error::{StoreError, StoreResult};
use crate::traits::MetadataStore;

/// An in-memory implementation of [`MetadataStore`].
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<BTreeMap<String, ListMetadata>>,
}

impl InMemoryMetadataStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    ///
    /// Later records replace earlier ones with the same key.
    pub fn with_records(records: impl IntoIterator<Item = ListMetadata>) -> Self {
        let records = records.into_iter().map(|r| (r.key.clone(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn fetch_all(&self) -> StoreResult<Vec<ListMetadata>> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.values().cloned().collect())
    }

    fn insert(&self, record: &ListMetadata) -> StoreResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if records.contains_key(&record.key) {
            return Err(StoreError::AlreadyExists {
                key: record.key.clone(),
            });
        }
        records.insert(record.key.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.remove(key).is_some())
    }

    fn get(&self, key: &str) -> StoreResult<Option<ListMetadata>> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.get(key).cloned())
    }
}
