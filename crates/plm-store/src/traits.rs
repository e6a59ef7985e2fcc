//! The [`MetadataStore`] trait defining the list metadata storage interface.
//!
//! Any backend (in-memory, filesystem, database) implements this trait to
//! give the registry durable list records.

use plm_types::ListMetadata;

use crate::error::StoreResult;

/// Durable storage for list metadata records.
///
/// Implementations must be thread-safe (`Send + Sync`). The registry
/// serializes its own mutations, but readers of the store (diagnostics, the
/// CLI) may call in concurrently.
pub trait MetadataStore: Send + Sync {
    /// Return every stored record.
    ///
    /// Order is backend-defined; the registry does not depend on it.
    fn fetch_all(&self) -> StoreResult<Vec<ListMetadata>>;

    /// Persist a new record.
    ///
    /// Fails with [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists)
    /// if a record with the same key is present.
    fn insert(&self, record: &ListMetadata) -> StoreResult<()>;

    /// Delete the record for `key`.
    ///
    /// Returns `Ok(true)` if the record existed and was deleted, `Ok(false)`
    /// if it did not exist.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Read a single record by key.
    ///
    /// Default implementation scans [`Self::fetch_all`]. Backends may
    /// override for a direct lookup.
    fn get(&self, key: &str) -> StoreResult<Option<ListMetadata>> {
        Ok(self.fetch_all()?.into_iter().find(|r| r.key == key))
    }
}
