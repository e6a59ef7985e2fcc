//! The [`PersistentListRegistry`]: the single authoritative map from list key
//! to live list.
//!
//! Reads never block. The map is an immutable snapshot behind an
//! [`ArcSwap`]; `get_list` and `get_lists` load the current snapshot and
//! work on it. Every mutation (create, delete, bulk load) takes the one
//! coordination lock, copies the snapshot, changes the copy and swaps it in.
//! The lock is the only thing that makes creation at-most-once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use plm_store::MetadataStore;
use plm_types::{validate_list_key, ListMetadata};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult, ResolutionError};
use crate::list::{ListInstance, PersistentList};
use crate::resolver::TypeRegistry;

type ListMap = HashMap<String, Arc<dyn PersistentList>>;

/// A stored record that was left out of the bulk load.
#[derive(Debug)]
pub struct SkippedRecord {
    pub key: String,
    pub error: ResolutionError,
}

/// Outcome of [`PersistentListRegistry::on_startup`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records materialized and published.
    pub loaded: usize,
    /// Records whose types could not be resolved or initialized.
    pub skipped: Vec<SkippedRecord>,
}

/// Concurrent registry of persistent lists, backed by a [`MetadataStore`].
pub struct PersistentListRegistry {
    lists: ArcSwap<ListMap>,
    sync_lock: Mutex<()>,
    loaded: AtomicBool,
    store: Arc<dyn MetadataStore>,
    types: TypeRegistry,
}

impl PersistentListRegistry {
    /// Create an empty, not-yet-loaded registry.
    pub fn new(store: Arc<dyn MetadataStore>, types: TypeRegistry) -> Self {
        Self {
            lists: ArcSwap::from_pointee(ListMap::new()),
            sync_lock: Mutex::new(()),
            loaded: AtomicBool::new(false),
            store,
            types,
        }
    }

    /// The type registry used to resolve stored type names.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Whether the startup bulk load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Make sure a list is registered under `list`'s key.
    ///
    /// If the key is already published this is a no-op and the published
    /// instance is returned; `list` is dropped. Otherwise its types are
    /// checked against the type registry, the list is initialized (if
    /// tagged), its metadata record is persisted, and only then is it
    /// published. Of several concurrent callers with the same key
    /// the first to take the lock wins and every caller gets its instance.
    pub fn ensure_list(&self, list: ListInstance) -> RegistryResult<Arc<dyn PersistentList>> {
        let key = list.key().to_string();
        validate_list_key(&key).map_err(|e| RegistryError::InvalidArgument(e.to_string()))?;
        if list.as_list().provider().is_none() {
            return Err(RegistryError::InvalidArgument(format!(
                "list '{key}' has no provider attached"
            )));
        }

        if let Some(existing) = self.lists.load().get(&key) {
            return Ok(Arc::clone(existing));
        }

        let _guard = self.lock();
        if let Some(existing) = self.lists.load().get(&key) {
            return Ok(Arc::clone(existing));
        }

        // A record the type registry cannot rebuild would vanish on restart.
        self.types.check_restorable(&list)?;

        debug!(key = %key, "list not found; creating");
        let list = list
            .into_initialized()
            .map_err(|e| RegistryError::Initialization {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        let record = describe(list.as_ref())?;
        self.store.insert(&record)?;
        self.publish(|map| {
            map.insert(key.clone(), Arc::clone(&list));
        });

        debug!(
            key = %key,
            list_type = %record.list_type,
            provider_type = %record.provider_type,
            "list created"
        );
        Ok(list)
    }

    /// Remove the list registered under `key`, deleting its record.
    ///
    /// Returns `Ok(false)` if no such list is published. A store failure
    /// leaves the list published.
    pub fn remove_list(&self, key: &str) -> RegistryResult<bool> {
        validate_list_key(key).map_err(|e| RegistryError::InvalidArgument(e.to_string()))?;

        let _guard = self.lock();
        if !self.lists.load().contains_key(key) {
            return Ok(false);
        }

        debug!(key = %key, "deleting list");
        self.store.delete(key)?;
        self.publish(|map| {
            map.remove(key);
        });
        debug!(key = %key, "list deleted");
        Ok(true)
    }

    /// The list registered under `key`.
    ///
    /// Returns `Ok(None)` until the startup load has completed, so callers
    /// never mistake a half-loaded registry for a missing key.
    pub fn get_list(&self, key: &str) -> RegistryResult<Option<Arc<dyn PersistentList>>> {
        validate_list_key(key).map_err(|e| RegistryError::InvalidArgument(e.to_string()))?;
        if !self.is_loaded() {
            return Ok(None);
        }
        Ok(self.lists.load().get(key).cloned())
    }

    /// Snapshot of every published list, in no particular order.
    pub fn get_lists(&self) -> Vec<Arc<dyn PersistentList>> {
        self.lists.load().values().cloned().collect()
    }

    /// Whether a list is published under `key`, regardless of load state.
    pub fn contains(&self, key: &str) -> bool {
        self.lists.load().contains_key(key)
    }

    /// Number of published lists.
    pub fn len(&self) -> usize {
        self.lists.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every stored list.
    ///
    /// Holds the coordination lock for the whole load. Records whose types
    /// cannot be resolved are logged, reported and skipped; they do not stop
    /// the load. A record whose key is already published keeps the published
    /// instance. Calls after a successful load return an empty report. If the
    /// store cannot be read the error is returned and the registry stays
    /// unloaded.
    pub fn on_startup(&self) -> RegistryResult<LoadReport> {
        let _guard = self.lock();
        if self.is_loaded() {
            debug!("lists already loaded");
            return Ok(LoadReport::default());
        }

        debug!("loading the configured lists from the metadata store");
        let records = self.store.fetch_all()?;
        let mut report = LoadReport::default();
        let mut next = ListMap::clone(&self.lists.load());

        for record in records {
            if next.contains_key(&record.key) {
                debug!(key = %record.key, "list already published; keeping it");
                continue;
            }
            match self.types.materialize(&record) {
                Ok(list) => {
                    next.insert(record.key, list);
                    report.loaded += 1;
                }
                Err(error) => {
                    warn!(
                        key = %record.key,
                        type_name = %error.type_name(),
                        error = %error,
                        "skipping list that could not be loaded"
                    );
                    report.skipped.push(SkippedRecord {
                        key: record.key,
                        error,
                    });
                }
            }
        }

        self.lists.store(Arc::new(next));
        self.loaded.store(true, Ordering::Release);

        info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "lists loaded"
        );
        Ok(report)
    }

    /// Shutdown hook. Nothing to release; lists and providers are dropped
    /// with the registry.
    pub fn on_shutdown(&self) {
        debug!(lists = self.len(), "list registry shutting down");
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.sync_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy-modify-swap. Callers must hold the coordination lock.
    fn publish(&self, change: impl FnOnce(&mut ListMap)) {
        let mut next = ListMap::clone(&self.lists.load());
        change(&mut next);
        self.lists.store(Arc::new(next));
    }
}

/// Derive the metadata record for a list about to be created.
fn describe(list: &dyn PersistentList) -> RegistryResult<ListMetadata> {
    let provider = list.provider().ok_or_else(|| {
        RegistryError::InvalidArgument(format!("list '{}' has no provider attached", list.key()))
    })?;
    Ok(ListMetadata::new(
        list.id(),
        list.key(),
        provider.type_name(),
        list.type_name(),
        list.description(),
    ))
}
