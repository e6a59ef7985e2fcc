//! File-backed metadata store.
//!
//! All records live in one JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "lists": [ { "id": "...", "key": "...", ... }, ... ]
//! }
//! ```
//!
//! The document is read once on open and cached. Every mutation writes the
//! complete new document to a temporary file in the same directory, syncs it,
//! and renames it over the old one, so a crash leaves either the old or the
//! new document on disk, never a torn one. The cache is only updated after
//! the rename succeeds.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use plm_types::ListMetadata;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::MetadataStore;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Document {
    version: u32,
    lists: Vec<ListMetadata>,
}

/// A [`MetadataStore`] persisted as a single JSON file.
#[derive(Debug)]
pub struct FileMetadataStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, ListMetadata>>,
}

impl FileMetadataStore {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first mutation. Parent directories are created eagerly.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let records = if path.exists() {
            let doc: Document = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
            if doc.version != FORMAT_VERSION {
                return Err(StoreError::Serialization(format!(
                    "unsupported metadata format version {} in {}",
                    doc.version,
                    path.display()
                )));
            }
            doc.lists.into_iter().map(|r| (r.key.clone(), r)).collect()
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), records = records.len(), "opened metadata store");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Path of the backing JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, records: &BTreeMap<String, ListMetadata>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let doc = Document {
            version: FORMAT_VERSION,
            lists: records.values().cloned().collect(),
        };

        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &doc)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "wrote metadata store");
        Ok(())
    }
}

impl MetadataStore for FileMetadataStore {
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

        let mut next = records.clone();
        next.insert(record.key.clone(), record.clone());
        self.write_document(&next)?;
        *records = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if !records.contains_key(key) {
            return Ok(false);
        }

        let mut next = records.clone();
        next.remove(key);
        self.write_document(&next)?;
        *records = next;
        Ok(true)
    }

    fn get(&self, key: &str) -> StoreResult<Option<ListMetadata>> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_types::ListId;

    fn record(key: &str) -> ListMetadata {
        ListMetadata::new(ListId::new(), key, "plm.provider.file", "plm.list.fifo", "")
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMetadataStore::open(dir.path().join("lists.json")).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");

        {
            let store = FileMetadataStore::open(&path).unwrap();
            store.insert(&record("A")).unwrap();
            store.insert(&record("B")).unwrap();
            assert!(store.delete("A").unwrap());
        }

        let reopened = FileMetadataStore::open(&path).unwrap();
        let keys: Vec<String> = reopened.fetch_all().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["B"]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("lists.json");
        let store = FileMetadataStore::open(&path).unwrap();
        store.insert(&record("A")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn duplicate_insert_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        let store = FileMetadataStore::open(&path).unwrap();
        let original = record("A");
        store.insert(&original).unwrap();

        let err = store.insert(&record("A")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        let reopened = FileMetadataStore::open(&path).unwrap();
        assert_eq!(reopened.get("A").unwrap().unwrap().id, original.id);
    }

    #[test]
    fn delete_missing_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        let store = FileMetadataStore::open(&path).unwrap();
        assert!(!store.delete("ghost").unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        fs::write(&path, r#"{"version": 99, "lists": []}"#).unwrap();

        let err = FileMetadataStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileMetadataStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
