//! File-backed provider.
//!
//! Each list's items are stored as a JSON array in `<dir>/<hex(key)>.json`.
//! Keys are hex-encoded so that any key maps to a valid, unique file name.
//! Keys too long for that are stored as `<dir>/h-<blake3(key)>.json`; the
//! prefix cannot occur in a hex name, so the two forms never collide.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the old file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use plm_registry::{BoxError, Initializable, ListError, ListResult, PersistentListProvider, Position};
use plm_types::ListItem;
use tracing::debug;

use crate::builtin::FILE_PROVIDER;
use crate::items::{insert_at, remove_id, take_at};

/// Longest key, in bytes, stored under its hex encoding. Its file name is
/// `2 * MAX_HEX_KEY_LEN + 5` bytes, inside the common 255-byte limit.
const MAX_HEX_KEY_LEN: usize = 100;

/// A [`PersistentListProvider`] storing one JSON file per list.
#[derive(Debug)]
pub struct FileProvider {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the items of `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name = if key.len() <= MAX_HEX_KEY_LEN {
            format!("{}.json", hex::encode(key.as_bytes()))
        } else {
            format!("h-{}.json", blake3::hash(key.as_bytes()).to_hex())
        };
        self.dir.join(name)
    }

    fn read(&self, key: &str) -> ListResult<Vec<ListItem>> {
        let file = match File::open(self.path_for(key)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ListError::Storage(e.to_string()))
    }

    fn write(&self, key: &str, items: &[ListItem]) -> ListResult<()> {
        let path = self.path_for(key);
        let tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, items)
                .map_err(|e| ListError::Storage(e.to_string()))?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| ListError::from(e.error))?;
        debug!(key = %key, items = items.len(), "wrote list items");
        Ok(())
    }

    /// Read-modify-write under the write lock.
    fn update<T>(&self, key: &str, change: impl FnOnce(&mut Vec<ListItem>) -> ListResult<T>) -> ListResult<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read(key)?;
        let out = change(&mut items)?;
        self.write(key, &items)?;
        Ok(out)
    }
}

impl Initializable for FileProvider {
    fn initialize(&self) -> Result<(), BoxError> {
        fs::create_dir_all(&self.dir)?;
        debug!(dir = %self.dir.display(), "file provider ready");
        Ok(())
    }
}

impl PersistentListProvider for FileProvider {
    fn type_name(&self) -> &str {
        FILE_PROVIDER
    }

    fn add(&self, key: &str, item: ListItem) -> ListResult<()> {
        self.update(key, |items| {
            items.push(item);
            Ok(())
        })
    }

    fn insert(&self, key: &str, index: usize, item: ListItem) -> ListResult<()> {
        self.update(key, |items| insert_at(items, key, index, item))
    }

    fn remove(&self, key: &str, item_id: &uuid::Uuid) -> ListResult<bool> {
        self.update(key, |items| Ok(remove_id(items, item_id)))
    }

    fn items(&self, key: &str) -> ListResult<Vec<ListItem>> {
        self.read(key)
    }

    fn clear(&self, key: &str) -> ListResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn take(&self, key: &str, position: Position) -> ListResult<Option<ListItem>> {
        self.update(key, |items| Ok(take_at(items, position)))
    }
}
