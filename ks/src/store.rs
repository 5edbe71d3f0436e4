//! Core storage implementations

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Key/value string storage
///
/// Mutations are write-through: once `set` or `remove` returns `Ok`, the
/// change is durable.
pub trait Storage {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key` if present
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// All keys in sorted order
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Storage backed by a single JSON object file
#[derive(Debug)]
pub struct FileStore {
    /// Path to the JSON file
    path: PathBuf,
    /// Contents as of open or the last mutation through this handle
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open or create a store at the given file path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let entries = Self::read_entries(&path)?;
        debug!(?path, count = entries.len(), "Opened key store");
        Ok(Self { path, entries })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> StoreResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = sibling(path, "corrupt");
                warn!(?path, ?aside, error = %e, "Store file is not a JSON string map, starting empty");
                fs::rename(path, &aside).map_err(|e| StoreError::io(path, e))?;
                Ok(BTreeMap::new())
            }
        }
    }

    /// Apply `change` to the on-disk entries under an exclusive lock
    ///
    /// The file is re-read while the lock is held so that writes made by other
    /// handles since `open` are kept. `change` returns false when it left the
    /// map untouched, in which case nothing is written.
    fn update(&mut self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> StoreResult<()> {
        let lock_path = sibling(&self.path, "lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        lock.lock_exclusive().map_err(|e| StoreError::io(&lock_path, e))?;

        let result = Self::read_entries(&self.path).and_then(|mut entries| {
            if change(&mut entries) {
                self.write_entries(&entries)?;
            }
            Ok(entries)
        });

        if let Err(e) = FileExt::unlock(&lock) {
            warn!(?lock_path, error = %e, "Failed to release store lock");
        }
        self.entries = result?;
        Ok(())
    }

    /// Write `entries` to a temp file and rename it over the backing file
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let tmp_path = sibling(&self.path, "tmp");
        let content = serde_json::to_string_pretty(entries)?;
        fs::File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(content.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path))
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })?;
        debug!(key, bytes = value.len(), "FileStore::set: persisted");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let mut removed = false;
        self.update(|entries| {
            removed = entries.remove(key).is_some();
            removed
        })?;
        if removed {
            info!(key, "Removed key");
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// In-memory storage, counting writes
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries (not counted as writes)
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            writes: 0,
        }
    }

    /// Number of successful `set`/`remove` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        self.writes += 1;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// `store.json` -> `store.json.{suffix}`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
