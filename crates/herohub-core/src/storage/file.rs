use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{Storage, StorageError};

/// Storage file name in the storage directory
const STORAGE_FILE: &str = "storage.json";

/// Durable storage kept as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temp file and a rename, so
/// a crash mid-write leaves the previous contents intact.
pub struct FileStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    fn storage_path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.storage_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read the map for a write. A corrupt file is replaced rather than
    /// blocking every future write.
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Ok(map) => Ok(map),
            Err(StorageError::Corrupt(e)) => {
                warn!(error = %e, path = ?self.storage_path(), "Discarding corrupt storage file");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.storage_path();
        let temp_path = self.dir.join(format!("{}.tmp", STORAGE_FILE));

        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &path)?;
        debug!(?path, entries = map.len(), "Storage file written");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut map = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut map = self.read_map_for_write()?;
        map.remove(key);
        self.write_map(&map)
    }
}
