//! JSON-file backed storage.
//!
//! The whole key space lives in one JSON object on disk. Every write
//! rewrites the file through a temp file and a rename, so a crash never
//! leaves a half-written store behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{KeyValueStore, Result, StorageError};

const STORAGE_DIR: &str = "jobfinder";
const STORAGE_FILE: &str = "storage.json";

/// Default location of the storage file: `<data_local_dir>/jobfinder/storage.json`.
pub fn default_storage_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or(StorageError::NoDataDir)?;
    Ok(data_dir.join(STORAGE_DIR).join(STORAGE_FILE))
}

/// Storage backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store. An unreadable or malformed file
    /// also starts empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "storage file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "opened storage file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at [`default_storage_path`].
    pub fn open_default() -> Result<Self> {
        Self::open(default_storage_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        // Temp files are created owner-only (0600); the rename keeps that mode.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
