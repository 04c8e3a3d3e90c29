use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{KeyValueStore, Result};

/// Handle to the origin's storage area, or to nothing at all.
///
/// A detached bridge stands in for contexts without storage: reads return
/// `None` and writes succeed without effect.
#[derive(Clone, Default)]
pub struct Bridge {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl Bridge {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Some(Arc::new(store)),
        }
    }

    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Read a raw value. Backend failures are logged and read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match &self.store {
            Some(store) => store.set(key, value),
            None => Ok(()),
        }
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match &self.store {
            Some(store) => store.remove(key),
            None => Ok(()),
        }
    }

    /// Read and parse a JSON value.
    ///
    /// A value that fails to parse is treated as absent and removed, so the
    /// next read does not trip over it again.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupted stored value");
                if let Err(e) = self.remove(key) {
                    warn!(key, error = %e, "failed to clear corrupted stored value");
                }
                None
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if self.store.is_none() {
            return Ok(());
        }
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("available", &self.is_available())
            .finish()
    }
}
