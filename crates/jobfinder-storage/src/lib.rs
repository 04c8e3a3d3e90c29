//! Persistent key-value storage for the Job Finder client.
//!
//! The client keeps three values across restarts: the serialized user
//! record, the raw auth token, and the last known subscription snapshot.
//! Storage is reached through a [`Bridge`], which may be detached when the
//! process has no storage context (every read is then empty and every write
//! is dropped).
//!
//! # Example
//!
//! ```
//! use jobfinder_storage::{Bridge, MemoryStore, keys};
//!
//! let bridge = Bridge::new(MemoryStore::new());
//! bridge.set(keys::TOKEN, "abc123").unwrap();
//! assert_eq!(bridge.get(keys::TOKEN).as_deref(), Some("abc123"));
//! ```

mod bridge;
mod error;
mod file;
mod memory;

pub use bridge::Bridge;
pub use error::{Result, StorageError};
pub use file::{FileStore, default_storage_path};
pub use memory::MemoryStore;

/// Keys used by the client stores.
pub mod keys {
    /// Serialized user record.
    pub const USER: &str = "user";
    /// Raw bearer token, kept apart from the record for fast lookup.
    pub const TOKEN: &str = "token";
    /// Serialized subscription snapshot.
    pub const SUBSCRIPTION: &str = "subscription";
}

/// A synchronous string-keyed storage area.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
