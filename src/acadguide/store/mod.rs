//! # Primary tier
//!
//! The primary tier is a synchronous key-value store holding whole
//! collections as serialized JSON blobs under namespaced keys
//! (`acadGuideDepartments`, `acadGuideFeedback`, ...). It is abstracted
//! behind the [`KeyValueBackend`] trait to:
//!
//! - Enable **testing** with [`MemoryBackend`] (no filesystem needed)
//! - Allow **future backends** without changing core logic
//! - Keep the façade **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileBackend`]: production storage, one file per key under a root
//!   directory
//! - [`memory::MemoryBackend`]: in-memory storage for tests
//!
//! [`PrimaryStore`] layers collection semantics on the raw backend:
//! validation filtering, JSON (de)serialization, and the key namespace. It is
//! the tier every write touches first and the source of truth for all reads
//! within a session.

use crate::error::Result;
use crate::model::Collection;
use crate::validate::filter_valid;
use log::warn;
use serde_json::Value;

pub mod fs;
pub mod memory;

pub use fs::FileBackend;
pub use memory::MemoryBackend;

/// Abstract interface for raw string key-value I/O.
///
/// Implementations take `&self`; a backend that needs mutation uses interior
/// mutability so the façade can be shared across subscribers.
pub trait KeyValueBackend {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Collection-level operations over a raw [`KeyValueBackend`].
pub struct PrimaryStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> PrimaryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replaces the whole collection with the valid subset of `records`.
    /// Returns how many records were kept.
    pub fn write(&self, collection: Collection, records: &[Value]) -> Result<usize> {
        let kept = filter_valid(collection, records);
        let text = serde_json::to_string(&kept)?;
        self.backend.set(collection.storage_key(), &text)?;
        Ok(kept.len())
    }

    /// Reads the whole collection. Returns `None` when the key is absent or
    /// its content does not parse; a parse failure is logged, not propagated.
    pub fn read(&self, collection: Collection) -> Result<Option<Vec<Value>>> {
        let Some(text) = self.backend.get(collection.storage_key())? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(records) => Ok(Some(records)),
            Err(err) => {
                warn!("corrupt primary blob for {collection}: {err}");
                Ok(None)
            }
        }
    }

    /// Reads an arbitrary namespaced key as JSON (bookmarks, user profile).
    pub fn read_key(&self, key: &str) -> Result<Option<Value>> {
        let Some(text) = self.backend.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("corrupt primary value under {key}: {err}");
                Ok(None)
            }
        }
    }

    /// Writes an arbitrary namespaced key as JSON.
    pub fn write_key(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key, &text)
    }
}
