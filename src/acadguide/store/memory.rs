use super::KeyValueBackend;
use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory backend for testing and ephemeral use. Does NOT persist data.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory backend lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory backend lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory backend lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_is_last_writer_wins() {
        let backend = MemoryBackend::new();
        backend.set("k", "a").unwrap();
        backend.set("k", "b").unwrap();
        assert_eq!(backend.get("k").unwrap(), Some("b".to_string()));
    }
}
