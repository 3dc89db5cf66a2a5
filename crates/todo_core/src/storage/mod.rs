use crate::error::AppError;
use std::collections::BTreeMap;

mod local_storage;

pub use local_storage::FileStorage;

/// String-keyed, string-valued storage with browser local-storage semantics.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Volatile storage, used when nothing should outlive the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryStorage};

    #[test]
    fn memory_storage_returns_none_for_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("todos").unwrap(), None);
    }

    #[test]
    fn memory_storage_overwrites_values() {
        let mut storage = MemoryStorage::with_entry("todos", "[]");
        storage.set("todos", "[1]").unwrap();
        assert_eq!(storage.get("todos").unwrap().as_deref(), Some("[1]"));
    }
}
