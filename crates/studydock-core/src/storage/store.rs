//! Key to JSON document persistence contract.
//!
//! Writes are synchronous and visible to the next read. There is no
//! atomicity across keys.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::StoreKey;
use crate::error::StoreError;

pub trait Store {
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;
    fn write(&mut self, key: StoreKey, value: &Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Typed helpers on top of [`Store`] that never fail.
///
/// Failures are logged and turned into defaults (reads) or skipped (writes).
pub trait StoreExt: Store {
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        match self.read(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(%key, error = %e, "stored document unreadable, using default");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                warn!(%key, error = %e, "store read failed, using default");
                T::default()
            }
        }
    }

    /// Returns `false` if the write was skipped.
    fn save<T: Serialize + ?Sized>(&mut self, key: StoreKey, doc: &T) -> bool {
        let value = match serde_json::to_value(doc) {
            Ok(v) => v,
            Err(e) => {
                warn!(%key, error = %e, "could not encode document, write skipped");
                return false;
            }
        };
        match self.write(key, &value) {
            Ok(()) => true,
            Err(e) => {
                warn!(%key, error = %e, "store write failed, write skipped");
                false
            }
        }
    }

    /// Returns `false` if the removal failed.
    fn discard(&mut self, key: StoreKey) -> bool {
        match self.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(%key, error = %e, "store remove failed");
                false
            }
        }
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: HashMap<StoreKey, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn contains(&self, key: StoreKey) -> bool {
        self.docs.contains_key(&key)
    }
}

impl Store for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.get(&key).cloned())
    }

    fn write(&mut self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        self.docs.insert(key, value.clone());
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), StoreError> {
        self.docs.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct BrokenStore;

    impl Store for BrokenStore {
        fn read(&self, _key: StoreKey) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Locked)
        }
        fn write(&mut self, _key: StoreKey, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::Locked)
        }
        fn remove(&mut self, _key: StoreKey) -> Result<(), StoreError> {
            Err(StoreError::Locked)
        }
    }

    #[test]
    fn writes_are_visible_immediately() {
        let mut store = MemoryStore::new();
        store.write(StoreKey::UserPoints, &json!(30)).unwrap();
        assert_eq!(store.read(StoreKey::UserPoints).unwrap(), Some(json!(30)));
        store.remove(StoreKey::UserPoints).unwrap();
        assert_eq!(store.read(StoreKey::UserPoints).unwrap(), None);
    }

    #[test]
    fn load_missing_or_corrupt_gives_default() {
        let mut store = MemoryStore::new();
        let points: u64 = store.load_or_default(StoreKey::UserPoints);
        assert_eq!(points, 0);
        store.write(StoreKey::Tasks, &json!("not a list")).unwrap();
        let tasks: Vec<crate::model::Task> = store.load_or_default(StoreKey::Tasks);
        assert!(tasks.is_empty());
    }

    #[test]
    fn failures_are_absorbed() {
        let mut store = BrokenStore;
        let points: u64 = store.load_or_default(StoreKey::UserPoints);
        assert_eq!(points, 0);
        assert!(!store.save(StoreKey::UserPoints, &10u64));
        assert!(!store.discard(StoreKey::UserPoints));
    }
}
