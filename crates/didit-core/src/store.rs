use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Deserialize;
use serde::Serialize;

use crate::error::StoreError;
use crate::error::StoreResult;

/// A single value in the shared preference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Integer(i64),
    Text(String),
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Synchronous key-value capability shared between the app process and the widget
/// process. Per-key writes are atomic; nothing spans keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>>;

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()>;

    fn remove(&self, key: &str) -> StoreResult<()>;

    fn keys(&self) -> StoreResult<Vec<String>>;

    fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::Text(text)) => Ok(Some(text)),
            Some(StoredValue::Integer(_)) => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: "text",
            }),
        }
    }

    /// Integer keys written by a string-only bridge still read back as numbers.
    fn get_integer(&self, key: &str) -> StoreResult<Option<i64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::Integer(value)) => Ok(Some(value)),
            Some(StoredValue::Text(text)) => {
                text.trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| StoreError::TypeMismatch {
                        key: key.to_string(),
                        expected: "integer",
                    })
            }
        }
    }

    fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.set(key, StoredValue::Text(value.to_string()))
    }

    fn set_integer(&self, key: &str, value: i64) -> StoreResult<()> {
        self.set(key, StoredValue::Integer(value))
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}

/// In-process store, the stand-in for a preferences handle in tests and tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StoredValue>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, StoredValue> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredValue>> {
        // A panicked writer cannot leave a half-written value behind.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }
}

/// Shared storage that was never provisioned. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> StoreResult<Option<StoredValue>> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: StoredValue) -> StoreResult<()> {
        Err(StoreError::Unavailable)
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn integer_reads_accept_numeric_text() {
        let store = MemoryStore::from_entries([("count_a", " 12 "), ("count_b", "twelve")]);
        assert_eq!(store.get_integer("count_a").expect("read"), Some(12));
        assert!(matches!(
            store.get_integer("count_b"),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert_eq!(store.get_integer("count_c").expect("read"), None);
    }

    #[test]
    fn string_reads_reject_integers() {
        let store = MemoryStore::new();
        store.set_integer("title_a", 3).expect("set");
        assert!(matches!(
            store.get_string("title_a"),
            Err(StoreError::TypeMismatch { expected: "text", .. })
        ));
    }

    #[test]
    fn writes_through_shared_reference() {
        let store = MemoryStore::new();
        let handle: &dyn KeyValueStore = &store;
        handle.set_string("action_ids", "coffee").expect("set");
        handle.remove("missing").expect("remove");
        assert_eq!(
            store.get_string("action_ids").expect("read").as_deref(),
            Some("coffee")
        );
        assert_eq!(store.keys().expect("keys"), vec!["action_ids".to_string()]);
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = UnavailableStore;
        assert!(matches!(store.get("x"), Err(StoreError::Unavailable)));
        assert!(matches!(
            store.set_integer("x", 1),
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.keys(), Err(StoreError::Unavailable)));
    }
}
