//! Extension trait for [`KeyValueStore`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::KeyValueStore;

/// Typed convenience methods for [`KeyValueStore`].
///
/// Implemented as default methods on an extension trait so that
/// [`KeyValueStore`] stays object-safe and implementors only handle strings.
///
/// # Example
///
/// ```
/// use kb_store::{KeyValueStoreExt, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set_json("bookmarks", &vec!["subject/a".to_owned()]);
/// let bookmarks: Option<Vec<String>> = store.get_json("bookmarks");
/// assert_eq!(bookmarks, Some(vec!["subject/a".to_owned()]));
/// ```
pub trait KeyValueStoreExt: KeyValueStore {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `None` when the key is absent or the stored text does not
    /// decode as `T`. Decode failures are logged.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.get(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
                None
            }
        }
    }

    /// Store a value as JSON.
    ///
    /// Logs and does nothing if serialization fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.set(key, &text),
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize value for store"),
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_get_json_absent() {
        let store = MemoryStore::new();

        let value: Option<Vec<String>> = store.get_json("bookmarks");

        assert_eq!(value, None);
    }

    #[test]
    fn test_get_json_unparsable_is_none() {
        let store = MemoryStore::with_entries([("bookmarks", "{not json")]);

        let value: Option<Vec<String>> = store.get_json("bookmarks");

        assert_eq!(value, None);
    }

    #[test]
    fn test_get_json_wrong_shape_is_none() {
        let store = MemoryStore::with_entries([("bookmarks", r#"{"a": 1}"#)]);

        let value: Option<Vec<String>> = store.get_json("bookmarks");

        assert_eq!(value, None);
    }

    #[test]
    fn test_set_json_then_get_json() {
        let store = MemoryStore::new();
        let mut map = BTreeMap::new();
        map.insert("circuits".to_owned(), vec![0_usize, 2]);

        store.set_json("progress", &map);

        assert_eq!(store.get("progress").as_deref(), Some(r#"{"circuits":[0,2]}"#));
        assert_eq!(
            store.get_json::<BTreeMap<String, Vec<usize>>>("progress"),
            Some(map)
        );
    }

    #[test]
    fn test_ext_usable_on_trait_object() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());

        store.set_json("n", &5);

        assert_eq!(store.get_json::<i32>("n"), Some(5));
    }
}
