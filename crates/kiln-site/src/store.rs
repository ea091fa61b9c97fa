//! Case-insensitive key/value storage.

use std::collections::HashMap;
use std::collections::hash_map;

/// Map whose keys are lower-cased on every operation.
///
/// `"Content-Type"` and `"content-type"` address the same slot; the last
/// write wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseInsensitiveStore<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for CaseInsensitiveStore<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl<V> CaseInsensitiveStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the value previously stored under any casing
    /// of `key`.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.entries.insert(normalize(key), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&normalize(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(&normalize(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    /// Remove a key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(&normalize(key))
    }

    /// Remove a key, returning its value if present.
    ///
    /// Alias of [`remove`](Self::remove) for callers that treat the store as
    /// a header bag.
    pub fn pop(&mut self, key: &str) -> Option<V> {
        self.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries. Keys are yielded in their normalized form.
    pub fn iter(&self) -> hash_map::Iter<'_, String, V> {
        self.entries.iter()
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for CaseInsensitiveStore<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for CaseInsensitiveStore<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<'a, V> IntoIterator for &'a CaseInsensitiveStore<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = hash_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
