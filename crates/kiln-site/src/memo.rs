//! Per-field memoization for derived values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

/// Cache for one derived property, keyed by the arguments it was computed
/// from.
///
/// The first [`get_or_insert_with`](Self::get_or_insert_with) for a key runs
/// the derivation and stores the result; later calls with an equal key
/// return a clone of the stored value. The cache lives as long as its owner.
///
/// `Memo` uses interior mutability and is `Send` but not `Sync`, so an owner
/// must stay on one thread at a time.
#[derive(Debug)]
pub struct Memo<K, V> {
    cache: RefCell<HashMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it with `derive` on a miss.
    pub fn get_or_insert_with(&self, key: K, derive: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.cache.borrow().get(&key) {
            return value.clone();
        }
        // The borrow is released before deriving so `derive` may consult other
        // memoized fields of the same owner.
        let value = derive(&key);
        self.cache.borrow_mut().insert(key, value.clone());
        value
    }

    /// Cached value for `key`, if already computed.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.borrow().get(key).cloned()
    }

    /// Drop every cached value.
    pub fn clear(&mut self) {
        self.cache.get_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}
