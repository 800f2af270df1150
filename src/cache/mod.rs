//! LRU Cache
//!
//! Bounded, recency-ordered store for memoized lookups keyed by identity
//! (account details, resolved names). Every operation is O(1).
//!
//! The cache is `&mut self` throughout; share it behind a lock or keep it
//! on one task.

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::config::Config;

pub struct LruCache<K, V> {
    inner: lru::LruCache<K, V>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Cache holding at most `max_size` entries. A size of zero is raised to one.
    pub fn new(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: lru::LruCache::new(capacity),
        }
    }

    /// Cache sized from `LEDGER_CACHE_SIZE`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_size)
    }

    /// Value for `key`, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    /// Value for `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.inner.peek(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Insert or update `key`, marking it most recently used.
    ///
    /// Returns the least recently used entry if inserting a new key
    /// evicted it.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.inner.contains(&key) {
            self.inner.put(key, value);
            return None;
        }

        let evicted = self.inner.push(key, value);
        if evicted.is_some() {
            tracing::trace!(max_size = self.max_size(), "Evicted least recently used entry");
        }
        evicted
    }

    /// Remove `key`. Absent keys are not an error.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.inner.pop(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn max_size(&self) -> usize {
        self.inner.cap().get()
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .finish()
    }
}
