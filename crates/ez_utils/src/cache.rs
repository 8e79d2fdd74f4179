use core::fmt::Debug;
use core::hash::{BuildHasher, Hash};
use std::sync::{PoisonError, RwLock};

use crate::hash::FixedHashState;
use crate::hash::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// ReadThroughCache

/// A thread-safe, insert-only cache.
///
/// Values are built on first request and kept for the lifetime of the cache.
/// Nothing is ever evicted, so the key space must be bounded (for example by
/// the number of reflected types and members of a program).
///
/// Values are built **outside** the lock. When two threads race on the same
/// key, the first insertion wins and both observe the same value, which keeps
/// `Arc`-valued entries identity stable.
///
/// # Examples
///
/// ```
/// use ez_utils::ReadThroughCache;
///
/// let cache: ReadThroughCache<&str, usize> = ReadThroughCache::new();
/// let len = cache.get_or_try_insert_with("member", || Ok::<_, ()>(6)).unwrap();
/// assert_eq!(len, 6);
///
/// // The builder is not called again.
/// let len = cache.get_or_try_insert_with("member", || Err(())).unwrap();
/// assert_eq!(len, 6);
/// ```
pub struct ReadThroughCache<K, V, S = FixedHashState> {
    entries: RwLock<HashMap<K, V, S>>,
}

impl<K, V, S: Default> ReadThroughCache<K, V, S> {
    /// Creates an empty cache.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::with_hasher(S::default())),
        }
    }
}

impl<K, V, S: Default> Default for ReadThroughCache<K, V, S> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> ReadThroughCache<K, V, S> {
    /// Returns a clone of the cached value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns the cached value for `key`, building it with `f` on a miss.
    ///
    /// Errors from `f` are returned as-is and nothing is cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = f()?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => Ok(entry.insert(value).clone()),
        }
    }

    /// Inserts `value`, replacing any existing entry for `key`.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> Debug for ReadThroughCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let len = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ReadThroughCache")
            .field("entries", &len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::ReadThroughCache;

    #[test]
    fn failed_build_is_not_cached() {
        let cache: ReadThroughCache<u32, u32> = ReadThroughCache::new();
        assert_eq!(cache.get_or_try_insert_with(1, || Err("boom")), Err("boom"));
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_try_insert_with(1, || Ok::<_, ()>(5)), Ok(5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn racing_threads_observe_one_value() {
        let cache: Arc<ReadThroughCache<&'static str, Arc<u64>>> = Arc::new(ReadThroughCache::new());

        let handles = (0..8_u64)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    cache
                        .get_or_try_insert_with("key", || Ok::<_, ()>(Arc::new(i)))
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();

        let values = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();

        let first = cache.get(&"key").unwrap();
        assert!(values.iter().all(|v| Arc::ptr_eq(v, &first)));
    }
}
