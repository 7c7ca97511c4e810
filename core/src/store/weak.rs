use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::KeyedStore;

struct WeakEntry<T, V> {
    key: Weak<T>,
    value: V,
}

/// Store whose entries live only as long as someone else holds the key.
///
/// Keys are shared handles (`Arc<T>`) compared by value, so two handles to
/// equal actors address the same entry. The store itself keeps only weak
/// references; once the last strong handle is dropped the entry reads as
/// absent and is swept on the next write. There is no capacity control,
/// which makes it a poor fit for long-running production hosts.
pub struct WeakStore<T, V> {
    hasher: RandomState,
    buckets: Mutex<HashMap<u64, Vec<WeakEntry<T, V>>>>,
}

impl<T, V> WeakStore<T, V> {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries whose key is still alive.
    pub fn live_len(&self) -> usize {
        self.buckets
            .lock()
            .values()
            .flatten()
            .filter(|e| e.key.strong_count() > 0)
            .count()
    }
}

impl<T, V> Default for WeakStore<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash, V> WeakStore<T, V> {
    fn bucket_of(&self, key: &T) -> u64 {
        self.hasher.hash_one(key)
    }

    fn sweep(buckets: &mut HashMap<u64, Vec<WeakEntry<T, V>>>) {
        buckets.retain(|_, entries| {
            entries.retain(|e| e.key.strong_count() > 0);
            !entries.is_empty()
        });
    }

    fn position(entries: &[WeakEntry<T, V>], key: &T) -> Option<usize> {
        entries
            .iter()
            .position(|e| e.key.upgrade().is_some_and(|k| *k == *key))
    }
}

impl<T, V> KeyedStore<Arc<T>, V> for WeakStore<T, V>
where
    T: Eq + Hash + Send + Sync,
    V: Clone + Send,
{
    fn put(&self, key: Arc<T>, value: V) {
        let hash = self.bucket_of(&key);
        let mut buckets = self.buckets.lock();
        Self::sweep(&mut buckets);

        let entries = buckets.entry(hash).or_default();
        match Self::position(entries, &key) {
            Some(i) => entries[i].value = value,
            None => entries.push(WeakEntry {
                key: Arc::downgrade(&key),
                value,
            }),
        }
    }

    fn get_if_present(&self, key: &Arc<T>) -> Option<V> {
        let hash = self.bucket_of(key);
        let buckets = self.buckets.lock();
        let entries = buckets.get(&hash)?;
        Self::position(entries, key).map(|i| entries[i].value.clone())
    }

    fn delete(&self, key: &Arc<T>) {
        self.pop_if_present(key);
    }

    fn pop_if_present(&self, key: &Arc<T>) -> Option<V> {
        let hash = self.bucket_of(key);
        let mut buckets = self.buckets.lock();
        let entries = buckets.get_mut(&hash)?;
        let i = Self::position(entries, key)?;
        let entry = entries.swap_remove(i);
        if entries.is_empty() {
            buckets.remove(&hash);
        }
        Some(entry.value)
    }
}
