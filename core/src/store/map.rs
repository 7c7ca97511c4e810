use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

use super::KeyedStore;

/// Plain mutex-guarded map. Never evicts; bounding it is the caller's job.
#[derive(Debug)]
pub struct MapStore<K, V> {
    map: Mutex<HashMap<K, V>>,
}

impl<K, V> MapStore<K, V> {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }
}

impl<K, V> Default for MapStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyedStore<K, V> for MapStore<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        self.map.lock().insert(key, value);
    }

    fn get_if_present(&self, key: &K) -> Option<V> {
        self.map.lock().get(key).cloned()
    }

    fn delete(&self, key: &K) {
        self.map.lock().remove(key);
    }

    fn pop_if_present(&self, key: &K) -> Option<V> {
        self.map.lock().remove(key)
    }
}
