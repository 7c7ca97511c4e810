// core/src/store/trait.rs

/// Per-key state holder used by every gate.
///
/// At most one value is live per key. A value written by `put` is visible to
/// the next call on any thread. Implementations may evict entries on their
/// own (capacity, TTL, dropped weak keys); callers treat an evicted key
/// exactly like one that was never written.
pub trait KeyedStore<K, V>: Send + Sync {
    /// Replaces any existing value for `key`.
    fn put(&self, key: K, value: V);

    fn get_if_present(&self, key: &K) -> Option<V>;

    /// Removes `key` if present. No-op otherwise.
    fn delete(&self, key: &K);

    /// Returns and removes the value for `key`.
    ///
    /// The default composes `get_if_present` and `delete`; stores that hold a
    /// lock should override it so the pair is atomic.
    fn pop_if_present(&self, key: &K) -> Option<V> {
        let value = self.get_if_present(key)?;
        self.delete(key);
        Some(value)
    }
}
