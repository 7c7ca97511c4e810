use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cmdgate_core::store::KeyedStore;
use cmdgate_core::time::{self, Clock, SystemClock};
use lru::LruCache;
use parking_lot::Mutex;

/// Writes between full expiry sweeps never drop below this.
const SWEEP_FLOOR: usize = 64;

struct Stamped<V> {
    value: V,
    written_at: DateTime<Utc>,
}

struct State<K: Hash + Eq, V> {
    cache: LruCache<K, Stamped<V>>,
    writes_since_sweep: usize,
}

/// Bounded and/or time-limited store.
///
/// With a capacity, the least recently used entry is evicted once the store
/// is full. With a TTL, an entry reads as absent once it is older than the
/// TTL (expire-after-write). Expired entries are dropped on read, from the
/// LRU end on every write, and by a full sweep once the writes since the
/// last one match the store size. Evictions are silent.
pub struct LruStore<K: Hash + Eq, V> {
    state: Mutex<State<K, V>>,
    ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    pub fn new(capacity: Option<NonZeroUsize>, ttl: Option<Duration>, clock: Arc<dyn Clock>) -> Self {
        let cache = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            state: Mutex::new(State {
                cache,
                writes_since_sweep: 0,
            }),
            ttl,
            clock,
        }
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::new(Some(capacity), None, Arc::new(SystemClock))
    }

    /// Live entries plus expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().cache.is_empty()
    }

    fn expired(&self, entry: &Stamped<V>, now: DateTime<Utc>) -> bool {
        self.ttl
            .is_some_and(|ttl| time::remaining(entry.written_at, ttl, now).is_none())
    }
}

impl<K: Hash + Eq + Clone, V> LruStore<K, V> {
    fn sweep_expired(&self, state: &mut State<K, V>, now: DateTime<Utc>) {
        if self.ttl.is_none() {
            return;
        }
        let before = state.cache.len();
        while state
            .cache
            .peek_lru()
            .is_some_and(|(_, entry)| self.expired(entry, now))
        {
            state.cache.pop_lru();
        }

        // Reads reorder entries, so an expired one can sit behind a live
        // LRU tail. Catch those with an occasional full pass.
        state.writes_since_sweep += 1;
        if state.writes_since_sweep >= state.cache.len().max(SWEEP_FLOOR) {
            state.writes_since_sweep = 0;
            let stale: Vec<K> = state
                .cache
                .iter()
                .filter(|(_, entry)| self.expired(entry, now))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &stale {
                state.cache.pop(key);
            }
        }

        let swept = before - state.cache.len();
        if swept > 0 {
            tracing::trace!(target: "cmdgate.store", swept, len = state.cache.len(), "lru store dropped expired entries");
        }
    }
}

impl<K, V> KeyedStore<K, V> for LruStore<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        let written_at = self.clock.now();
        let mut state = self.state.lock();
        self.sweep_expired(&mut state, written_at);
        // `push` also hands back the old entry when `key` was already present.
        if let Some((old_key, _)) = state.cache.push(key, Stamped { value, written_at }) {
            if !state.cache.contains(&old_key) {
                tracing::trace!(target: "cmdgate.store", len = state.cache.len(), "lru store evicted an entry");
            }
        }
    }

    fn get_if_present(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let entry = state.cache.get(key)?;
        if self.expired(entry, now) {
            state.cache.pop(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn delete(&self, key: &K) {
        self.state.lock().cache.pop(key);
    }

    fn pop_if_present(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let entry = self.state.lock().cache.pop(key)?;
        if self.expired(&entry, now) {
            return None;
        }
        Some(entry.value)
    }
}
