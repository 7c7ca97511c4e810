use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use super::profile::{CooldownProfileFactory, SharedProfile};
use super::{CooldownGroup, CooldownInstance};
use crate::store::{KeyedStore, MapStore};

/// Owns the cooldown profiles of every actor, keyed by `K`.
pub trait CooldownRepository<K>: Send + Sync {
    /// Returns the actor's profile, creating and storing an empty one on
    /// first access. Concurrent callers for the same key observe the same
    /// profile.
    fn get_profile(&self, key: &K, factory: &dyn CooldownProfileFactory) -> SharedProfile;

    fn get_profile_if_exists(&self, key: &K) -> Option<SharedProfile>;

    /// Runs `f` on the actor's profile, creating it if needed, with
    /// deletions held off until `f` returns. The profile `f` sees is the
    /// one stored, so writes made through it are never orphaned.
    fn update_profile(
        &self,
        key: &K,
        factory: &dyn CooldownProfileFactory,
        f: &mut dyn FnMut(&SharedProfile),
    );

    fn delete_profile(&self, key: &K);

    /// Removes one group from the actor's profile, dropping the profile
    /// itself once it holds no cooldowns. No-op when there is no profile.
    fn delete_cooldown(&self, key: &K, group: &CooldownGroup);

    /// Like [`delete_cooldown`](Self::delete_cooldown), but only while the
    /// group still holds `instance`. Returns whether it was removed.
    fn delete_cooldown_if_current(&self, key: &K, instance: &CooldownInstance) -> bool;
}

/// Repository over any [`KeyedStore`] of profiles.
///
/// A single lock serialises read-create-store, profile updates and the
/// delete cascade. Each holds it for a handful of O(1) store calls.
pub struct CacheCooldownRepository<K> {
    store: Arc<dyn KeyedStore<K, SharedProfile>>,
    lock: Mutex<()>,
}

impl<K> CacheCooldownRepository<K> {
    pub fn new(store: Arc<dyn KeyedStore<K, SharedProfile>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }
}

impl<K: Clone> CacheCooldownRepository<K> {
    /// Caller holds `self.lock`.
    fn load_or_create(&self, key: &K, factory: &dyn CooldownProfileFactory) -> SharedProfile {
        if let Some(profile) = self.store.get_if_present(key) {
            return profile;
        }
        let profile = factory.create();
        self.store.put(key.clone(), Arc::clone(&profile));
        tracing::trace!(target: "cmdgate.cooldown", "created cooldown profile");
        profile
    }

    /// Caller holds `self.lock`.
    fn remove_group(&self, key: &K, group: &CooldownGroup) {
        let Some(profile) = self.store.get_if_present(key) else {
            return;
        };
        profile.delete_cooldown(group);
        if profile.is_empty() {
            self.store.delete(key);
            tracing::trace!(
                target: "cmdgate.cooldown",
                group = %group,
                "deleted empty cooldown profile"
            );
        }
    }
}

impl<K> CooldownRepository<K> for CacheCooldownRepository<K>
where
    K: Clone + Send + Sync,
{
    fn get_profile(&self, key: &K, factory: &dyn CooldownProfileFactory) -> SharedProfile {
        let _guard = self.lock.lock();
        self.load_or_create(key, factory)
    }

    fn get_profile_if_exists(&self, key: &K) -> Option<SharedProfile> {
        self.store.get_if_present(key)
    }

    fn update_profile(
        &self,
        key: &K,
        factory: &dyn CooldownProfileFactory,
        f: &mut dyn FnMut(&SharedProfile),
    ) {
        let _guard = self.lock.lock();
        let profile = self.load_or_create(key, factory);
        f(&profile);
    }

    fn delete_profile(&self, key: &K) {
        let _guard = self.lock.lock();
        self.store.delete(key);
    }

    fn delete_cooldown(&self, key: &K, group: &CooldownGroup) {
        let _guard = self.lock.lock();
        self.remove_group(key, group);
    }

    fn delete_cooldown_if_current(&self, key: &K, instance: &CooldownInstance) -> bool {
        let _guard = self.lock.lock();
        let current = self
            .store
            .get_if_present(key)
            .and_then(|profile| profile.get_cooldown(instance.group()));
        if current.as_ref() != Some(instance) {
            return false;
        }
        self.remove_group(key, instance.group());
        true
    }
}

/// Adapts transient actor handles `C` to the durable keys `K` of another
/// repository.
pub struct MappingCooldownRepository<C, K> {
    mapping: Arc<dyn Fn(&C) -> K + Send + Sync>,
    inner: Arc<dyn CooldownRepository<K>>,
    _actor: PhantomData<fn(&C)>,
}

impl<C, K> MappingCooldownRepository<C, K> {
    pub fn new<F>(mapping: F, inner: Arc<dyn CooldownRepository<K>>) -> Self
    where
        F: Fn(&C) -> K + Send + Sync + 'static,
    {
        Self {
            mapping: Arc::new(mapping),
            inner,
            _actor: PhantomData,
        }
    }
}

impl<C, K> CooldownRepository<C> for MappingCooldownRepository<C, K>
where
    K: 'static,
{
    fn get_profile(&self, key: &C, factory: &dyn CooldownProfileFactory) -> SharedProfile {
        self.inner.get_profile(&(self.mapping)(key), factory)
    }

    fn get_profile_if_exists(&self, key: &C) -> Option<SharedProfile> {
        self.inner.get_profile_if_exists(&(self.mapping)(key))
    }

    fn update_profile(
        &self,
        key: &C,
        factory: &dyn CooldownProfileFactory,
        f: &mut dyn FnMut(&SharedProfile),
    ) {
        self.inner.update_profile(&(self.mapping)(key), factory, f)
    }

    fn delete_profile(&self, key: &C) {
        self.inner.delete_profile(&(self.mapping)(key))
    }

    fn delete_cooldown(&self, key: &C, group: &CooldownGroup) {
        self.inner.delete_cooldown(&(self.mapping)(key), group)
    }

    fn delete_cooldown_if_current(&self, key: &C, instance: &CooldownInstance) -> bool {
        self.inner.delete_cooldown_if_current(&(self.mapping)(key), instance)
    }
}

pub fn for_store<K>(store: Arc<dyn KeyedStore<K, SharedProfile>>) -> Arc<dyn CooldownRepository<K>>
where
    K: Clone + Send + Sync + 'static,
{
    Arc::new(CacheCooldownRepository::new(store))
}

/// Repository over an unbounded [`MapStore`].
pub fn for_map<K>() -> Arc<dyn CooldownRepository<K>>
where
    K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
{
    for_store(Arc::new(MapStore::<K, SharedProfile>::new()))
}

pub fn mapping<C, K, F>(mapping: F, inner: Arc<dyn CooldownRepository<K>>) -> Arc<dyn CooldownRepository<C>>
where
    C: 'static,
    K: 'static,
    F: Fn(&C) -> K + Send + Sync + 'static,
{
    Arc::new(MappingCooldownRepository::new(mapping, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::profile::StandardCooldownProfileFactory;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Barrier;

    fn instance(group: &CooldownGroup) -> CooldownInstance {
        CooldownInstance::new(group.clone(), Duration::hours(1), DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn get_profile_creates_once() {
        let repo = for_map::<String>();
        let alice = "alice".to_string();
        assert!(repo.get_profile_if_exists(&alice).is_none());

        let first = repo.get_profile(&alice, &StandardCooldownProfileFactory);
        let second = repo.get_profile(&alice, &StandardCooldownProfileFactory);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(repo.get_profile_if_exists(&alice).is_some());
    }

    #[test]
    fn deleting_last_cooldown_drops_profile() {
        let repo = for_map::<&str>();
        let foo = CooldownGroup::named("foo");
        let bar = CooldownGroup::named("bar");
        let profile = repo.get_profile(&"alice", &StandardCooldownProfileFactory);
        profile.set_cooldown(foo.clone(), instance(&foo));
        profile.set_cooldown(bar.clone(), instance(&bar));

        repo.delete_cooldown(&"alice", &foo);
        assert!(repo.get_profile_if_exists(&"alice").is_some());

        repo.delete_cooldown(&"alice", &bar);
        assert!(repo.get_profile_if_exists(&"alice").is_none());
    }

    #[test]
    fn delete_cooldown_without_profile_is_noop() {
        let repo = for_map::<&str>();
        repo.delete_cooldown(&"ghost", &CooldownGroup::named("foo"));
        assert!(repo.get_profile_if_exists(&"ghost").is_none());
    }

    #[test]
    fn delete_profile_is_unconditional() {
        let repo = for_map::<&str>();
        let foo = CooldownGroup::named("foo");
        repo.get_profile(&"alice", &StandardCooldownProfileFactory)
            .set_cooldown(foo.clone(), instance(&foo));

        repo.delete_profile(&"alice");
        assert!(repo.get_profile_if_exists(&"alice").is_none());
    }

    #[test]
    fn mapping_shares_state_between_handles() {
        #[derive(Clone)]
        struct Session {
            user: &'static str,
            _connection: u32,
        }

        let durable = for_map::<&'static str>();
        let repo = mapping(|s: &Session| s.user, Arc::clone(&durable));
        let foo = CooldownGroup::named("foo");

        let first = Session { user: "alice", _connection: 1 };
        let second = Session { user: "alice", _connection: 2 };
        repo.get_profile(&first, &StandardCooldownProfileFactory)
            .set_cooldown(foo.clone(), instance(&foo));

        let seen = repo.get_profile_if_exists(&second).unwrap();
        assert!(seen.get_cooldown(&foo).is_some());
        assert!(durable.get_profile_if_exists(&"alice").is_some());

        repo.delete_cooldown(&second, &foo);
        assert!(durable.get_profile_if_exists(&"alice").is_none());
    }

    #[test]
    fn conditional_delete_spares_restarted_cooldown() {
        let repo = for_map::<&str>();
        let dig = CooldownGroup::named("dig");
        let first = instance(&dig);
        let restarted = CooldownInstance::new(dig.clone(), Duration::hours(1), DateTime::<Utc>::UNIX_EPOCH + Duration::hours(2));
        repo.get_profile(&"alice", &StandardCooldownProfileFactory)
            .set_cooldown(dig.clone(), restarted.clone());

        assert!(!repo.delete_cooldown_if_current(&"alice", &first));
        assert_eq!(repo.get_profile_if_exists(&"alice").unwrap().get_cooldown(&dig), Some(restarted.clone()));

        assert!(repo.delete_cooldown_if_current(&"alice", &restarted));
        assert!(repo.get_profile_if_exists(&"alice").is_none());
        assert!(!repo.delete_cooldown_if_current(&"ghost", &restarted));
    }

    #[test]
    fn stale_handle_write_is_lost_but_update_is_kept() {
        let repo = for_map::<&str>();
        let dig = CooldownGroup::named("dig");
        let stale = repo.get_profile(&"alice", &StandardCooldownProfileFactory);
        stale.set_cooldown(dig.clone(), instance(&dig));

        // Cleanup empties and drops the profile between read and write.
        repo.delete_cooldown(&"alice", &dig);
        stale.set_cooldown(dig.clone(), instance(&dig));
        assert!(repo.get_profile_if_exists(&"alice").is_none());

        repo.update_profile(&"alice", &StandardCooldownProfileFactory, &mut |profile: &SharedProfile| {
            profile.set_cooldown(dig.clone(), instance(&dig));
        });
        let stored = repo.get_profile_if_exists(&"alice").unwrap();
        assert_eq!(stored.get_cooldown(&dig), Some(instance(&dig)));
        assert!(!Arc::ptr_eq(&stored, &stale));
    }

    #[test]
    fn concurrent_updates_and_cleanup_never_orphan_a_write() {
        let repo = for_map::<u32>();
        let dig = CooldownGroup::named("dig");
        let rounds = 500;
        let barrier = Arc::new(Barrier::new(2));

        let cleaner = {
            let (repo, dig, barrier) = (Arc::clone(&repo), dig.clone(), Arc::clone(&barrier));
            std::thread::spawn(move || {
                barrier.wait();
                for _ in 0..rounds {
                    repo.delete_cooldown(&1, &dig);
                }
            })
        };
        barrier.wait();
        for _ in 0..rounds {
            let mut written = None;
            repo.update_profile(&1, &StandardCooldownProfileFactory, &mut |profile: &SharedProfile| {
                profile.set_cooldown(dig.clone(), instance(&dig));
                written = Some(Arc::clone(profile));
            });
            // Whatever the cleaner did afterwards, the write landed in the
            // stored profile and not in a detached one.
            if let (Some(written), Some(stored)) = (written, repo.get_profile_if_exists(&1)) {
                assert!(Arc::ptr_eq(&written, &stored));
            }
        }
        cleaner.join().unwrap();
    }

    #[test]
    fn concurrent_first_access_yields_one_profile() {
        let repo = for_map::<u32>();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    repo.get_profile(&7, &StandardCooldownProfileFactory)
                })
            })
            .collect();

        let profiles: Vec<SharedProfile> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = repo.get_profile_if_exists(&7).unwrap();
        assert!(profiles.iter().all(|p| Arc::ptr_eq(p, &stored)));
    }
}
