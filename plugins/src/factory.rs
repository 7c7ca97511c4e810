use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use cmdgate_core::action::Actor;
use cmdgate_core::config::{GateConfig, StoreConfig, StoreProvider};
use cmdgate_core::confirmation::{
    ConfirmationConfiguration, ConfirmationConfigurationBuilder, ConfirmationRecord,
};
use cmdgate_core::cooldown::repository::{self, CooldownRepository};
use cmdgate_core::cooldown::{CooldownConfiguration, CooldownConfigurationBuilder, SharedProfile};
use cmdgate_core::store::{KeyedStore, MapStore};
use cmdgate_core::time::Clock;

use crate::cleanup::ScheduledCleanupListener;
use crate::store::LruStore;

/// Builds the store a config section asks for.
///
/// The weak store is not offered here: it needs `Arc<T>` keys, so hosts
/// that want it construct it directly.
pub fn build_store<K, V>(cfg: &StoreConfig, clock: Arc<dyn Clock>) -> Arc<dyn KeyedStore<K, V>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    match cfg.provider {
        StoreProvider::Map => Arc::new(MapStore::new()),
        StoreProvider::Lru => {
            let capacity = cfg.capacity.and_then(NonZeroUsize::new);
            if cfg.capacity.is_some() && capacity.is_none() {
                tracing::warn!(target: "cmdgate.store", "lru capacity 0 treated as unbounded");
            }
            Arc::new(LruStore::new(capacity, cfg.ttl, clock))
        }
    }
}

pub fn build_cooldown_repository<C>(cfg: &GateConfig, clock: Arc<dyn Clock>) -> Arc<dyn CooldownRepository<C>>
where
    C: Actor,
{
    repository::for_store(build_store::<C, SharedProfile>(&cfg.cooldown.store, clock))
}

/// Confirmation settings with store, expiry and clock filled in from
/// `cfg`. Notifiers and bypass are left to the caller.
pub fn build_confirmation<C, R>(
    cfg: &GateConfig,
    clock: Arc<dyn Clock>,
) -> ConfirmationConfigurationBuilder<C, R>
where
    C: Actor,
    R: Send + Sync + 'static,
{
    let store = build_store::<C, ConfirmationRecord<C, R>>(&cfg.confirmation.store, Arc::clone(&clock));
    let builder = ConfirmationConfiguration::builder().store(store).clock(clock);
    match cfg.confirmation.expiry {
        Some(expiry) => builder.expiry(expiry),
        None => builder,
    }
}

/// Cooldown settings with repository and clock filled in from `cfg`, plus
/// the scheduled cleanup listener when enabled. Cleanup needs a tokio
/// runtime in the calling context and is skipped without one.
pub fn build_cooldown<C>(cfg: &GateConfig, clock: Arc<dyn Clock>) -> CooldownConfigurationBuilder<C>
where
    C: Actor,
{
    let repository = build_cooldown_repository::<C>(cfg, Arc::clone(&clock));
    let mut builder = CooldownConfiguration::builder()
        .repository(Arc::clone(&repository))
        .clock(clock);

    if cfg.cooldown.scheduled_cleanup {
        match ScheduledCleanupListener::try_current(repository) {
            Some(listener) => builder = builder.creation_listener(Arc::new(listener)),
            None => tracing::warn!(
                target: "cmdgate.cooldown",
                "scheduled cleanup disabled: no tokio runtime in the calling context"
            ),
        }
    }
    builder
}
