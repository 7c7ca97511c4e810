use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{CooldownGroup, CooldownInstance};

/// Active cooldowns of one actor, at most one per group.
///
/// Profiles are shared between the repository and in-flight dispatches, so
/// every method takes `&self` and implementations guard their own state.
pub trait CooldownProfile: Send + Sync {
    fn get_cooldown(&self, group: &CooldownGroup) -> Option<CooldownInstance>;

    fn set_cooldown(&self, group: CooldownGroup, instance: CooldownInstance);

    fn delete_cooldown(&self, group: &CooldownGroup);

    fn is_empty(&self) -> bool;
}

pub type SharedProfile = Arc<dyn CooldownProfile>;

#[derive(Debug, Default)]
pub struct StandardCooldownProfile {
    cooldowns: Mutex<HashMap<CooldownGroup, CooldownInstance>>,
}

impl StandardCooldownProfile {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CooldownProfile for StandardCooldownProfile {
    fn get_cooldown(&self, group: &CooldownGroup) -> Option<CooldownInstance> {
        self.cooldowns.lock().get(group).cloned()
    }

    fn set_cooldown(&self, group: CooldownGroup, instance: CooldownInstance) {
        self.cooldowns.lock().insert(group, instance);
    }

    fn delete_cooldown(&self, group: &CooldownGroup) {
        self.cooldowns.lock().remove(group);
    }

    fn is_empty(&self) -> bool {
        self.cooldowns.lock().is_empty()
    }
}

/// Creates the empty profile stored on an actor's first cooldown.
pub trait CooldownProfileFactory: Send + Sync {
    fn create(&self) -> SharedProfile;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCooldownProfileFactory;

impl CooldownProfileFactory for StandardCooldownProfileFactory {
    fn create(&self) -> SharedProfile {
        Arc::new(StandardCooldownProfile::new())
    }
}

impl<F> CooldownProfileFactory for F
where
    F: Fn() -> SharedProfile + Send + Sync,
{
    fn create(&self) -> SharedProfile {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn instance(group: &CooldownGroup) -> CooldownInstance {
        CooldownInstance::new(group.clone(), Duration::seconds(10), DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn tracks_one_instance_per_group() {
        let profile = StandardCooldownProfile::new();
        let foo = CooldownGroup::named("foo");
        assert!(profile.is_empty());

        profile.set_cooldown(foo.clone(), instance(&foo));
        let later = CooldownInstance::new(foo.clone(), Duration::seconds(99), DateTime::<Utc>::UNIX_EPOCH);
        profile.set_cooldown(foo.clone(), later.clone());

        assert_eq!(profile.get_cooldown(&foo), Some(later));
        assert!(!profile.is_empty());
    }

    #[test]
    fn empty_after_last_delete() {
        let profile = StandardCooldownProfile::new();
        let foo = CooldownGroup::named("foo");
        let bar = CooldownGroup::named("bar");
        profile.set_cooldown(foo.clone(), instance(&foo));
        profile.set_cooldown(bar.clone(), instance(&bar));

        profile.delete_cooldown(&foo);
        assert!(!profile.is_empty());
        profile.delete_cooldown(&bar);
        assert!(profile.is_empty());
        assert_eq!(profile.get_cooldown(&bar), None);
    }
}
