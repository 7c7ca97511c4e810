use chrono::Duration;

use super::CooldownInstance;
use crate::action::ActionMeta;

/// Invoked when a dispatch is denied because a cooldown is still running.
pub trait CooldownActiveListener<C>: Send + Sync {
    fn cooldown_active(
        &self,
        sender: &C,
        action: &ActionMeta,
        instance: &CooldownInstance,
        remaining: Duration,
    ) -> anyhow::Result<()>;
}

impl<C, F> CooldownActiveListener<C> for F
where
    F: Fn(&C, &ActionMeta, &CooldownInstance, Duration) -> anyhow::Result<()> + Send + Sync,
{
    fn cooldown_active(
        &self,
        sender: &C,
        action: &ActionMeta,
        instance: &CooldownInstance,
        remaining: Duration,
    ) -> anyhow::Result<()> {
        self(sender, action, instance, remaining)
    }
}

/// Invoked after a new cooldown has been stored and the action allowed.
pub trait CooldownCreationListener<C>: Send + Sync {
    fn cooldown_created(
        &self,
        sender: &C,
        action: &ActionMeta,
        instance: &CooldownInstance,
    ) -> anyhow::Result<()>;
}

impl<C, F> CooldownCreationListener<C> for F
where
    F: Fn(&C, &ActionMeta, &CooldownInstance) -> anyhow::Result<()> + Send + Sync,
{
    fn cooldown_created(
        &self,
        sender: &C,
        action: &ActionMeta,
        instance: &CooldownInstance,
    ) -> anyhow::Result<()> {
        self(sender, action, instance)
    }
}
