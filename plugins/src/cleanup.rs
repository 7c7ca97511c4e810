use std::sync::Arc;

use cmdgate_core::action::ActionMeta;
use cmdgate_core::cooldown::{CooldownCreationListener, CooldownInstance, CooldownRepository};
use tokio::runtime::Handle;

/// Deletes each cooldown from its repository once it has run out, so idle
/// actors do not keep profiles alive forever.
///
/// Best effort only: gates re-check expiry by timestamp and never rely on
/// the deletion having happened. A cooldown restarted before the timer
/// fires is left alone.
pub struct ScheduledCleanupListener<C> {
    repository: Arc<dyn CooldownRepository<C>>,
    runtime: Handle,
}

impl<C> ScheduledCleanupListener<C> {
    pub fn new(repository: Arc<dyn CooldownRepository<C>>, runtime: Handle) -> Self {
        Self {
            repository,
            runtime,
        }
    }

    /// Uses the runtime of the calling context, if there is one.
    pub fn try_current(repository: Arc<dyn CooldownRepository<C>>) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|runtime| Self::new(repository, runtime))
    }
}

impl<C> CooldownCreationListener<C> for ScheduledCleanupListener<C>
where
    C: Clone + Send + Sync + 'static,
{
    fn cooldown_created(
        &self,
        sender: &C,
        _action: &ActionMeta,
        instance: &CooldownInstance,
    ) -> anyhow::Result<()> {
        let delay = instance.duration().to_std().unwrap_or_default();
        let repository = Arc::clone(&self.repository);
        let key = sender.clone();
        let instance = instance.clone();

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if repository.delete_cooldown_if_current(&key, &instance) {
                tracing::trace!(
                    target: "cmdgate.cooldown",
                    group = %instance.group(),
                    "scheduled cleanup removed cooldown"
                );
            }
        });
        Ok(())
    }
}
