use std::sync::Arc;

use super::config::CooldownConfiguration;
use super::repository::CooldownRepository;
use super::{CooldownInstance, CooldownSpec, SharedProfile};
use crate::action::{Action, ActionMeta, CommandContext};
use crate::error::GateError;
use crate::gate::{DenyReason, GateOutcome, Postprocessor};

pub struct CooldownManager<C> {
    config: CooldownConfiguration<C>,
}

impl<C: Clone + 'static> CooldownManager<C> {
    pub fn new(config: CooldownConfiguration<C>) -> Self {
        Self { config }
    }

    pub fn configuration(&self) -> &CooldownConfiguration<C> {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn CooldownRepository<C>> {
        &self.config.repository
    }

    /// Decides one dispatch of `action` by `ctx.sender()`.
    ///
    /// A running cooldown in the effective group denies the dispatch and
    /// fires the active listeners. Otherwise a fresh instance replaces any
    /// expired one, the creation listeners fire, and the dispatch proceeds.
    pub fn evaluate(
        &self,
        ctx: &CommandContext<C>,
        action: &ActionMeta,
        spec: &CooldownSpec<C>,
    ) -> Result<GateOutcome, GateError> {
        if self.config.should_bypass(ctx) {
            tracing::trace!(target: "cmdgate.cooldown", action = %action.name(), "cooldown bypassed");
            return Ok(GateOutcome::Allow);
        }

        let group = match spec.group() {
            Some(group) => group.clone(),
            None => self.config.fallback_group(action),
        };
        let sender = ctx.sender();
        let now = self.config.clock.now();

        // The check and the write happen under the repository lock, so a
        // concurrent cleanup cannot drop the profile in between.
        let mut decision = None;
        self.config.repository.update_profile(
            sender,
            self.config.profile_factory.as_ref(),
            &mut |profile: &SharedProfile| {
                let active = profile
                    .get_cooldown(&group)
                    .and_then(|instance| instance.remaining(now).map(|left| (instance, left)));
                decision = Some(match active {
                    Some(active) => Err(active),
                    None => {
                        let instance =
                            CooldownInstance::new(group.clone(), spec.duration().duration_for(ctx), now);
                        profile.set_cooldown(group.clone(), instance.clone());
                        Ok(instance)
                    }
                });
            },
        );

        let instance = match decision {
            Some(Ok(instance)) => instance,
            Some(Err((instance, remaining))) => {
                tracing::debug!(
                    target: "cmdgate.cooldown",
                    action = %action.name(),
                    group = %group,
                    remaining_ms = remaining.num_milliseconds(),
                    "cooldown active, dispatch denied"
                );
                for listener in &self.config.active_listeners {
                    listener
                        .cooldown_active(sender, action, &instance, remaining)
                        .map_err(GateError::listener("cooldown active"))?;
                }
                return Ok(GateOutcome::Deny(DenyReason::CooldownActive { remaining }));
            }
            None => return Ok(GateOutcome::Allow),
        };
        tracing::debug!(
            target: "cmdgate.cooldown",
            action = %action.name(),
            group = %instance.group(),
            duration_ms = instance.duration().num_milliseconds(),
            "cooldown started"
        );
        for listener in &self.config.creation_listeners {
            listener
                .cooldown_created(sender, action, &instance)
                .map_err(GateError::listener("cooldown created"))?;
        }
        Ok(GateOutcome::Allow)
    }
}

impl<C, R> Postprocessor<C, R> for CooldownManager<C>
where
    C: Clone + Send + Sync + 'static,
    R: 'static,
{
    fn name(&self) -> &str {
        "cooldown"
    }

    fn process(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<GateOutcome, GateError> {
        match &action.gates().cooldown {
            Some(spec) => self.evaluate(ctx, action.meta(), spec),
            None => Ok(GateOutcome::Allow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::{repository, CooldownGroup, DurationFunction};
    use crate::time::{Clock, ManualClock};
    use chrono::{DateTime, Duration, Utc};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    type Active = Arc<Mutex<Vec<(String, Duration)>>>;

    struct Fixture {
        clock: Arc<ManualClock>,
        manager: CooldownManager<&'static str>,
        active: Active,
        created: Arc<Mutex<Vec<CooldownInstance>>>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap()));
        let active: Active = Arc::default();
        let created: Arc<Mutex<Vec<CooldownInstance>>> = Arc::default();
        let (a, c) = (Arc::clone(&active), Arc::clone(&created));
        let config = CooldownConfiguration::<&'static str>::builder()
            .repository(repository::for_map())
            .clock(clock.clone())
            .on_active(move |_, meta: &ActionMeta, _, remaining| {
                a.lock().push((meta.name().to_string(), remaining));
                Ok(())
            })
            .on_created(move |_, _, instance: &CooldownInstance| {
                c.lock().push(instance.clone());
                Ok(())
            })
            .build()
            .unwrap();
        Fixture {
            clock,
            manager: CooldownManager::new(config),
            active,
            created,
        }
    }

    fn action(name: &str) -> Arc<Action<&'static str>> {
        Action::builder(name).handler(|_| Ok(())).build().unwrap()
    }

    fn hourly() -> CooldownSpec<&'static str> {
        CooldownSpec::new(DurationFunction::constant(Duration::hours(1)))
    }

    fn ctx() -> CommandContext<&'static str> {
        CommandContext::new("alice", "cmd")
    }

    #[test]
    fn second_dispatch_within_duration_is_denied() {
        let f = fixture();
        let cmd = action("cmd");

        assert_eq!(f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap(), GateOutcome::Allow);
        f.clock.advance(Duration::minutes(10));
        let outcome = f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Deny(DenyReason::CooldownActive {
                remaining: Duration::minutes(50)
            })
        );
        assert_eq!(f.active.lock().clone(), vec![("cmd".to_string(), Duration::minutes(50))]);
        assert_eq!(f.created.lock().len(), 1);
    }

    #[test]
    fn expired_cooldown_is_overwritten() {
        let f = fixture();
        let cmd = action("cmd");
        let start = f.clock.now();

        f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();
        f.clock.advance(Duration::hours(1) + Duration::seconds(1));
        let outcome = f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();

        assert!(outcome.is_allowed());
        assert!(f.active.lock().is_empty());
        let created = f.created.lock();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].created_at(), start);
        assert_eq!(created[1].created_at(), start + Duration::hours(1) + Duration::seconds(1));
    }

    #[test]
    fn boundary_instant_counts_as_expired() {
        let f = fixture();
        let cmd = action("cmd");

        f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();
        f.clock.advance(Duration::hours(1));

        assert!(f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap().is_allowed());
    }

    #[test]
    fn shared_named_group_denies_sibling() {
        let f = fixture();
        let spec = CooldownSpec::grouped(
            DurationFunction::constant(Duration::hours(1)),
            CooldownGroup::named("foo"),
        );
        let first = action("command1");
        let second = action("command2");

        assert!(f.manager.evaluate(&ctx(), first.meta(), &spec).unwrap().is_allowed());
        assert!(!f.manager.evaluate(&ctx(), second.meta(), &spec).unwrap().is_allowed());
        assert_eq!(f.active.lock()[0].0, "command2");
    }

    #[test]
    fn distinct_named_groups_are_independent() {
        let f = fixture();
        let d = DurationFunction::constant(Duration::hours(1));
        let foo = CooldownSpec::grouped(d.clone(), CooldownGroup::named("foo"));
        let bar = CooldownSpec::grouped(d, CooldownGroup::named("bar"));

        assert!(f.manager.evaluate(&ctx(), action("command1").meta(), &foo).unwrap().is_allowed());
        assert!(f.manager.evaluate(&ctx(), action("command2").meta(), &bar).unwrap().is_allowed());
        assert!(f.active.lock().is_empty());
    }

    #[test]
    fn default_group_is_scoped_to_action() {
        let f = fixture();

        assert!(f.manager.evaluate(&ctx(), action("a").meta(), &hourly()).unwrap().is_allowed());
        assert!(f.manager.evaluate(&ctx(), action("a").meta(), &hourly()).unwrap().is_allowed());
    }

    #[test]
    fn actors_do_not_share_cooldowns() {
        let f = fixture();
        let cmd = action("cmd");

        f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();
        let bob = CommandContext::new("bob", "cmd");
        assert!(f.manager.evaluate(&bob, cmd.meta(), &hourly()).unwrap().is_allowed());
    }

    #[test]
    fn duration_function_reads_context() {
        let f = fixture();
        let cmd = action("cmd");
        let spec = CooldownSpec::new(DurationFunction::new(|ctx: &CommandContext<&'static str>| {
            if *ctx.sender() == "alice" {
                Duration::seconds(5)
            } else {
                Duration::hours(1)
            }
        }));

        f.manager.evaluate(&ctx(), cmd.meta(), &spec).unwrap();
        assert_eq!(f.created.lock()[0].duration(), Duration::seconds(5));
    }

    #[test]
    fn bypass_skips_state() {
        let clock = Arc::new(ManualClock::default());
        let repo = repository::for_map();
        let manager = CooldownManager::new(
            CooldownConfiguration::<&'static str>::builder()
                .repository(Arc::clone(&repo))
                .clock(clock)
                .bypass(|ctx: &CommandContext<&'static str>| *ctx.sender() == "admin")
                .build()
                .unwrap(),
        );
        let cmd = action("cmd");
        let admin = CommandContext::new("admin", "cmd");

        assert!(manager.evaluate(&admin, cmd.meta(), &hourly()).unwrap().is_allowed());
        assert!(manager.evaluate(&admin, cmd.meta(), &hourly()).unwrap().is_allowed());
        assert!(repo.get_profile_if_exists(&"admin").is_none());
    }

    #[test]
    fn listener_error_propagates() {
        let manager = CooldownManager::new(
            CooldownConfiguration::<&'static str>::builder()
                .repository(repository::for_map())
                .clock(Arc::new(ManualClock::default()))
                .on_active(|_, _, _, _| {
                    anyhow::bail!("notifier offline")
                })
                .build()
                .unwrap(),
        );
        let cmd = action("cmd");

        manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();
        let err = manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap_err();
        assert!(matches!(err, GateError::Listener { hook: "cooldown active", .. }));
    }

    #[test]
    fn unbounded_duration_keeps_denying() {
        let f = fixture();
        let cmd = action("cmd");
        let forever = CooldownSpec::new(DurationFunction::constant(Duration::MAX));

        assert!(f.manager.evaluate(&ctx(), cmd.meta(), &forever).unwrap().is_allowed());
        assert_eq!(f.created.lock()[0].expires_at(), None);
        f.clock.advance(Duration::days(365));
        let outcome = f.manager.evaluate(&ctx(), cmd.meta(), &forever).unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Deny(DenyReason::CooldownActive {
                remaining: Duration::MAX - Duration::days(365)
            })
        );
    }

    #[test]
    fn restart_after_cleanup_is_stored() {
        let f = fixture();
        let cmd = action("cmd");
        let group = f.manager.configuration().fallback_group(cmd.meta());
        let repo = Arc::clone(f.manager.repository());

        f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap();
        f.clock.advance(Duration::hours(2));
        // An earlier reader still holds the profile the cleanup is about to drop.
        let stale = repo.get_profile(&"alice", f.manager.configuration().profile_factory().as_ref());
        repo.delete_cooldown(&"alice", &group);

        assert!(f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap().is_allowed());
        let stored = repo.get_profile_if_exists(&"alice").unwrap();
        assert!(!Arc::ptr_eq(&stored, &stale));
        assert!(stored.get_cooldown(&group).is_some());
        assert!(!f.manager.evaluate(&ctx(), cmd.meta(), &hourly()).unwrap().is_allowed());
    }

    #[test]
    fn build_requires_repository() {
        let err = CooldownConfiguration::<&str>::builder().build().err().unwrap();
        assert!(matches!(err, GateError::InvalidArgument("repository")));
    }
}
