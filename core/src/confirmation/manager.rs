use std::sync::Arc;

use super::config::ConfirmationConfiguration;
use super::ConfirmationRecord;
use crate::action::{Action, ActionHandler, CommandContext};
use crate::error::GateError;
use crate::gate::{DenyReason, GateOutcome, Postprocessor};
use crate::requirement::FnRequirement;
use crate::time;

/// Holds at most one pending record per sender.
///
/// A dispatch of a flagged action is denied and remembered. The sender's
/// next confirm attempt pops the record and, unless it has expired, runs
/// the remembered action with the confirming context.
pub struct ConfirmationManager<C, R = FnRequirement<C>> {
    config: ConfirmationConfiguration<C, R>,
}

impl<C, R> ConfirmationManager<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    pub fn new(config: ConfirmationConfiguration<C, R>) -> Self {
        Self { config }
    }

    pub fn configuration(&self) -> &ConfirmationConfiguration<C, R> {
        &self.config
    }

    /// Stores `record` as the sender's pending confirmation, replacing any
    /// earlier one.
    pub fn request_confirmation(&self, sender: C, record: ConfirmationRecord<C, R>) {
        self.config.store.put(sender, record);
    }

    /// Consumes the sender's pending record. An expired record is removed
    /// all the same and reported as absent.
    pub fn resolve_pending(&self, sender: &C) -> Option<ConfirmationRecord<C, R>> {
        let record = self.config.store.pop_if_present(sender)?;
        if let Some(max_age) = self.config.expiry {
            let now = self.config.clock.now();
            if time::is_older_than(record.created_at(), now, max_age) {
                tracing::debug!(
                    target: "cmdgate.confirmation",
                    action = %record.action().name(),
                    max_age = %time::format_duration(max_age),
                    "pending confirmation expired"
                );
                return None;
            }
        }
        Some(record)
    }

    pub fn evaluate(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<GateOutcome, GateError> {
        if !action.gates().confirmation_required {
            return Ok(GateOutcome::Allow);
        }
        if self.config.should_bypass(ctx) {
            tracing::trace!(target: "cmdgate.confirmation", action = %action.name(), "confirmation bypassed");
            return Ok(GateOutcome::Allow);
        }

        let record = ConfirmationRecord::new(self.config.clock.now(), Arc::clone(action));
        self.request_confirmation(ctx.sender().clone(), record.clone());
        tracing::debug!(
            target: "cmdgate.confirmation",
            action = %action.name(),
            "confirmation required, dispatch denied"
        );
        for notifier in &self.config.required_notifiers {
            notifier
                .confirmation_required(ctx.sender(), &record)
                .map_err(GateError::listener("confirmation required"))?;
        }
        Ok(GateOutcome::Deny(DenyReason::ConfirmationRequired))
    }

    /// Body of the designated confirm action: resolves the sender's pending
    /// record and runs it, or fires the no-pending notifiers.
    pub fn confirm(&self, ctx: &CommandContext<C>) -> Result<(), GateError> {
        match self.resolve_pending(ctx.sender()) {
            Some(record) => {
                tracing::debug!(
                    target: "cmdgate.confirmation",
                    action = %record.action().name(),
                    "running confirmed action"
                );
                record.action().run(ctx)
            }
            None => {
                for notifier in &self.config.no_pending_notifiers {
                    notifier
                        .no_pending(ctx.sender())
                        .map_err(GateError::listener("no pending confirmation"))?;
                }
                Ok(())
            }
        }
    }

    pub fn execution_handler(self: &Arc<Self>) -> ActionHandler<C> {
        let manager = Arc::clone(self);
        Arc::new(move |ctx: &CommandContext<C>| manager.confirm(ctx).map_err(anyhow::Error::from))
    }

    /// Builds a plain action named `name` whose body is [`Self::confirm`].
    pub fn confirm_action(self: &Arc<Self>, name: impl Into<String>) -> Result<Arc<Action<C, R>>, GateError> {
        Action::builder(name)
            .shared_handler(self.execution_handler())
            .build()
    }
}

impl<C, R> Postprocessor<C, R> for ConfirmationManager<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "confirmation"
    }

    fn process(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<GateOutcome, GateError> {
        self.evaluate(ctx, action)
    }
}
