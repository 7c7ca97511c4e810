use std::sync::Arc;

use chrono::Duration;

use super::notifier::{ConfirmationRequiredNotifier, NoPendingNotifier};
use super::ConfirmationRecord;
use crate::action::CommandContext;
use crate::error::GateError;
use crate::store::KeyedStore;
use crate::time::{Clock, SystemClock};

pub type ConfirmationStore<C, R> = Arc<dyn KeyedStore<C, ConfirmationRecord<C, R>>>;
pub type BypassPredicate<C> = Arc<dyn Fn(&CommandContext<C>) -> bool + Send + Sync>;

pub struct ConfirmationConfiguration<C, R> {
    pub(crate) store: ConfirmationStore<C, R>,
    pub(crate) required_notifiers: Vec<Arc<dyn ConfirmationRequiredNotifier<C, R>>>,
    pub(crate) no_pending_notifiers: Vec<Arc<dyn NoPendingNotifier<C>>>,
    pub(crate) bypass: BypassPredicate<C>,
    pub(crate) expiry: Option<Duration>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl<C: 'static, R: 'static> ConfirmationConfiguration<C, R> {
    pub fn builder() -> ConfirmationConfigurationBuilder<C, R> {
        ConfirmationConfigurationBuilder {
            store: None,
            required_notifiers: Vec::new(),
            no_pending_notifiers: Vec::new(),
            bypass: None,
            expiry: None,
            clock: None,
        }
    }

    pub fn store(&self) -> &ConfirmationStore<C, R> {
        &self.store
    }

    /// Maximum age of a pending record. `None` means records never expire.
    pub fn expiry(&self) -> Option<Duration> {
        self.expiry
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn should_bypass(&self, ctx: &CommandContext<C>) -> bool {
        (self.bypass)(ctx)
    }
}

pub struct ConfirmationConfigurationBuilder<C, R> {
    store: Option<ConfirmationStore<C, R>>,
    required_notifiers: Vec<Arc<dyn ConfirmationRequiredNotifier<C, R>>>,
    no_pending_notifiers: Vec<Arc<dyn NoPendingNotifier<C>>>,
    bypass: Option<BypassPredicate<C>>,
    expiry: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
}

impl<C: 'static, R: 'static> ConfirmationConfigurationBuilder<C, R> {
    pub fn store(mut self, store: ConfirmationStore<C, R>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn required_notifier(mut self, notifier: Arc<dyn ConfirmationRequiredNotifier<C, R>>) -> Self {
        self.required_notifiers.push(notifier);
        self
    }

    pub fn on_confirmation_required<F>(self, f: F) -> Self
    where
        F: Fn(&C, &ConfirmationRecord<C, R>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.required_notifier(Arc::new(f))
    }

    pub fn no_pending_notifier(mut self, notifier: Arc<dyn NoPendingNotifier<C>>) -> Self {
        self.no_pending_notifiers.push(notifier);
        self
    }

    pub fn on_no_pending<F>(self, f: F) -> Self
    where
        F: Fn(&C) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.no_pending_notifier(Arc::new(f))
    }

    pub fn bypass<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandContext<C>) -> bool + Send + Sync + 'static,
    {
        self.bypass = Some(Arc::new(f));
        self
    }

    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<ConfirmationConfiguration<C, R>, GateError> {
        let store = self.store.ok_or(GateError::InvalidArgument("store"))?;
        Ok(ConfirmationConfiguration {
            store,
            required_notifiers: self.required_notifiers,
            no_pending_notifiers: self.no_pending_notifiers,
            bypass: self
                .bypass
                .unwrap_or_else(|| Arc::new(|_: &CommandContext<C>| false)),
            expiry: self.expiry,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
