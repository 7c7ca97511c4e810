use std::sync::Arc;

use chrono::Duration;

use super::listener::{CooldownActiveListener, CooldownCreationListener};
use super::profile::{CooldownProfileFactory, StandardCooldownProfileFactory};
use super::repository::CooldownRepository;
use super::{CooldownGroup, CooldownInstance};
use crate::action::{ActionMeta, CommandContext};
use crate::error::GateError;
use crate::time::{Clock, SystemClock};

pub type FallbackGroup = Arc<dyn Fn(&ActionMeta) -> CooldownGroup + Send + Sync>;
pub type BypassPredicate<C> = Arc<dyn Fn(&CommandContext<C>) -> bool + Send + Sync>;

pub struct CooldownConfiguration<C> {
    pub(crate) repository: Arc<dyn CooldownRepository<C>>,
    pub(crate) active_listeners: Vec<Arc<dyn CooldownActiveListener<C>>>,
    pub(crate) creation_listeners: Vec<Arc<dyn CooldownCreationListener<C>>>,
    pub(crate) bypass: BypassPredicate<C>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) profile_factory: Arc<dyn CooldownProfileFactory>,
    pub(crate) fallback_group: FallbackGroup,
}

impl<C: 'static> CooldownConfiguration<C> {
    pub fn builder() -> CooldownConfigurationBuilder<C> {
        CooldownConfigurationBuilder {
            repository: None,
            active_listeners: Vec::new(),
            creation_listeners: Vec::new(),
            bypass: None,
            clock: None,
            profile_factory: None,
            fallback_group: None,
        }
    }

    pub fn repository(&self) -> &Arc<dyn CooldownRepository<C>> {
        &self.repository
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn profile_factory(&self) -> &Arc<dyn CooldownProfileFactory> {
        &self.profile_factory
    }

    pub fn fallback_group(&self, action: &ActionMeta) -> CooldownGroup {
        (self.fallback_group)(action)
    }

    pub fn should_bypass(&self, ctx: &CommandContext<C>) -> bool {
        (self.bypass)(ctx)
    }
}

pub struct CooldownConfigurationBuilder<C> {
    repository: Option<Arc<dyn CooldownRepository<C>>>,
    active_listeners: Vec<Arc<dyn CooldownActiveListener<C>>>,
    creation_listeners: Vec<Arc<dyn CooldownCreationListener<C>>>,
    bypass: Option<BypassPredicate<C>>,
    clock: Option<Arc<dyn Clock>>,
    profile_factory: Option<Arc<dyn CooldownProfileFactory>>,
    fallback_group: Option<FallbackGroup>,
}

impl<C: 'static> CooldownConfigurationBuilder<C> {
    pub fn repository(mut self, repository: Arc<dyn CooldownRepository<C>>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn active_listener(mut self, listener: Arc<dyn CooldownActiveListener<C>>) -> Self {
        self.active_listeners.push(listener);
        self
    }

    pub fn on_active<F>(self, f: F) -> Self
    where
        F: Fn(&C, &ActionMeta, &CooldownInstance, Duration) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.active_listener(Arc::new(f))
    }

    pub fn creation_listener(mut self, listener: Arc<dyn CooldownCreationListener<C>>) -> Self {
        self.creation_listeners.push(listener);
        self
    }

    pub fn on_created<F>(self, f: F) -> Self
    where
        F: Fn(&C, &ActionMeta, &CooldownInstance) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.creation_listener(Arc::new(f))
    }

    pub fn bypass<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandContext<C>) -> bool + Send + Sync + 'static,
    {
        self.bypass = Some(Arc::new(f));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn profile_factory(mut self, factory: Arc<dyn CooldownProfileFactory>) -> Self {
        self.profile_factory = Some(factory);
        self
    }

    pub fn fallback_group<F>(mut self, f: F) -> Self
    where
        F: Fn(&ActionMeta) -> CooldownGroup + Send + Sync + 'static,
    {
        self.fallback_group = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<CooldownConfiguration<C>, GateError> {
        let repository = self
            .repository
            .ok_or(GateError::InvalidArgument("repository"))?;
        Ok(CooldownConfiguration {
            repository,
            active_listeners: self.active_listeners,
            creation_listeners: self.creation_listeners,
            bypass: self
                .bypass
                .unwrap_or_else(|| Arc::new(|_: &CommandContext<C>| false)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            profile_factory: self
                .profile_factory
                .unwrap_or_else(|| Arc::new(StandardCooldownProfileFactory)),
            fallback_group: self
                .fallback_group
                .unwrap_or_else(|| Arc::new(CooldownGroup::action)),
        })
    }
}
