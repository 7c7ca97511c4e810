//! Action definitions and the gate settings attached to them.
//!
//! An [`Action`] is registered once with its [`GateSettings`]; every gate
//! reads its own slice of those settings back at dispatch time.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cooldown::CooldownSpec;
use crate::error::GateError;
use crate::requirement::{FnRequirement, Requirement, RequirementSet};

/// Identity all per-actor state is keyed by. Anything cheap to clone and
/// comparable qualifies.
pub trait Actor: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> Actor for T where T: Clone + Eq + Hash + Send + Sync + 'static {}

/// Process-unique id handed out when an action definition is built. Two
/// actions are the same action iff their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ActionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionMeta {
    id: ActionId,
    name: String,
}

impl ActionMeta {
    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What the host knows about one dispatch. Gates only read the sender.
#[derive(Debug, Clone)]
pub struct CommandContext<C> {
    sender: C,
    input: String,
    args: BTreeMap<String, String>,
}

impl<C> CommandContext<C> {
    pub fn new(sender: C, input: impl Into<String>) -> Self {
        Self {
            sender,
            input: input.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn sender(&self) -> &C {
        &self.sender
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

pub type ActionHandler<C> = Arc<dyn Fn(&CommandContext<C>) -> anyhow::Result<()> + Send + Sync>;

pub struct GateSettings<C, R> {
    pub confirmation_required: bool,
    pub cooldown: Option<CooldownSpec<C>>,
    pub requirements: Option<RequirementSet<C, R>>,
}

impl<C, R> Default for GateSettings<C, R> {
    fn default() -> Self {
        Self {
            confirmation_required: false,
            cooldown: None,
            requirements: None,
        }
    }
}

impl<C, R: Clone> Clone for GateSettings<C, R> {
    fn clone(&self) -> Self {
        Self {
            confirmation_required: self.confirmation_required,
            cooldown: self.cooldown.clone(),
            requirements: self.requirements.clone(),
        }
    }
}

impl<C, R: Requirement<C>> GateSettings<C, R> {
    /// Adds one requirement, expanding its parents into the existing set.
    pub fn with_requirement(mut self, requirement: R) -> Self {
        let set = match self.requirements.take() {
            Some(set) => set.with(requirement),
            None => RequirementSet::of([requirement]),
        };
        self.requirements = Some(set);
        self
    }
}

pub struct Action<C, R = FnRequirement<C>> {
    meta: ActionMeta,
    handler: ActionHandler<C>,
    gates: GateSettings<C, R>,
}

impl<C, R> Action<C, R> {
    pub fn builder(name: impl Into<String>) -> ActionBuilder<C, R> {
        ActionBuilder {
            name: name.into(),
            handler: None,
            gates: GateSettings::default(),
        }
    }

    pub fn meta(&self) -> &ActionMeta {
        &self.meta
    }

    pub fn id(&self) -> ActionId {
        self.meta.id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn gates(&self) -> &GateSettings<C, R> {
        &self.gates
    }

    pub fn handler(&self) -> &ActionHandler<C> {
        &self.handler
    }

    /// Runs the action body.
    pub fn run(&self, ctx: &CommandContext<C>) -> Result<(), GateError> {
        (self.handler)(ctx).map_err(|source| GateError::Handler {
            action: self.meta.name.clone(),
            source,
        })
    }
}

impl<C, R> fmt::Debug for Action<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.meta.id)
            .field("name", &self.meta.name)
            .field("confirmation_required", &self.gates.confirmation_required)
            .field("cooldown", &self.gates.cooldown.is_some())
            .field(
                "requirements",
                &self.gates.requirements.as_ref().map_or(0, |r| r.len()),
            )
            .finish()
    }
}

pub struct ActionBuilder<C, R> {
    name: String,
    handler: Option<ActionHandler<C>>,
    gates: GateSettings<C, R>,
}

impl<C, R> ActionBuilder<C, R> {
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandContext<C>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn shared_handler(mut self, handler: ActionHandler<C>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn require_confirmation(mut self) -> Self {
        self.gates.confirmation_required = true;
        self
    }

    pub fn cooldown(mut self, spec: CooldownSpec<C>) -> Self {
        self.gates.cooldown = Some(spec);
        self
    }

    pub fn requirements(mut self, set: RequirementSet<C, R>) -> Self {
        self.gates.requirements = Some(set);
        self
    }

    pub fn build(self) -> Result<Arc<Action<C, R>>, GateError> {
        let handler = self.handler.ok_or(GateError::InvalidArgument("handler"))?;
        Ok(Arc::new(Action {
            meta: ActionMeta {
                id: ActionId::next(),
                name: self.name,
            },
            handler,
            gates: self.gates,
        }))
    }
}

impl<C, R: Requirement<C>> ActionBuilder<C, R> {
    pub fn requirement(mut self, requirement: R) -> Self {
        self.gates = self.gates.with_requirement(requirement);
        self
    }
}
