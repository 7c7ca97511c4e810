use std::fmt;
use std::sync::Arc;

use crate::action::{ActionId, ActionMeta};

/// Partition key for cooldown state.
///
/// `Action` groups are scoped to exactly one action definition. `Named`
/// groups compare by name (case-sensitive), so any actions tagged with the
/// same name share one cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CooldownGroup {
    Action(ActionId),
    Named(Arc<str>),
}

impl CooldownGroup {
    pub fn action(meta: &ActionMeta) -> Self {
        CooldownGroup::Action(meta.id())
    }

    pub fn named(name: impl AsRef<str>) -> Self {
        CooldownGroup::Named(Arc::from(name.as_ref()))
    }
}

impl fmt::Display for CooldownGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CooldownGroup::Action(id) => write!(f, "action{id}"),
            CooldownGroup::Named(name) => write!(f, "{name}"),
        }
    }
}
