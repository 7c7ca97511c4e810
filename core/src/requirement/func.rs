use std::fmt;
use std::sync::Arc;

use super::Requirement;
use crate::action::CommandContext;

type Predicate<C> = Box<dyn Fn(&CommandContext<C>) -> bool + Send + Sync>;

struct Inner<C> {
    name: String,
    predicate: Predicate<C>,
    parents: Vec<FnRequirement<C>>,
}

/// Closure-backed requirement. Clones share identity; two separately built
/// nodes are never equal, even with the same name.
pub struct FnRequirement<C>(Arc<Inner<C>>);

impl<C> FnRequirement<C> {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&CommandContext<C>) -> bool + Send + Sync + 'static,
    {
        Self::with_parents(name, [], predicate)
    }

    pub fn with_parents<F>(
        name: impl Into<String>,
        parents: impl IntoIterator<Item = FnRequirement<C>>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&CommandContext<C>) -> bool + Send + Sync + 'static,
    {
        FnRequirement(Arc::new(Inner {
            name: name.into(),
            predicate: Box::new(predicate),
            parents: parents.into_iter().collect(),
        }))
    }
}

impl<C> Clone for FnRequirement<C> {
    fn clone(&self) -> Self {
        FnRequirement(Arc::clone(&self.0))
    }
}

impl<C> PartialEq for FnRequirement<C> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<C> Eq for FnRequirement<C> {}

impl<C> fmt::Debug for FnRequirement<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRequirement")
            .field("name", &self.0.name)
            .field("parents", &self.0.parents.len())
            .finish()
    }
}

impl<C: 'static> Requirement<C> for FnRequirement<C> {
    fn evaluate(&self, ctx: &CommandContext<C>) -> bool {
        (self.0.predicate)(ctx)
    }

    fn parents(&self) -> Vec<Self> {
        self.0.parents.clone()
    }

    fn name(&self) -> &str {
        &self.0.name
    }
}
