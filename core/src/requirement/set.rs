use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::Requirement;
use crate::action::CommandContext;

/// Immutable, ordered, duplicate-free requirements where every node comes
/// after all of its transitive parents.
pub struct RequirementSet<C, R> {
    nodes: Arc<[R]>,
    _ctx: PhantomData<fn(&C)>,
}

impl<C, R: Requirement<C>> RequirementSet<C, R> {
    /// Flattens `requirements` depth-first, parents before children.
    ///
    /// A node reached more than once keeps the position of its first
    /// encounter. A parent edge leading back to a node still being expanded
    /// is skipped, so cyclic declarations terminate.
    pub fn of(requirements: impl IntoIterator<Item = R>) -> Self {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for node in requirements {
            expand::<C, R>(&node, &mut path, &mut out);
        }
        Self {
            nodes: out.into(),
            _ctx: PhantomData,
        }
    }

    /// Copy of this set with `requirement` and its parents appended.
    pub fn with(&self, requirement: R) -> Self {
        Self::of(self.nodes.iter().cloned().chain(std::iter::once(requirement)))
    }

    /// Runs every predicate in order and returns the ones that failed.
    pub fn evaluate_all(&self, ctx: &CommandContext<C>) -> Vec<&R> {
        self.nodes.iter().filter(|node| !node.evaluate(ctx)).collect()
    }
}

impl<C, R> RequirementSet<C, R> {
    pub fn empty() -> Self {
        Self {
            nodes: Arc::from(Vec::new()),
            _ctx: PhantomData,
        }
    }

    pub fn requirements(&self) -> &[R] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn expand<C, R: Requirement<C>>(node: &R, path: &mut Vec<R>, out: &mut Vec<R>) {
    if out.contains(node) {
        return;
    }
    if path.contains(node) {
        tracing::debug!(
            target: "cmdgate.requirements",
            requirement = %node.name(),
            "requirement cycle, skipping back edge"
        );
        return;
    }
    path.push(node.clone());
    for parent in node.parents() {
        expand::<C, R>(&parent, path, out);
    }
    path.pop();
    out.push(node.clone());
}

impl<C, R> Clone for RequirementSet<C, R> {
    fn clone(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            _ctx: PhantomData,
        }
    }
}

impl<C, R: fmt::Debug> fmt::Debug for RequirementSet<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl<'a, C, R> IntoIterator for &'a RequirementSet<C, R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
