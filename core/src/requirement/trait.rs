// core/src/requirement/trait.rs
use crate::action::CommandContext;

/// A named predicate over a dispatch, with declared prerequisites.
///
/// Equality is node identity: two values compare equal when they denote the
/// same requirement. Enums get this for free with `derive(PartialEq)`;
/// closure-backed nodes compare by reference (see [`super::FnRequirement`]).
pub trait Requirement<C>: Clone + PartialEq + Send + Sync + 'static {
    fn evaluate(&self, ctx: &CommandContext<C>) -> bool;

    /// Requirements that must be checked before this one.
    fn parents(&self) -> Vec<Self> {
        Vec::new()
    }

    fn name(&self) -> &str;
}

/// Told about every requirement that failed for a dispatch.
pub trait RequirementFailureHandler<C, R>: Send + Sync {
    fn requirement_failed(&self, ctx: &CommandContext<C>, requirement: &R) -> anyhow::Result<()>;
}

impl<C, R, F> RequirementFailureHandler<C, R> for F
where
    F: Fn(&CommandContext<C>, &R) -> anyhow::Result<()> + Send + Sync,
{
    fn requirement_failed(&self, ctx: &CommandContext<C>, requirement: &R) -> anyhow::Result<()> {
        self(ctx, requirement)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFailures;

impl<C, R> RequirementFailureHandler<C, R> for IgnoreFailures {
    fn requirement_failed(&self, _ctx: &CommandContext<C>, _requirement: &R) -> anyhow::Result<()> {
        Ok(())
    }
}
