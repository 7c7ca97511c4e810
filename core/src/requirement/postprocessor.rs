use std::sync::Arc;

use super::{IgnoreFailures, Requirement, RequirementFailureHandler, RequirementSet};
use crate::action::{Action, CommandContext};
use crate::error::GateError;
use crate::gate::{DenyReason, GateOutcome, Postprocessor};

/// Requirement gate. Every node is evaluated and every failure reported,
/// so the actor learns about all unmet requirements at once.
pub struct RequirementPostprocessor<C, R> {
    failure_handler: Arc<dyn RequirementFailureHandler<C, R>>,
}

impl<C, R> Default for RequirementPostprocessor<C, R> {
    fn default() -> Self {
        Self {
            failure_handler: Arc::new(IgnoreFailures),
        }
    }
}

impl<C, R: Requirement<C>> RequirementPostprocessor<C, R> {
    pub fn new(failure_handler: Arc<dyn RequirementFailureHandler<C, R>>) -> Self {
        Self { failure_handler }
    }

    pub fn on_failure<F>(f: F) -> Self
    where
        F: Fn(&CommandContext<C>, &R) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(Arc::new(f))
    }

    pub fn evaluate(
        &self,
        ctx: &CommandContext<C>,
        requirements: &RequirementSet<C, R>,
    ) -> Result<GateOutcome, GateError> {
        let failed = requirements.evaluate_all(ctx);
        if failed.is_empty() {
            return Ok(GateOutcome::Allow);
        }

        let names: Vec<String> = failed.iter().map(|r| r.name().to_string()).collect();
        tracing::debug!(
            target: "cmdgate.requirements",
            failed = ?names,
            "requirements unmet, dispatch denied"
        );
        for requirement in failed {
            self.failure_handler
                .requirement_failed(ctx, requirement)
                .map_err(GateError::listener("requirement failed"))?;
        }
        Ok(GateOutcome::Deny(DenyReason::RequirementsUnmet { failed: names }))
    }
}

impl<C, R> Postprocessor<C, R> for RequirementPostprocessor<C, R>
where
    C: 'static,
    R: Requirement<C>,
{
    fn name(&self) -> &str {
        "requirements"
    }

    fn process(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<GateOutcome, GateError> {
        match &action.gates().requirements {
            Some(set) => self.evaluate(ctx, set),
            None => Ok(GateOutcome::Allow),
        }
    }
}
