//! Minimal dispatch loop that consults gates before running an action.

use std::sync::Arc;

use crate::action::{Action, CommandContext};
use crate::error::GateError;
use crate::gate::{DenyReason, GateOutcome, Postprocessor};
use crate::requirement::FnRequirement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed,
    Denied(DenyReason),
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed)
    }
}

/// Ordered gates run before every action body.
///
/// Gates run in registration order and the first denial stops the
/// dispatch, so a later gate never sees (or mutates state for) a dispatch
/// an earlier one rejected. Registering the requirement gate first and the
/// cooldown gate last keeps cooldowns from starting on denied dispatches.
pub struct GatePipeline<C, R = FnRequirement<C>> {
    gates: Vec<Arc<dyn Postprocessor<C, R>>>,
}

impl<C, R> Default for GatePipeline<C, R> {
    fn default() -> Self {
        Self { gates: Vec::new() }
    }
}

impl<C, R> GatePipeline<C, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, gate: Arc<dyn Postprocessor<C, R>>) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn with(mut self, gate: Arc<dyn Postprocessor<C, R>>) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn gate_names(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    pub fn dispatch(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<DispatchOutcome, GateError> {
        for gate in &self.gates {
            if let GateOutcome::Deny(reason) = gate.process(ctx, action)? {
                tracing::debug!(
                    target: "cmdgate.pipeline",
                    action = %action.name(),
                    gate = gate.name(),
                    reason = ?reason,
                    "dispatch denied"
                );
                return Ok(DispatchOutcome::Denied(reason));
            }
        }
        tracing::trace!(target: "cmdgate.pipeline", action = %action.name(), "dispatch executing");
        action.run(ctx)?;
        Ok(DispatchOutcome::Executed)
    }
}
