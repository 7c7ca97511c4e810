use std::sync::Arc;

use chrono::Duration;

use crate::action::{Action, CommandContext};
use crate::error::GateError;

/// Why a gate stopped a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    ConfirmationRequired,
    CooldownActive { remaining: Duration },
    RequirementsUnmet { failed: Vec<String> },
}

/// Result of consulting a gate. A denial is a normal outcome, not an error:
/// the host stops the dispatch when it sees `Deny`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Allow,
    Deny(DenyReason),
}

impl GateOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allow)
    }

    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            GateOutcome::Allow => None,
            GateOutcome::Deny(reason) => Some(reason),
        }
    }
}

/// A gate invoked once per dispatch, after parsing and before the action
/// body runs.
pub trait Postprocessor<C, R>: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        ctx: &CommandContext<C>,
        action: &Arc<Action<C, R>>,
    ) -> Result<GateOutcome, GateError>;
}
