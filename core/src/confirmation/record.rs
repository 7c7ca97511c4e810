use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::action::Action;

/// A dispatch held back until its sender confirms it.
pub struct ConfirmationRecord<C, R> {
    created_at: DateTime<Utc>,
    action: Arc<Action<C, R>>,
}

impl<C, R> ConfirmationRecord<C, R> {
    pub fn new(created_at: DateTime<Utc>, action: Arc<Action<C, R>>) -> Self {
        Self { created_at, action }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn action(&self) -> &Arc<Action<C, R>> {
        &self.action
    }
}

impl<C, R> Clone for ConfirmationRecord<C, R> {
    fn clone(&self) -> Self {
        Self {
            created_at: self.created_at,
            action: Arc::clone(&self.action),
        }
    }
}

impl<C, R> fmt::Debug for ConfirmationRecord<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationRecord")
            .field("created_at", &self.created_at)
            .field("action", &self.action.name())
            .finish()
    }
}
