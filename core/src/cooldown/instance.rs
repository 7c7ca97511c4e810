use chrono::{DateTime, Duration, Utc};

use super::CooldownGroup;
use crate::time;

/// One started cooldown. Immutable; a restart replaces it with a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownInstance {
    group: CooldownGroup,
    duration: Duration,
    created_at: DateTime<Utc>,
}

impl CooldownInstance {
    pub fn new(group: CooldownGroup, duration: Duration, created_at: DateTime<Utc>) -> Self {
        Self {
            group,
            duration,
            created_at,
        }
    }

    pub fn group(&self) -> &CooldownGroup {
        &self.group
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `None` when the cooldown outlasts the representable calendar.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        time::expires_at(self.created_at, self.duration)
    }

    /// Time left while `now < created_at + duration`, `None` afterwards.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        time::remaining(self.created_at, self.duration, now)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_some()
    }
}
