use super::{CooldownGroup, DurationFunction};

/// Cooldown settings attached to one action.
#[derive(Debug)]
pub struct CooldownSpec<C> {
    duration: DurationFunction<C>,
    group: Option<CooldownGroup>,
}

impl<C> CooldownSpec<C> {
    /// Cooldown in the configuration's fallback group.
    pub fn new(duration: DurationFunction<C>) -> Self {
        Self {
            duration,
            group: None,
        }
    }

    pub fn grouped(duration: DurationFunction<C>, group: CooldownGroup) -> Self {
        Self {
            duration,
            group: Some(group),
        }
    }

    pub fn duration(&self) -> &DurationFunction<C> {
        &self.duration
    }

    pub fn group(&self) -> Option<&CooldownGroup> {
        self.group.as_ref()
    }
}

impl<C> Clone for CooldownSpec<C> {
    fn clone(&self) -> Self {
        Self {
            duration: self.duration.clone(),
            group: self.group.clone(),
        }
    }
}
