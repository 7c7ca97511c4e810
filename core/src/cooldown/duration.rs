use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use crate::action::CommandContext;

/// Computes how long a cooldown lasts for one dispatch.
pub struct DurationFunction<C>(Arc<dyn Fn(&CommandContext<C>) -> Duration + Send + Sync>);

impl<C> DurationFunction<C> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CommandContext<C>) -> Duration + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn constant(duration: Duration) -> Self {
        Self::new(move |_: &CommandContext<C>| duration)
    }

    pub fn duration_for(&self, ctx: &CommandContext<C>) -> Duration {
        (self.0)(ctx)
    }
}

impl<C> Clone for DurationFunction<C> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<C> fmt::Debug for DurationFunction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DurationFunction(..)")
    }
}
