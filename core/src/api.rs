//! Stable re-exports for consumers (`plugins` and external crates).
//!
//! Prefer importing from `cmdgate_core::api` instead of reaching into internal modules.

pub use crate::action::{
    Action, ActionBuilder, ActionHandler, ActionId, ActionMeta, Actor, CommandContext, GateSettings,
};
pub use crate::config::{
    load_default, load_from_path, ConfirmationConfig, CooldownConfig, GateConfig, StoreConfig,
    StoreProvider,
};
pub use crate::confirmation::{
    ConfirmationConfiguration, ConfirmationManager, ConfirmationRecord, ConfirmationRequiredNotifier,
    ConfirmationStore, NoPendingNotifier,
};
pub use crate::cooldown::repository::{for_map, for_store, mapping};
pub use crate::cooldown::{
    CooldownActiveListener, CooldownConfiguration, CooldownCreationListener, CooldownGroup,
    CooldownInstance, CooldownManager, CooldownProfile, CooldownProfileFactory, CooldownRepository,
    CooldownSpec, DurationFunction, SharedProfile, StandardCooldownProfile,
    StandardCooldownProfileFactory,
};
pub use crate::error::{ConfigError, GateError};
pub use crate::gate::{DenyReason, GateOutcome, Postprocessor};
pub use crate::pipeline::{DispatchOutcome, GatePipeline};
pub use crate::requirement::{
    FnRequirement, IgnoreFailures, Requirement, RequirementFailureHandler, RequirementPostprocessor,
    RequirementSet,
};
pub use crate::store::{KeyedStore, MapStore, WeakStore};
pub use crate::time::{Clock, ManualClock, SystemClock};
