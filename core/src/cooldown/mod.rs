//! Per-actor cooldowns: once an action runs, the same actor cannot run any
//! action of the same group until the duration elapses.

pub mod config;
pub mod duration;
pub mod group;
pub mod instance;
pub mod listener;
pub mod manager;
pub mod profile;
pub mod repository;
pub mod spec;

pub use config::{CooldownConfiguration, CooldownConfigurationBuilder};
pub use duration::DurationFunction;
pub use group::CooldownGroup;
pub use instance::CooldownInstance;
pub use listener::{CooldownActiveListener, CooldownCreationListener};
pub use manager::CooldownManager;
pub use profile::{
    CooldownProfile, CooldownProfileFactory, SharedProfile, StandardCooldownProfile,
    StandardCooldownProfileFactory,
};
pub use repository::{CacheCooldownRepository, CooldownRepository, MappingCooldownRepository};
pub use spec::CooldownSpec;
