//! Confirmation gate: a flagged action only runs once its sender dispatches
//! the designated confirm action.

pub mod config;
pub mod manager;
pub mod notifier;
pub mod record;

pub use config::{ConfirmationConfiguration, ConfirmationConfigurationBuilder, ConfirmationStore};
pub use manager::ConfirmationManager;
pub use notifier::{ConfirmationRequiredNotifier, NoPendingNotifier};
pub use record::ConfirmationRecord;
