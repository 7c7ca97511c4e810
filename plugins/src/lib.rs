//! Integrations behind the `cmdgate-core` traits, built from `GateConfig`.

pub mod cleanup;
pub mod factory;
pub mod store;
