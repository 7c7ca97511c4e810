//! Per-actor gates for command dispatch: confirmation, cooldown and
//! requirements, over pluggable keyed stores.

pub mod action;
pub mod api;
pub mod config;
pub mod confirmation;
pub mod cooldown;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod requirement;
pub mod store;
pub mod time;
