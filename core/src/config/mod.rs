//! Gate configuration.
//! - `types.rs` (data structures + defaults + validation)
//! - `load.rs`  (IO: load_from_path / load_default + env overrides)

pub mod load;
pub mod types;

pub use load::{apply_overrides, load_default, load_from_path, DEFAULT_CONFIG_FILE};
pub use types::*;
