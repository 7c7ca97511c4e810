//! Requirement gate: dependency-ordered, deduplicated predicate sets.

pub mod func;
pub mod postprocessor;
pub mod set;
pub mod r#trait;

pub use func::FnRequirement;
pub use postprocessor::RequirementPostprocessor;
pub use r#trait::{IgnoreFailures, Requirement, RequirementFailureHandler};
pub use set::RequirementSet;
