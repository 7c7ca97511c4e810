// core/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid argument: {0} is required")]
    InvalidArgument(&'static str),

    #[error("{hook} listener failed")]
    Listener {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("action handler failed: {action}")]
    Handler {
        action: String,
        #[source]
        source: anyhow::Error,
    },
}

impl GateError {
    pub(crate) fn listener(hook: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| GateError::Listener { hook, source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("config read error")]
    Read(#[source] std::io::Error),

    #[error("config parse error")]
    Parse(#[source] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("env var invalid: {key}")]
    EnvInvalid {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}
