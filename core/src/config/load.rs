use std::path::Path;

use super::types::GateConfig;
use crate::error::ConfigError;
use crate::time::parse_duration;

pub const DEFAULT_CONFIG_FILE: &str = "cmdgate.toml";

pub fn load_from_path(path: impl AsRef<Path>) -> Result<GateConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let s = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    let mut cfg: GateConfig = toml::from_str(&s).map_err(ConfigError::Parse)?;
    apply_overrides(&mut cfg, env_var)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Reads `cmdgate.toml` from the working directory when present, falling
/// back to defaults, then applies `CMDGATE_*` overrides.
pub fn load_default() -> Result<GateConfig, ConfigError> {
    if Path::new(DEFAULT_CONFIG_FILE).exists() {
        return load_from_path(DEFAULT_CONFIG_FILE);
    }
    let mut cfg = GateConfig::default();
    apply_overrides(&mut cfg, env_var)?;
    cfg.validate()?;
    Ok(cfg)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Applies overrides looked up by `lookup`. Blank values are ignored.
pub fn apply_overrides<F>(cfg: &mut GateConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CMDGATE_CONFIRMATION_EXPIRY") {
        let expiry = parse_duration(&v)
            .map_err(|msg| invalid("CMDGATE_CONFIRMATION_EXPIRY", anyhow::anyhow!(msg)))?;
        cfg.confirmation.expiry = Some(expiry);
    }
    if let Some(v) = get("CMDGATE_CONFIRMATION_CAPACITY") {
        let capacity = v
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid("CMDGATE_CONFIRMATION_CAPACITY", e.into()))?;
        cfg.confirmation.store.capacity = Some(capacity);
    }
    if let Some(v) = get("CMDGATE_COOLDOWN_CAPACITY") {
        let capacity = v
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid("CMDGATE_COOLDOWN_CAPACITY", e.into()))?;
        cfg.cooldown.store.capacity = Some(capacity);
    }
    if let Some(v) = get("CMDGATE_COOLDOWN_CLEANUP") {
        cfg.cooldown.scheduled_cleanup = match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(invalid(
                    "CMDGATE_COOLDOWN_CLEANUP",
                    anyhow::anyhow!("expected a boolean, got '{other}'"),
                ))
            }
        };
    }
    Ok(())
}

fn invalid(key: &str, source: anyhow::Error) -> ConfigError {
    ConfigError::EnvInvalid {
        key: key.to_string(),
        source,
    }
}
