use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::MAX_CONFIG_DURATION_DAYS;

fn check_duration(field: &str, value: Option<Duration>) -> Result<(), ConfigError> {
    match value {
        Some(d) if d <= Duration::zero() => Err(ConfigError::Validation(format!(
            "{field} must be positive"
        ))),
        Some(d) if d > Duration::days(MAX_CONFIG_DURATION_DAYS) => Err(ConfigError::Validation(
            format!("{field} must not exceed {MAX_CONFIG_DURATION_DAYS}d"),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub confirmation: ConfirmationConfig,

    #[serde(default)]
    pub cooldown: CooldownConfig,
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("confirmation.expiry", self.confirmation.expiry)?;
        self.confirmation.store.validate("confirmation.store")?;
        self.cooldown.store.validate("cooldown.store")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Maximum age of a pending confirmation. Absent means no expiry.
    #[serde(default, with = "duration_opt", skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Duration>,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Schedule deletion of every cooldown once it expires.
    #[serde(default)]
    pub scheduled_cleanup: bool,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    #[default]
    Map,
    Lru,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub provider: StoreProvider,

    /// Maximum live entries. Absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,

    /// Expire-after-write. Absent means entries never time out.
    #[serde(default, with = "duration_opt", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
}

impl StoreConfig {
    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.capacity == Some(0) {
            return Err(ConfigError::Validation(format!(
                "{section}.capacity must be greater than zero"
            )));
        }
        check_duration(&format!("{section}.ttl"), self.ttl)?;
        if self.provider == StoreProvider::Map && (self.capacity.is_some() || self.ttl.is_some()) {
            tracing::warn!(
                target: "cmdgate.config",
                section,
                "capacity and ttl are ignored by the map store"
            );
        }
        Ok(())
    }
}

/// Durations as `"30s"`-style strings.
mod duration_opt {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::time::{format_duration, parse_duration};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&format_duration(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse_duration(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: GateConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, GateConfig::default());
        assert_eq!(cfg.confirmation.store.provider, StoreProvider::Map);
        assert!(!cfg.cooldown.scheduled_cleanup);
    }

    #[test]
    fn parses_full_document() {
        let cfg: GateConfig = toml::from_str(
            r#"
            [confirmation]
            expiry = "30s"

            [confirmation.store]
            provider = "lru"
            capacity = 1024
            ttl = "5m"

            [cooldown]
            scheduled_cleanup = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.confirmation.expiry, Some(Duration::seconds(30)));
        assert_eq!(
            cfg.confirmation.store,
            StoreConfig {
                provider: StoreProvider::Lru,
                capacity: Some(1024),
                ttl: Some(Duration::minutes(5)),
            }
        );
        assert!(cfg.cooldown.scheduled_cleanup);
        assert_eq!(cfg.cooldown.store, StoreConfig::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_bad_duration() {
        let err = toml::from_str::<GateConfig>("[confirmation]\nexpiry = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(toml::from_str::<GateConfig>("[cooldown.store]\nprovider = \"redis\"").is_err());
    }

    #[test]
    fn validate_rejects_zero_capacity_and_ttl() {
        let mut cfg = GateConfig::default();
        cfg.cooldown.store.capacity = Some(0);
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(msg)) if msg.contains("cooldown.store.capacity")));

        let mut cfg = GateConfig::default();
        cfg.confirmation.store.ttl = Some(Duration::zero());
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));

        let mut cfg = GateConfig::default();
        cfg.confirmation.expiry = Some(Duration::zero());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_durations_beyond_calendar() {
        let cfg: GateConfig =
            toml::from_str("[cooldown.store]\nprovider = \"lru\"\nttl = \"100000000d\"").unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(msg)) if msg.contains("cooldown.store.ttl")));

        let cfg: GateConfig = toml::from_str("[confirmation]\nexpiry = \"36501d\"").unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(msg)) if msg.contains("confirmation.expiry")));

        let cfg: GateConfig = toml::from_str("[confirmation]\nexpiry = \"36500d\"").unwrap();
        cfg.validate().unwrap();
    }

    #[test]
    fn serializes_durations_as_strings() {
        let mut cfg = GateConfig::default();
        cfg.confirmation.expiry = Some(Duration::seconds(90));
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("expiry = \"90s\""));
        assert_eq!(toml::from_str::<GateConfig>(&text).unwrap(), cfg);
    }
}
