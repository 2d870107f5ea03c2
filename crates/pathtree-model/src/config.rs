use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the writer does when payload keys disagree with the keys in the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMismatchPolicy {
    /// Log each mismatch and continue.
    #[default]
    Warn,
    /// Continue without logging; mismatches are still reported to the caller.
    Ignore,
    /// Refuse the write.
    Deny,
}

impl KeyMismatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMismatchPolicy::Warn => "warn",
            KeyMismatchPolicy::Ignore => "ignore",
            KeyMismatchPolicy::Deny => "deny",
        }
    }
}

impl fmt::Display for KeyMismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyMismatchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(KeyMismatchPolicy::Warn),
            "ignore" => Ok(KeyMismatchPolicy::Ignore),
            "deny" => Ok(KeyMismatchPolicy::Deny),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid key mismatch policy '{0}': expected warn, ignore or deny")]
    InvalidPolicy(String),
    #[error("invalid boolean '{value}' for {name}")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub key_mismatch: KeyMismatchPolicy,
    /// Create absent parent containers when grafting instead of failing.
    pub create_missing_containers: bool,
}

impl EngineConfig {
    pub const KEY_MISMATCH_ENV: &'static str = "PATHTREE_KEY_MISMATCH";
    pub const CREATE_CONTAINERS_ENV: &'static str = "PATHTREE_CREATE_CONTAINERS";

    /// Defaults overridden by `PATHTREE_KEY_MISMATCH` and `PATHTREE_CREATE_CONTAINERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = EngineConfig::default();
        if let Some(policy) = lookup(Self::KEY_MISMATCH_ENV) {
            config.key_mismatch = policy.parse()?;
        }
        if let Some(flag) = lookup(Self::CREATE_CONTAINERS_ENV) {
            config.create_missing_containers = parse_flag(Self::CREATE_CONTAINERS_ENV, &flag)?;
        }
        Ok(config)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_warn_without_creating() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.key_mismatch, KeyMismatchPolicy::Warn);
        assert!(!config.create_missing_containers);
    }

    #[test]
    fn env_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("PATHTREE_KEY_MISMATCH", "Deny"),
            ("PATHTREE_CREATE_CONTAINERS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.key_mismatch, KeyMismatchPolicy::Deny);
        assert!(config.create_missing_containers);
    }

    #[test]
    fn invalid_values_rejected() {
        assert_eq!(
            EngineConfig::from_lookup(lookup(&[("PATHTREE_KEY_MISMATCH", "explode")])),
            Err(ConfigError::InvalidPolicy("explode".into()))
        );
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[("PATHTREE_CREATE_CONTAINERS", "maybe")])),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: EngineConfig = serde_json::from_str(r#"{ "keyMismatch": "ignore" }"#).unwrap();
        assert_eq!(config.key_mismatch, KeyMismatchPolicy::Ignore);
        assert!(!config.create_missing_containers);
    }
}
