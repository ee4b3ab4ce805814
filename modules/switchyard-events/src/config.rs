use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, Result};

pub const NAMESPACE_SEPARATOR_VAR: &str = "SWITCHYARD_NAMESPACE_SEPARATOR";
pub const COLLISION_POLICY_VAR: &str = "SWITCHYARD_COLLISION_POLICY";

/// What to do when two keys in one batch produce the same accessor name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail the whole batch.
    #[default]
    Reject,
    /// Keep the later entry and log a warning.
    LastWriteWins,
}

impl FromStr for CollisionPolicy {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(CollisionPolicy::Reject),
            "last_write_wins" | "last-write-wins" => Ok(CollisionPolicy::LastWriteWins),
            other => Err(EventError::InvalidConfig(format!(
                "unknown collision policy '{other}'"
            ))),
        }
    }
}

/// Settings for batch constructor creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorConfig {
    /// Joins namespace keys into the kind of a nested constructor.
    pub namespace_separator: String,
    pub collision_policy: CollisionPolicy,
}

impl Default for ConstructorConfig {
    fn default() -> Self {
        Self {
            namespace_separator: "/".to_string(),
            collision_policy: CollisionPolicy::Reject,
        }
    }
}

impl ConstructorConfig {
    /// Defaults overridden by `SWITCHYARD_NAMESPACE_SEPARATOR` and
    /// `SWITCHYARD_COLLISION_POLICY` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(separator) = lookup(NAMESPACE_SEPARATOR_VAR) {
            if separator.is_empty() {
                return Err(EventError::InvalidConfig(format!(
                    "{NAMESPACE_SEPARATOR_VAR} must not be empty"
                )));
            }
            config.namespace_separator = separator;
        }
        if let Some(policy) = lookup(COLLISION_POLICY_VAR) {
            config.collision_policy = policy.parse()?;
        }

        Ok(config)
    }

    pub fn with_namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = separator.into();
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ConstructorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ConstructorConfig::default());
        assert_eq!(config.namespace_separator, "/");
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
    }

    #[test]
    fn reads_overrides() {
        let config = ConstructorConfig::from_lookup(|key| match key {
            NAMESPACE_SEPARATOR_VAR => Some("::".into()),
            COLLISION_POLICY_VAR => Some("last_write_wins".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.namespace_separator, "::");
        assert_eq!(config.collision_policy, CollisionPolicy::LastWriteWins);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = ConstructorConfig::from_lookup(|key| {
            (key == COLLISION_POLICY_VAR).then(|| "first_wins".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, EventError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_separator() {
        let err = ConstructorConfig::from_lookup(|key| {
            (key == NAMESPACE_SEPARATOR_VAR).then(String::new)
        })
        .unwrap_err();
        assert!(matches!(err, EventError::InvalidConfig(_)));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ConstructorConfig =
            serde_json::from_str(r#"{"collision_policy": "last_write_wins"}"#).unwrap();
        assert_eq!(config.namespace_separator, "/");
        assert_eq!(config.collision_policy, CollisionPolicy::LastWriteWins);
    }
}
