//! Session configuration loaded from JSON.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::DEFAULT_SENSORS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sensor list is empty")]
    EmptySensors,
    #[error("duplicate sensor id: {id}")]
    DuplicateSensor { id: String },
}

/// Settings for one decoding session.
///
/// # Examples
/// ```
/// use binlog_core::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{"sensors": ["front", "back"]}"#)?;
/// assert_eq!(config.sensors, vec!["front", "back"]);
///
/// let defaults: SessionConfig = serde_json::from_str("{}")?;
/// assert_eq!(defaults.sensors, vec!["left", "front", "right"]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Known distance sensor ids, in display order.
    #[serde(default = "default_sensors")]
    pub sensors: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sensors: default_sensors(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensors.is_empty() {
            return Err(ConfigError::EmptySensors);
        }
        let mut seen = HashSet::new();
        for id in &self.sensors {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateSensor { id: id.clone() });
            }
        }
        Ok(())
    }
}

/// Reads and validates a JSON session config.
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

fn default_sensors() -> Vec<String> {
    DEFAULT_SENSORS.iter().map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SessionConfig};

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.sensors, vec!["left", "front", "right"]);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_duplicate_sensor() {
        let config = SessionConfig {
            sensors: vec!["left".to_string(), "left".to_string()],
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSensor { ref id } if id == "left"));
    }

    #[test]
    fn rejects_empty_sensor_list() {
        let config: SessionConfig = serde_json::from_str(r#"{"sensors": []}"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::EmptySensors)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<SessionConfig, _> = serde_json::from_str(r#"{"sensor": ["left"]}"#);
        assert!(result.is_err());
    }
}
