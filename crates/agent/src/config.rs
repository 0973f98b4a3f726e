use serde::{Deserialize, Serialize};

/// Errors from loading or validating a worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {value} (must be finite and positive)")]
    Invalid { field: &'static str, value: f32 },
}

/// Tunables for a worker. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Walking speed in distance units per time unit.
    pub speed: f32,
    /// Horizontal distance below which the worker counts as arrived.
    pub arrival_threshold: f32,
    /// Accumulated time needed to chop a tree down.
    pub chop_duration: f32,
    /// Interval between periodic progress log lines.
    pub report_interval: f32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            arrival_threshold: 0.05,
            chop_duration: 10.0,
            report_interval: 1.0,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("speed", self.speed),
            ("arrival_threshold", self.arrival_threshold),
            ("chop_duration", self.chop_duration),
            ("report_interval", self.report_interval),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
