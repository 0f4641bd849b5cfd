use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::propagate::{PropagateError, Window};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration '{value}': {message}")]
    InvalidDuration { value: String, message: String },
    #[error("invalid window: {0}")]
    Window(#[from] PropagateError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Element-set text loaded at startup and on reload.
    pub tle_file: PathBuf,
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_step")]
    pub step: String,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_window() -> String {
    "2h".to_string()
}

fn default_step() -> String {
    "1m".to_string()
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        // durations must parse before the config is accepted
        parse_minutes(&config.window)?;
        parse_minutes(&config.step)?;
        Ok(config)
    }

    /// The configured sampling window starting at `start`.
    pub fn window(&self, start: DateTime<Utc>) -> Result<Window, ConfigError> {
        let minutes = parse_minutes(&self.window)?;
        let step = parse_minutes(&self.step)?;
        Ok(Window::new(start, minutes).with_step(step)?.bounded()?)
    }
}

/// Parse a human duration such as `90m` or `2h` into whole minutes.
pub fn parse_minutes(value: &str) -> Result<u32, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidDuration {
        value: value.to_string(),
        message,
    };
    let duration = humantime::parse_duration(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if duration.subsec_nanos() != 0 || duration.as_secs() % 60 != 0 {
        return Err(invalid("must be a whole number of minutes".into()));
    }
    u32::try_from(duration.as_secs() / 60).map_err(|_| invalid("too long".into()))
}
