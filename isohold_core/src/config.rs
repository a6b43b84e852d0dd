//! Configuration file support for Isohold.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/isohold/config.toml`.

use crate::{Error, Result, TimerSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Default phase durations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u32,

    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
            rest_seconds: default_rest_seconds(),
        }
    }
}

/// Feedback channel toggles
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_enabled")]
    pub sound: bool,

    #[serde(default = "default_enabled")]
    pub vibration: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound: default_enabled(),
            vibration: default_enabled(),
        }
    }
}

// Default value functions
fn default_hold_seconds() -> u32 {
    10
}

fn default_rest_seconds() -> u32 {
    5
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("isohold").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Workout settings derived from this configuration
    pub fn settings(&self) -> TimerSettings {
        TimerSettings {
            hold_duration: self.timer.hold_seconds,
            rest_duration: self.timer.rest_seconds,
            sound_enabled: self.feedback.sound,
            vibration_enabled: self.feedback.vibration,
        }
        .normalized()
    }
}
