//! Booking statistics configuration
//!
//! Window span and registry map choice, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::registry::{MapKind, StatsRegistry};
use crate::window::{Time, WindowSpan, WindowSpanError, DEFAULT_WINDOW_SPAN};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HOTEL_STATS_CONFIG";

/// Config file looked up when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "hotel_stats.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Trailing window span in time ticks
    #[serde(default = "default_window_span")]
    pub window_span: Time,

    /// Hotel index backing map
    #[serde(default)]
    pub map_kind: MapKind,
}

fn default_window_span() -> Time {
    DEFAULT_WINDOW_SPAN
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_span: DEFAULT_WINDOW_SPAN,
            map_kind: MapKind::default(),
        }
    }
}

impl StatsConfig {
    /// Load from TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `HOTEL_STATS_CONFIG` or the default path.
    ///
    /// An explicitly named file must load; a missing default file falls back
    /// to built-in defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(&path),
            Err(_) => Ok(Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
                tracing::debug!("Using default stats config ({}): {}", DEFAULT_CONFIG_PATH, e);
                Self::default()
            })),
        }
    }

    /// Save to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<WindowSpan, WindowSpanError> {
        WindowSpan::new(self.window_span)
    }

    /// Build an empty registry from this config.
    pub fn build_registry(&self) -> Result<StatsRegistry, WindowSpanError> {
        Ok(StatsRegistry::with_map_kind(self.validate()?, self.map_kind))
    }
}
