//! Configuration types.
//!
//! Glint reads an optional TOML file at `<config_dir>/glint/config.toml`.
//! A missing file means defaults; a malformed file degrades to defaults
//! with an error log rather than blocking startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chord::Chord;
use crate::engine::SearchEngine;
use crate::error::ConfigError;

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trigger chords.
    pub chords: ChordConfig,

    /// Default web search engine.
    pub search_engine: SearchEngine,

    /// Debounce delay for suggestion queries, in milliseconds.
    pub debounce_ms: u64,

    /// Register host-level command fallbacks alongside page chords.
    pub host_commands: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chords: ChordConfig::default(),
            search_engine: SearchEngine::default(),
            debounce_ms: 300,
            host_commands: true,
        }
    }
}

/// Trigger chord configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordConfig {
    /// Web search palette chord.
    pub web: String,

    /// Tool finder palette chord.
    pub tool: String,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            web: "ctrl+space".to_string(),
            tool: "ctrl+shift+space".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default path, degrading to defaults on any failure.
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parsed web palette chord.
    pub fn web_chord(&self) -> Result<Chord, ConfigError> {
        Chord::parse(&self.chords.web)
    }

    /// Parsed tool finder chord.
    pub fn tool_chord(&self) -> Result<Chord, ConfigError> {
        Chord::parse(&self.chords.tool)
    }
}

/// Get the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("glint/config.toml"))
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("glint"))
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chords.web, "ctrl+space");
        assert_eq!(config.chords.tool, "ctrl+shift+space");
        assert_eq!(config.search_engine, SearchEngine::Google);
        assert_eq!(config.debounce_ms, 300);
        assert!(config.host_commands);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            search_engine = "bing"

            [chords]
            web = "alt+p"
            tool = "alt+shift+p"
            "#,
        )
        .unwrap();

        assert_eq!(config.search_engine, SearchEngine::Bing);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.web_chord().unwrap().to_string(), "alt+p");
    }
}
