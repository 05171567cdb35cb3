use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::frame::DEFAULT_CONFIRM_SUFFIX;
use crate::keymap::KeyBinding;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "MAPWIDGETS_CONFIG";

/// Configuration for the mapwidgets demo (`~/.mapwidgets/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetsConfig {
    pub frame: FrameConfig,
    pub keys: KeysConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// Caption shown in front of the command line
    pub caption: String,
    /// Appended to every yes/no prompt
    pub confirm_suffix: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            caption: mapwidgets_core::DEFAULT_CAPTION.to_string(),
            confirm_suffix: DEFAULT_CONFIRM_SUFFIX.to_string(),
        }
    }
}

/// Key strings, parsed with [`KeyBinding::parse`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeysConfig {
    pub up: String,
    pub down: String,
    pub top: String,
    pub bottom: String,
    pub command: String,
    pub search: String,
    pub search_next: String,
    pub search_previous: String,
    pub quit: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            up: "k".to_string(),
            down: "j".to_string(),
            top: "g".to_string(),
            bottom: "G".to_string(),
            command: ":".to_string(),
            search: "/".to_string(),
            search_next: "n".to_string(),
            search_previous: "N".to_string(),
            quit: "q".to_string(),
        }
    }
}

/// Parsed form of [`KeysConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub top: KeyBinding,
    pub bottom: KeyBinding,
    pub command: KeyBinding,
    pub search: KeyBinding,
    pub search_next: KeyBinding,
    pub search_previous: KeyBinding,
    pub quit: KeyBinding,
}

impl KeysConfig {
    pub fn bindings(&self) -> Result<KeyBindings> {
        let parse = |name: &str, value: &str| {
            KeyBinding::parse(value).with_context(|| format!("Invalid key for [keys].{name}"))
        };
        Ok(KeyBindings {
            up: parse("up", &self.up)?,
            down: parse("down", &self.down)?,
            top: parse("top", &self.top)?,
            bottom: parse("bottom", &self.bottom)?,
            command: parse("command", &self.command)?,
            search: parse("search", &self.search)?,
            search_next: parse("search_next", &self.search_next)?,
            search_previous: parse("search_previous", &self.search_previous)?,
            quit: parse("quit", &self.quit)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset (e.g. "debug")
    pub level: Option<String>,
    /// Log file; logs are discarded while the terminal UI runs without one
    pub file: Option<PathBuf>,
}

impl WidgetsConfig {
    /// Load from `$MAPWIDGETS_CONFIG` or `~/.mapwidgets/config.toml`
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file (invalid TOML): {}", path.display()))?;

        config.keys.bindings()?;
        Ok(config)
    }

    /// Config file path: `$MAPWIDGETS_CONFIG`, else `~/.mapwidgets/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mapwidgets/config.toml")
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WidgetsConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WidgetsConfig::default());
        assert_eq!(config.frame.caption, "> ");
        assert_eq!(config.frame.confirm_suffix, " [y/n]");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[frame]\ncaption = \": \"\n\n[keys]\nquit = \"ctrl-q\"").unwrap();

        let config = WidgetsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.frame.caption, ": ");
        assert_eq!(config.frame.confirm_suffix, " [y/n]");
        assert_eq!(config.keys.search, "/");

        let bindings = config.keys.bindings().unwrap();
        assert_eq!(bindings.quit, KeyBinding::parse("ctrl-q").unwrap());
        assert_eq!(bindings.bottom, KeyBinding::char('G'));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[frame\ncaption = 1").unwrap();
        let err = WidgetsConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_bad_key_names_the_field() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[keys]\nsearch = \"hyper-s\"").unwrap();
        let err = WidgetsConfig::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("[keys].search"));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = WidgetsConfig::default();
        config.logging.level = Some("debug".to_string());
        let text = config.to_toml().unwrap();
        assert!(text.contains("[frame]"));
        let parsed: WidgetsConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
