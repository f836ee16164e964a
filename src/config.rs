//! Runtime configuration.
//!
//! The configuration is read from `config.json` inside the platform config directory (for
//! example `~/.config/skyball/config.json` on Linux). Every field is optional; anything missing
//! falls back to the defaults below.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{RenderError, Result};

/// Window and OpenGL context settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Samples per pixel, `0` disables multisampling.
    pub multisampling_samples: u8,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skyball".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            multisampling_samples: 16,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Directory the shader, texture and model paths are resolved against.
    pub assets_dir: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets_dir: PathBuf::from("assets"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Location of the user configuration file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skyball").join("config.json"))
    }

    /// Loads the user configuration, or the defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| RenderError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Resolves an asset path relative to [`Config::assets_dir`].
    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.assets_dir.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_window_setup() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.window.multisampling_samples, 16);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "window": { "width": 800 }, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn assets_resolve_against_assets_dir() {
        let config = Config {
            assets_dir: PathBuf::from("/opt/skyball"),
            ..Default::default()
        };
        assert_eq!(
            config.asset("models/ball.obj"),
            PathBuf::from("/opt/skyball/models/ball.obj")
        );
    }
}
