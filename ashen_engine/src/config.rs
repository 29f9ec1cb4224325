//! Engine settings loaded from TOML.
//!
//! Every key is optional. A missing or unreadable file gives the defaults
//! with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::input::history_path;
use crate::save_files::DEFAULT_SAVE_DIR;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub input: InputConfig,
    pub narration: NarrationConfig,
    pub saves: SaveConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How often the interpreter checks for new input.
    pub poll_interval_ms: u64,
    /// Keep command history in the save directory.
    pub history: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Delay between characters of the typewriter effect. Zero disables it.
    pub pace_ms: u64,
    pub styled: bool,
    /// How often the ending hand-off checks whether narration has finished.
    pub wait_interval_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            pace_ms: 12,
            styled: true,
            wait_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub dir: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Description table, relative to the data root unless absolute.
    pub descriptions: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            descriptions: PathBuf::from("descriptions.ron"),
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.input.poll_interval_ms)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.narration.pace_ms)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.narration.wait_interval_ms)
    }

    /// Where command history is kept, if anywhere.
    pub fn history_file(&self) -> Option<PathBuf> {
        self.input.history.then(|| history_path(&self.saves.dir))
    }
}

/// Load settings from `path`, falling back to defaults on any error.
pub fn load_config(path: &Path) -> EngineConfig {
    match try_load_config(path) {
        Ok(config) => {
            info!("engine settings loaded from '{}'", path.display());
            config
        },
        Err(e) => {
            warn!("Could not load engine settings from '{}': {e:#}. Using defaults.", path.display());
            EngineConfig::default()
        },
    }
}

/// Parse settings from TOML text.
///
/// # Errors
/// - if the text is not valid TOML for [`EngineConfig`]
pub fn parse_config(text: &str) -> Result<EngineConfig> {
    toml::from_str(text).context("parsing engine settings")
}

fn try_load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading engine settings from '{}'", path.display()))?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config("[narration]\npace_ms = 0\n").unwrap();
        assert_eq!(config.narration.pace_ms, 0);
        assert!(config.narration.styled);
        assert_eq!(config.input.poll_interval_ms, 100);
        assert_eq!(config.saves.dir, PathBuf::from("saved_games"));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = parse_config(include_str!("../data/config.toml")).unwrap();
        assert_eq!(shipped, EngineConfig::default());
    }

    #[test]
    fn missing_file_falls_back() {
        let config = load_config(Path::new("definitely/not/here.toml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn history_follows_the_save_directory() {
        let config = parse_config("[saves]\ndir = \"elsewhere\"\n").unwrap();
        assert_eq!(config.history_file(), Some(PathBuf::from("elsewhere").join("history.txt")));
        let config = parse_config("[input]\nhistory = false\n").unwrap();
        assert_eq!(config.history_file(), None);
    }

    #[test]
    fn wrong_types_are_errors() {
        assert!(parse_config("[input]\npoll_interval_ms = \"fast\"\n").is_err());
    }
}
