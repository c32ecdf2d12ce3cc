use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use texcaret_engine::shortcuts::{builtin_shortcuts, Shortcut, PLACEHOLDER};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid shortcut '{trigger}': {reason}")]
    InvalidShortcut { trigger: String, reason: String },
}

/// One user-defined shortcut, as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub trigger: String,
    pub template: String,
    #[serde(default)]
    pub cursor_offset: isize,
    #[serde(default)]
    pub default_content: Option<String>,
}

impl ShortcutEntry {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.is_empty() {
            return Err(ConfigError::InvalidShortcut {
                trigger: self.trigger.clone(),
                reason: "trigger must not be empty".to_string(),
            });
        }
        let placeholders = self.template.matches(PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ConfigError::InvalidShortcut {
                trigger: self.trigger.clone(),
                reason: format!(
                    "template must contain the {PLACEHOLDER} placeholder exactly once, found {placeholders}"
                ),
            });
        }
        if self.cursor_offset > 0 {
            return Err(ConfigError::InvalidShortcut {
                trigger: self.trigger.clone(),
                reason: "cursor_offset must be zero or negative".to_string(),
            });
        }
        Ok(())
    }

    fn to_shortcut(&self) -> Shortcut {
        Shortcut {
            trigger: self.trigger.clone(),
            template: self.template.clone(),
            cursor_offset: self.cursor_offset,
            default_content: self.default_content.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shortcuts: Vec<ShortcutEntry>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for entry in &config.shortcuts {
            entry.validate()?;
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/texcaret");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The built-in shortcut table with user entries merged in.
    ///
    /// A user entry whose trigger matches a built-in replaces it; other
    /// entries extend the table.
    pub fn shortcut_table(&self) -> Vec<Shortcut> {
        let mut table = builtin_shortcuts();
        for entry in &self.shortcuts {
            let shortcut = entry.to_shortcut();
            match table.iter_mut().find(|s| s.trigger == shortcut.trigger) {
                Some(existing) => *existing = shortcut,
                None => table.push(shortcut),
            }
        }
        table
    }
}
