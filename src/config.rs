//! Configuration persistence
//!
//! Stores user preferences in `~/.config/emax/config.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default separator set for word motion.
pub const DEFAULT_WORD_SEPARATORS: &str = "./\\()\"'-:,.;<>~!@#$%^&*|+=[]{}`~?";

/// Default separator set for sexpr motion (dashes and underscores count as
/// part of a symbol).
pub const DEFAULT_SEXPR_SEPARATORS: &str = "./\\()\"':,.;<>~!@#$%^&*|+=[]{}`~?";

/// Layer configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmaxConfig {
    /// Characters that end a word for word motion commands
    #[serde(default = "default_word_separators")]
    pub word_separators: String,
    /// Characters that end a symbol for sexpr motion commands
    #[serde(default = "default_sexpr_separators")]
    pub sexpr_separators: String,
    /// Automatically enable active-mark mode whenever the mark is set
    #[serde(default)]
    pub active_mark_mode: bool,
    /// Expose the visible-mark state to host keybinding conditionals
    #[serde(default)]
    pub cancel_mark_enabled: bool,
    /// Columns per indent step for shift-region
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
    /// Strip trailing blanks from every line on save
    #[serde(default)]
    pub trim_trailing_white_space_on_save: bool,
    /// Append a final newline on save when missing
    #[serde(default)]
    pub ensure_newline_at_eof_on_save: bool,
}

fn default_word_separators() -> String {
    DEFAULT_WORD_SEPARATORS.to_string()
}

fn default_sexpr_separators() -> String {
    DEFAULT_SEXPR_SEPARATORS.to_string()
}

fn default_tab_size() -> usize {
    4
}

impl Default for EmaxConfig {
    fn default() -> Self {
        Self {
            word_separators: default_word_separators(),
            sexpr_separators: default_sexpr_separators(),
            active_mark_mode: false,
            cancel_mark_enabled: false,
            tab_size: default_tab_size(),
            trim_trailing_white_space_on_save: false,
            ensure_newline_at_eof_on_save: false,
        }
    }
}

/// Location of the config file, if a config directory exists on this system.
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("emax").join("config.yaml"))
}

/// `<config dir>/emax/logs/`, created on demand for the file log layer.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .map(|d| d.join("emax").join("logs"))
        .context("no config directory available on this system")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(dir)
}

impl EmaxConfig {
    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Self {
        let Some(path) = config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or return defaults if not found.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }

        let content = serde_yaml::to_string(self).context("serializing config")?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
