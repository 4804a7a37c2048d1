//! Path management for AgentMe configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/agentme/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/agentme/      # Data directory (key-value store)
//! ├── created_agents           # Persona collection
//! ├── current_agent            # Current persona pointer
//! └── gemini_api_key           # API key (mode 600)
//! ```

use std::path::{Path, PathBuf};

use agentme_core::error::{AgentMeError, Result};

const APP_DIR: &str = "agentme";

/// Resolves where AgentMe reads and writes its files.
///
/// A base directory override (for tests or `--data-dir`) replaces the
/// platform data directory.
#[derive(Debug, Clone, Default)]
pub struct AgentMePaths {
    data_override: Option<PathBuf>,
}

impl AgentMePaths {
    pub fn new(data_override: Option<&Path>) -> Self {
        Self {
            data_override: data_override.map(Path::to_path_buf),
        }
    }

    /// Returns the AgentMe configuration directory (e.g. `~/.config/agentme/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AgentMeError::config("Cannot find config directory"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the data directory holding the key-value store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_override {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AgentMeError::config("Cannot find data directory"))
    }
}
