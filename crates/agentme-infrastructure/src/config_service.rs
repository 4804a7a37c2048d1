//! Configuration loading.
//!
//! Reads `AppConfig` from `config.toml`. A missing file yields defaults; a
//! file that does not parse or holds unusable values is a configuration error.

use std::fs;
use std::path::{Path, PathBuf};

use agentme_core::config::AppConfig;
use agentme_core::error::{AgentMeError, Result};

use crate::paths::AgentMePaths;

/// Loads the application configuration from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default path (`~/.config/agentme/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: AgentMePaths::config_file()?,
        })
    }

    /// Uses a custom path (for testing or `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No config file, using defaults");
                return Ok(AppConfig::default());
            }
            Err(e) => {
                return Err(AgentMeError::config(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            AgentMeError::config(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        config.gemini.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_gemini_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[gemini]
max_output_tokens = 1024
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(path).load().unwrap();
        assert_eq!(config.gemini.max_output_tokens, 1024);
        assert_eq!(config.gemini.timeout_secs, 5);
        assert!(config.gemini.safety_settings);
    }

    #[test]
    fn test_zero_timeout_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[gemini]\ntimeout_secs = 0\n").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(matches!(err, AgentMeError::Config(_)));
        assert!(err.to_string().contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[gemini\nmodel = ").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(!err.is_recoverable());
    }
}
