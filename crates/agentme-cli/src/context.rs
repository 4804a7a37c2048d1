//! Wiring of config, storage and stores shared by every command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use agentme_core::config::AppConfig;
use agentme_core::credential::CredentialStore;
use agentme_core::persona::{Persona, PersonaStore};
use agentme_infrastructure::credential_store::API_KEY_ENV;
use agentme_infrastructure::storage::FileKeyValueStore;
use agentme_infrastructure::{AgentMePaths, ConfigService, KvCredentialStore, KvPersonaStore};
use anyhow::{Result, anyhow};

pub struct AppContext {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub personas: Arc<dyn PersonaStore>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppContext {
    /// Loads config and opens the stores.
    ///
    /// The data directory is taken from `--data-dir`, then `data_dir` in the
    /// config file, then the platform default.
    pub fn load(data_dir: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new()?,
        };
        let config = config_service.load()?;

        let override_dir = data_dir.or(config.data_dir.as_deref());
        let data_dir = AgentMePaths::new(override_dir).data_dir()?;
        tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

        let kv = Arc::new(FileKeyValueStore::new(&data_dir));
        let personas: Arc<dyn PersonaStore> = Arc::new(KvPersonaStore::new(kv.clone()));
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(KvCredentialStore::new(kv).with_env_fallback(API_KEY_ENV));

        Ok(Self {
            config,
            data_dir,
            personas,
            credentials,
        })
    }

    /// Resolves an explicit id, or the current persona when `id` is `None`.
    pub async fn resolve_persona(&self, id: Option<&str>) -> Result<Persona> {
        match id {
            Some(id) => self
                .personas
                .find(id)
                .await
                .ok_or_else(|| anyhow!("No persona with id '{id}'. See `agentme persona list`")),
            None => self.personas.get_current().await.ok_or_else(|| {
                anyhow!("No persona selected. Create one with `agentme persona create`")
            }),
        }
    }
}
