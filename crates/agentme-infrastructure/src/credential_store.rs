//! Key-value backed CredentialStore implementation.

use std::sync::Arc;

use agentme_core::credential::CredentialStore;
use agentme_core::error::Result;

use crate::storage::KeyValueStore;

/// Storage key holding the raw API key.
pub const API_KEY_KEY: &str = "gemini_api_key";

/// Environment variable consulted when no key is stored.
pub const API_KEY_ENV: &str = "AGENTME_API_KEY";

/// Credential store on top of any [`KeyValueStore`].
///
/// The key is stored as a raw string. When an environment fallback is
/// configured and nothing is stored, `get` returns the variable's value.
///
/// # Security Note
///
/// The credential is never logged. The file backend writes it owner-only.
pub struct KvCredentialStore {
    kv: Arc<dyn KeyValueStore>,
    env_fallback: Option<String>,
}

impl KvCredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            env_fallback: None,
        }
    }

    /// Falls back to the given environment variable when nothing is stored.
    pub fn with_env_fallback(mut self, var: impl Into<String>) -> Self {
        self.env_fallback = Some(var.into());
        self
    }

    async fn stored(&self) -> Option<String> {
        match self.kv.get(API_KEY_KEY).await {
            Ok(value) => value
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored API key: {}", e);
                None
            }
        }
    }

    fn from_env(&self) -> Option<String> {
        let var = self.env_fallback.as_deref()?;
        std::env::var(var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[async_trait::async_trait]
impl CredentialStore for KvCredentialStore {
    async fn save(&self, key: &str) -> Result<()> {
        self.kv.set(API_KEY_KEY, key).await?;
        tracing::info!("Saved API key");
        Ok(())
    }

    async fn get(&self) -> Option<String> {
        match self.stored().await {
            Some(key) => Some(key),
            None => self.from_env(),
        }
    }

    async fn remove(&self) -> Result<()> {
        self.kv.remove(API_KEY_KEY).await?;
        tracing::info!("Removed API key");
        Ok(())
    }
}
