//! Key-value storage backends.
//!
//! The persona and credential stores sit on top of a small string key-value
//! interface, so the backing medium can be swapped without touching them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use agentme_core::error::{AgentMeError, Result};
use async_trait::async_trait;
use tokio::task;

use super::atomic_file::AtomicFile;

/// A string-to-string store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value for `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one file per key inside a directory.
///
/// Directory structure:
/// ```text
/// data_dir/
/// ├── created_agents
/// ├── current_agent
/// └── gemini_api_key
/// ```
///
/// Every file is written atomically with owner-only permissions. File I/O
/// and lock waits run on tokio's blocking pool.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AgentMeError::storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(AtomicFile::new(self.dir.join(key)).private())
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| AgentMeError::storage(format!("Failed to spawn blocking task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        let value = run_blocking(move || file.load()).await?;
        tracing::debug!(key, found = value.is_some(), "Read storage key");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let content = value.to_string();
        run_blocking(move || file.save(&content)).await?;
        tracing::debug!(key, bytes = value.len(), "Wrote storage key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || file.remove()).await?;
        tracing::debug!(key, "Removed storage key");
        Ok(())
    }
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AgentMeError::storage("In-memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
