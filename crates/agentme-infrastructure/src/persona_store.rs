//! Key-value backed PersonaStore implementation.

use std::sync::Arc;

use agentme_core::error::{AgentMeError, Result};
use agentme_core::persona::{Persona, PersonaDraft, PersonaStore};

use crate::dto::{decode_collection, decode_current, encode_collection, encode_current};
use crate::storage::KeyValueStore;

/// Storage key holding the persona collection.
pub const PERSONAS_KEY: &str = "created_agents";
/// Storage key holding the current-persona pointer.
pub const CURRENT_PERSONA_KEY: &str = "current_agent";

/// Persona store on top of any [`KeyValueStore`].
///
/// Responsibilities:
/// - Read/write the whole collection under `created_agents`
/// - Read/write the current pointer under `current_agent`
/// - Convert between versioned DTOs and domain models
///
/// Does NOT:
/// - Validate drafts (the wizard does)
/// - Keep the current pointer in sync on delete
/// - Guard against another process rewriting the collection concurrently
pub struct KvPersonaStore {
    kv: Arc<dyn KeyValueStore>,
}

/// The collection as read, with the raw content it was decoded from.
struct LoadedCollection {
    raw: Option<String>,
    personas: Vec<Persona>,
}

impl KvPersonaStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Reads the collection, failing on content that cannot be decoded.
    ///
    /// Every write path goes through here so that unreadable content is
    /// never replaced.
    async fn try_load_collection(&self) -> Result<LoadedCollection> {
        let raw = self.kv.get(PERSONAS_KEY).await?;
        let personas = match raw.as_deref() {
            Some(content) => decode_collection(content).map_err(|e| {
                AgentMeError::Serialization {
                    format: "JSON".to_string(),
                    message: format!(
                        "Stored personas under '{}' are unreadable and were left untouched: {}",
                        PERSONAS_KEY, e
                    ),
                }
            })?,
            None => Vec::new(),
        };
        Ok(LoadedCollection { raw, personas })
    }

    async fn load_collection(&self) -> Vec<Persona> {
        match self.try_load_collection().await {
            Ok(loaded) => loaded.personas,
            Err(e) => {
                tracing::warn!("Treating personas as empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn store_collection(&self, personas: &[Persona]) -> Result<()> {
        let encoded = encode_collection(personas)?;
        self.kv.set(PERSONAS_KEY, &encoded).await
    }

    /// Puts back the collection content read before a failed save.
    async fn restore_collection(&self, raw: Option<&str>) {
        let restored = match raw {
            Some(raw) => self.kv.set(PERSONAS_KEY, raw).await,
            None => self.kv.remove(PERSONAS_KEY).await,
        };
        if let Err(e) = restored {
            tracing::error!("Failed to roll back persona collection: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl PersonaStore for KvPersonaStore {
    async fn save(&self, draft: PersonaDraft) -> Result<Persona> {
        let persona = draft.into_persona();

        let LoadedCollection { raw, mut personas } = self.try_load_collection().await?;
        personas.push(persona.clone());
        self.store_collection(&personas).await?;

        if let Err(e) = self.set_current(Some(&persona)).await {
            tracing::warn!(id = %persona.id, "Current pointer write failed, rolling back save");
            self.restore_collection(raw.as_deref()).await;
            return Err(e);
        }

        tracing::info!(id = %persona.id, name = %persona.name, "Saved persona");
        Ok(persona)
    }

    async fn list_all(&self) -> Vec<Persona> {
        self.load_collection().await
    }

    async fn get_current(&self) -> Option<Persona> {
        let raw = match self.kv.get(CURRENT_PERSONA_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read current persona: {}", e);
                return None;
            }
        };

        decode_current(&raw).unwrap_or_else(|e| {
            tracing::warn!("Stored current persona is unreadable: {}", e);
            None
        })
    }

    async fn set_current(&self, persona: Option<&Persona>) -> Result<()> {
        match persona {
            Some(persona) => {
                let encoded = encode_current(persona)?;
                self.kv.set(CURRENT_PERSONA_KEY, &encoded).await?;
                tracing::debug!(id = %persona.id, "Set current persona");
            }
            None => {
                self.kv.remove(CURRENT_PERSONA_KEY).await?;
                tracing::debug!("Cleared current persona");
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut personas = self.try_load_collection().await?.personas;
        let before = personas.len();
        personas.retain(|p| p.id != id);

        if personas.len() == before {
            tracing::debug!(id, "Delete requested for unknown persona");
            return Ok(());
        }

        self.store_collection(&personas).await?;
        tracing::info!(id, "Deleted persona");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use agentme_core::persona::{Industry, Tone};
    use async_trait::async_trait;

    fn draft(name: &str) -> PersonaDraft {
        PersonaDraft {
            name: name.to_string(),
            purpose: "회의 내용 요약 및 액션 아이템 추출".to_string(),
            tone: Some(Tone::Concise),
            target_user: "기획 담당자".to_string(),
            industry: Industry::Strategy,
        }
    }

    fn store() -> (Arc<MemoryKeyValueStore>, KvPersonaStore) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = KvPersonaStore::new(kv.clone());
        (kv, store)
    }

    /// Accepts reads, fails every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AgentMeError::storage("quota exceeded"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(AgentMeError::storage("quota exceeded"))
        }
    }

    /// Delegates to an inner store but fails writes to the current pointer.
    struct PointerWriteFails(Arc<MemoryKeyValueStore>);

    #[async_trait]
    impl KeyValueStore for PointerWriteFails {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == CURRENT_PERSONA_KEY {
                return Err(AgentMeError::storage("disk full"));
            }
            self.0.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_save_appends_and_sets_current() {
        let (_, store) = store();

        let saved = store.save(draft("회의록 정리 AI")).await.unwrap();

        let all = store.list_all().await;
        assert_eq!(all, vec![saved.clone()]);
        assert_eq!(PersonaDraft::from_persona(&all[0]), draft("회의록 정리 AI"));
        assert_eq!(store.get_current().await, Some(saved));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (_, store) = store();

        let a = store.save(draft("A")).await.unwrap();
        let b = store.save(draft("B")).await.unwrap();
        let c = store.save(draft("C")).await.unwrap();

        let ids: Vec<String> = store.list_all().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id.clone()]);
        assert_eq!(store.get_current().await.map(|p| p.id), Some(c.id));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_collection_unchanged() {
        let (kv, store) = store();
        store.save(draft("A")).await.unwrap();
        let before = kv.get(PERSONAS_KEY).await.unwrap();

        store.delete("does-not-exist").await.unwrap();

        assert_eq!(kv.get(PERSONAS_KEY).await.unwrap(), before);
        assert_eq!(store.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_does_not_touch_current_pointer() {
        let (_, store) = store();
        let saved = store.save(draft("A")).await.unwrap();

        store.delete(&saved.id).await.unwrap();

        assert!(store.list_all().await.is_empty());
        assert_eq!(store.get_current().await, Some(saved));
    }

    #[tokio::test]
    async fn test_delete_current_of_two_reassigns_to_remaining() {
        let (_, store) = store();
        let first = store.save(draft("A")).await.unwrap();
        let second = store.save(draft("B")).await.unwrap();

        let current = store.delete_and_reassign(&second.id).await.unwrap();

        assert_eq!(current, Some(first.clone()));
        assert_eq!(store.list_all().await, vec![first.clone()]);
        assert_eq!(store.get_current().await, Some(first));
    }

    #[tokio::test]
    async fn test_delete_last_persona_clears_current() {
        let (_, store) = store();
        let only = store.save(draft("A")).await.unwrap();

        let current = store.delete_and_reassign(&only.id).await.unwrap();

        assert!(current.is_none());
        assert!(store.get_current().await.is_none());
    }

    #[tokio::test]
    async fn test_delete_non_current_keeps_current() {
        let (_, store) = store();
        let first = store.save(draft("A")).await.unwrap();
        let second = store.save(draft("B")).await.unwrap();

        let current = store.delete_and_reassign(&first.id).await.unwrap();

        assert_eq!(current, Some(second.clone()));
        assert_eq!(store.get_current().await, Some(second));
    }

    #[tokio::test]
    async fn test_corrupt_content_reads_as_empty() {
        let (kv, store) = store();
        kv.set(PERSONAS_KEY, "{definitely not json").await.unwrap();
        kv.set(CURRENT_PERSONA_KEY, "[1, 2").await.unwrap();

        assert!(store.list_all().await.is_empty());
        assert!(store.get_current().await.is_none());
    }

    #[tokio::test]
    async fn test_writes_never_replace_unreadable_collection() {
        let newer = r#"[{"version":"2.0.0","id":"keep-me","name":"future","created":"2030-01-01T00:00:00Z"}]"#;

        for stored in ["{definitely not json", newer] {
            let (kv, store) = store();
            kv.set(PERSONAS_KEY, stored).await.unwrap();

            let err = store.save(draft("A")).await.unwrap_err();
            assert!(matches!(err, AgentMeError::Serialization { .. }));
            assert!(err.to_string().contains("left untouched"));

            let err = store.delete("keep-me").await.unwrap_err();
            assert!(matches!(err, AgentMeError::Serialization { .. }));

            assert_eq!(kv.get(PERSONAS_KEY).await.unwrap().as_deref(), Some(stored));
            assert!(kv.get(CURRENT_PERSONA_KEY).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_save_keeps_unrecognized_tone_of_existing_records() {
        let (kv, store) = store();
        kv.set(
            PERSONAS_KEY,
            r#"[{"id":"old","name":"친근한 도우미","purpose":"p","tone":"friendly","targetUser":"t","industry":"교육","created":"2024-05-29T16:26:40.000Z"}]"#,
        )
        .await
        .unwrap();

        store.save(draft("A")).await.unwrap();

        let raw = kv.get(PERSONAS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], "old");
        assert_eq!(value[0]["tone"], "friendly");
        assert_eq!(value[0]["industry"], "교육");
        assert_eq!(value[1]["tone"], "concise");
    }

    #[tokio::test]
    async fn test_failed_pointer_write_rolls_back_collection() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let first = KvPersonaStore::new(kv.clone())
            .save(draft("A"))
            .await
            .unwrap();
        let before = kv.get(PERSONAS_KEY).await.unwrap();

        let store = KvPersonaStore::new(Arc::new(PointerWriteFails(kv.clone())));
        let err = store.save(draft("B")).await.unwrap_err();

        assert!(err.is_storage());
        assert_eq!(kv.get(PERSONAS_KEY).await.unwrap(), before);
        assert_eq!(store.list_all().await, vec![first.clone()]);
        assert_eq!(store.get_current().await, Some(first));
    }

    #[tokio::test]
    async fn test_failed_first_save_leaves_no_collection() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = KvPersonaStore::new(Arc::new(PointerWriteFails(kv.clone())));

        assert!(store.save(draft("A")).await.is_err());

        assert!(kv.get(PERSONAS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_current_none_clears_pointer() {
        let (kv, store) = store();
        store.save(draft("A")).await.unwrap();

        store.set_current(None).await.unwrap();

        assert!(kv.get(CURRENT_PERSONA_KEY).await.unwrap().is_none());
        assert!(store.get_current().await.is_none());
    }

    #[tokio::test]
    async fn test_save_surfaces_write_failure() {
        let store = KvPersonaStore::new(Arc::new(ReadOnlyStore));

        let err = store.save(draft("A")).await.unwrap_err();

        assert!(err.is_storage());
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_find() {
        let (_, store) = store();
        let saved = store.save(draft("A")).await.unwrap();

        assert_eq!(store.find(&saved.id).await, Some(saved));
        assert!(store.find("missing").await.is_none());
    }
}
