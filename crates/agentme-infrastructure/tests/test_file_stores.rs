use std::fs;
use std::sync::Arc;

use agentme_core::credential::CredentialStore;
use agentme_core::persona::{Industry, PersonaDraft, PersonaStore, Tone};
use agentme_infrastructure::persona_store::{CURRENT_PERSONA_KEY, PERSONAS_KEY};
use agentme_infrastructure::storage::FileKeyValueStore;
use agentme_infrastructure::{KvCredentialStore, KvPersonaStore};
use tempfile::TempDir;

fn persona_store(dir: &TempDir) -> KvPersonaStore {
    KvPersonaStore::new(Arc::new(FileKeyValueStore::new(dir.path())))
}

fn draft() -> PersonaDraft {
    PersonaDraft {
        name: "영업 제안서 생성기".to_string(),
        purpose: "고객 맞춤형 제안서 초안 작성".to_string(),
        tone: Some(Tone::Professional),
        target_user: "영업 담당자".to_string(),
        industry: Industry::Sales,
    }
}

#[tokio::test]
async fn test_personas_survive_a_new_store_instance() {
    let temp_dir = TempDir::new().unwrap();

    let saved = persona_store(&temp_dir).save(draft()).await.unwrap();

    // A fresh store over the same directory sees the same state
    let reopened = persona_store(&temp_dir);
    assert_eq!(reopened.list_all().await, vec![saved.clone()]);
    assert_eq!(reopened.get_current().await, Some(saved));

    let on_disk = fs::read_to_string(temp_dir.path().join(PERSONAS_KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(value[0]["version"], "1.0.0");
    assert_eq!(value[0]["industry"], "영업/세일즈");
}

#[tokio::test]
async fn test_unversioned_files_are_read_and_upgraded_on_write() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(PERSONAS_KEY),
        r#"[{"id":"1717000000000","name":"고객 응답 어시스턴트","purpose":"고객 문의 응답 템플릿 생성","tone":"creative","targetUser":"고객지원 담당자","industry":"고객서비스","created":"2024-05-29T16:26:40.000Z"}]"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join(CURRENT_PERSONA_KEY),
        r#"{"id":"1717000000000","name":"고객 응답 어시스턴트","purpose":"고객 문의 응답 템플릿 생성","tone":"creative","targetUser":"고객지원 담당자","industry":"고객서비스","created":"2024-05-29T16:26:40.000Z"}"#,
    )
    .unwrap();

    let store = persona_store(&temp_dir);
    let existing = store.list_all().await;
    assert_eq!(existing.len(), 1);
    assert_eq!(existing[0].industry, Industry::CustomerService);
    assert_eq!(store.get_current().await.map(|p| p.id), Some("1717000000000".to_string()));

    store.save(draft()).await.unwrap();

    let on_disk = fs::read_to_string(temp_dir.path().join(PERSONAS_KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "1717000000000");
    assert_eq!(records[0]["tone"], "creative");
    assert!(records.iter().all(|record| record["version"] == "1.0.0"));
}

#[tokio::test]
async fn test_unreadable_file_survives_a_save_attempt() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(PERSONAS_KEY);
    let newer = r#"[{"version":"2.0.0","id":"keep-me","created":"2030-01-01T00:00:00Z"}]"#;
    fs::write(&path, newer).unwrap();

    let store = persona_store(&temp_dir);
    assert!(store.list_all().await.is_empty());
    assert!(store.save(draft()).await.is_err());
    assert!(store.delete("keep-me").await.is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), newer);
    assert!(!temp_dir.path().join(CURRENT_PERSONA_KEY).exists());
}

#[tokio::test]
async fn test_credential_and_personas_share_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let kv = Arc::new(FileKeyValueStore::new(temp_dir.path()));
    let personas = KvPersonaStore::new(kv.clone());
    let credentials = KvCredentialStore::new(kv);

    credentials.save("AIzaXXXXXXXXXXXXXXXXXXX").await.unwrap();
    personas.save(draft()).await.unwrap();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("gemini_api_key")).unwrap(),
        "AIzaXXXXXXXXXXXXXXXXXXX"
    );
    assert_eq!(personas.list_all().await.len(), 1);

    credentials.remove().await.unwrap();
    assert!(!temp_dir.path().join("gemini_api_key").exists());
    assert_eq!(personas.list_all().await.len(), 1);
}
