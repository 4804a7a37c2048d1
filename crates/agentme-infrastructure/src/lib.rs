pub mod config_service;
pub mod credential_store;
pub mod dto;
pub mod paths;
pub mod persona_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::credential_store::KvCredentialStore;
pub use crate::paths::AgentMePaths;
pub use crate::persona_store::KvPersonaStore;
