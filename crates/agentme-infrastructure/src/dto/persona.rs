//! Persona DTOs and migrations.
//!
//! Every stored persona is a flat JSON object carrying its own `version`
//! key, read through a `version-migrate` chain into the domain model.
//!
//! ### Version history
//! - **0.0.0**: records written before versioning existed (no `version` key)
//! - **1.0.0**: same fields, blank tones dropped, unknown tones kept verbatim

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Migrator, Versioned};

use agentme_core::error::{AgentMeError, Result};
use agentme_core::persona::{Industry, Persona, Tone};

/// Entity name registered with the migrator.
pub const PERSONA_ENTITY: &str = "persona";

/// Schema version written by this build.
pub const PERSONA_SCHEMA_VERSION: &str = "1.0.0";

/// Version assigned to records that predate the `version` key.
const LEGACY_VERSION: &str = "0.0.0";

/// Newest major version this build can read.
const SUPPORTED_MAJOR: u64 = 1;

const VERSION_KEY: &str = "version";

/// Persona record as written before schema versioning.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "0.0.0")]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecordV0 {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub target_user: String,
    #[serde(default)]
    pub industry: String,
    pub created: DateTime<Utc>,
}

/// Persona record V1.0.0.
///
/// Tone and industry stay raw strings so that a label this build does not
/// know survives a read and write cycle unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecordV1_0_0 {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default)]
    pub target_user: String,
    #[serde(default)]
    pub industry: String,
    pub created: DateTime<Utc>,
}

// ============================================================================
// Migration implementations
// ============================================================================

/// V0 stored "no tone" as an empty string.
impl MigratesTo<PersonaRecordV1_0_0> for PersonaRecordV0 {
    fn migrate(self) -> PersonaRecordV1_0_0 {
        PersonaRecordV1_0_0 {
            id: self.id,
            name: self.name,
            purpose: self.purpose,
            tone: self.tone.filter(|tone| !tone.trim().is_empty()),
            target_user: self.target_user,
            industry: self.industry,
            created: self.created,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<Persona> for PersonaRecordV1_0_0 {
    fn into_domain(self) -> Persona {
        let (tone, unknown_tone) = match self.tone.filter(|tone| !tone.trim().is_empty()) {
            Some(label) => match label.parse::<Tone>() {
                Ok(tone) => (Some(tone), None),
                Err(_) => (None, Some(label)),
            },
            None => (None, None),
        };

        Persona {
            id: self.id,
            name: self.name,
            purpose: self.purpose,
            tone,
            unknown_tone,
            target_user: self.target_user,
            industry: Industry::from_label(&self.industry),
            created: self.created,
        }
    }
}

impl FromDomain<Persona> for PersonaRecordV1_0_0 {
    fn from_domain(persona: Persona) -> Self {
        PersonaRecordV1_0_0 {
            id: persona.id,
            name: persona.name,
            purpose: persona.purpose,
            tone: persona
                .tone
                .map(|tone| tone.as_str().to_string())
                .or(persona.unknown_tone),
            target_user: persona.target_user,
            industry: persona.industry.into(),
            created: persona.created,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for persona records.
///
/// # Migration Path
///
/// - V0 → V1.0.0: Drops blank tones
/// - V1.0.0 → Persona: Parses tone and industry labels
pub fn create_persona_migrator() -> Migrator {
    let mut migrator = Migrator::builder().build();
    let path = Migrator::define(PERSONA_ENTITY)
        .from::<PersonaRecordV0>()
        .step::<PersonaRecordV1_0_0>()
        .into_with_save::<Persona>();
    migrator
        .register(path)
        .expect("Failed to register persona migration path");
    migrator
}

// ============================================================================
// Encoding
// ============================================================================

fn unreadable(message: impl Into<String>) -> AgentMeError {
    AgentMeError::Serialization {
        format: "JSON".to_string(),
        message: message.into(),
    }
}

fn migration_error(e: impl std::fmt::Display) -> AgentMeError {
    unreadable(format!("Failed to migrate persona record: {}", e))
}

/// Tags a pre-versioning record as V0 and refuses records from a newer major.
fn tag_version(record: Value) -> Result<Value> {
    let Value::Object(mut fields) = record else {
        return Err(unreadable("Persona record is not a JSON object"));
    };

    match fields.get(VERSION_KEY) {
        None => {
            fields.insert(
                VERSION_KEY.to_string(),
                Value::String(LEGACY_VERSION.to_string()),
            );
        }
        Some(Value::String(version)) => {
            let parsed = Version::parse(version).map_err(|e| {
                unreadable(format!("Invalid persona schema version '{}': {}", version, e))
            })?;
            if parsed.major > SUPPORTED_MAJOR {
                return Err(unreadable(format!(
                    "Unsupported persona schema version {} (this build reads up to {}.x.x)",
                    version, SUPPORTED_MAJOR
                )));
            }
        }
        Some(other) => {
            return Err(unreadable(format!(
                "Persona schema version must be a string, found {}",
                other
            )));
        }
    }

    Ok(Value::Object(fields))
}

/// Parses stored collection content. `null` means an empty collection.
pub fn decode_collection(raw: &str) -> Result<Vec<Persona>> {
    let records = match serde_json::from_str::<Value>(raw)? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(records) => records,
        _ => return Err(unreadable("Stored personas are not a JSON array")),
    };

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let records = records
        .into_iter()
        .map(tag_version)
        .collect::<Result<Vec<_>>>()?;

    create_persona_migrator()
        .load_vec_flat_from(PERSONA_ENTITY, records)
        .map_err(migration_error)
}

/// Serializes the collection as an array of current-version records.
pub fn encode_collection(personas: &[Persona]) -> Result<String> {
    let records: Vec<PersonaRecordV1_0_0> = personas
        .iter()
        .cloned()
        .map(PersonaRecordV1_0_0::from_domain)
        .collect();

    create_persona_migrator()
        .save_vec_flat(records)
        .map_err(migration_error)
}

/// Parses stored current-pointer content. `null` means no current persona.
pub fn decode_current(raw: &str) -> Result<Option<Persona>> {
    let record = match serde_json::from_str::<Value>(raw)? {
        Value::Null => return Ok(None),
        record => tag_version(record)?,
    };

    create_persona_migrator()
        .load_flat_from(PERSONA_ENTITY, record)
        .map(Some)
        .map_err(migration_error)
}

/// Serializes the current pointer as one current-version record.
pub fn encode_current(persona: &Persona) -> Result<String> {
    create_persona_migrator()
        .save_domain_flat(PERSONA_ENTITY, persona)
        .map_err(migration_error)
}
