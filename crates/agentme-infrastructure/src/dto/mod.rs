//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisted data. They are
//! private to the infrastructure layer and absorb changes in the storage
//! format over time through `version-migrate` chains.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//! - **PATCH (1.0.X)**: Backward-compatible fixes
//!
//! Readers migrate any registered version forward and always write the
//! newest one.

mod persona;

pub use persona::{
    PERSONA_ENTITY, PERSONA_SCHEMA_VERSION, PersonaRecordV0, PersonaRecordV1_0_0,
    create_persona_migrator, decode_collection, decode_current, encode_collection,
    encode_current,
};
