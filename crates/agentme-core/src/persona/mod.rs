//! Persona domain module.
//!
//! # Module Structure
//!
//! - `model`: `Persona`, `Tone`, `Industry`
//! - `request`: `PersonaDraft`, the wizard's input
//! - `repository`: `PersonaStore` trait
//! - `preset`: job presets the wizard can start from

mod model;
mod preset;
mod repository;
pub mod request;

pub use model::{Industry, Persona, Tone};
pub use preset::{JobPreset, find_job_preset, job_presets};
pub use repository::PersonaStore;
pub use request::PersonaDraft;
