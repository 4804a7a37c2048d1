//! Persona draft collected by the creation wizard.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Industry, Persona, Tone, lenient_tone};
use crate::error::{AgentMeError, Result};

/// A persona without the store-assigned `id` and `created` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDraft {
    /// Display name (required)
    pub name: String,

    /// What the persona is for (required)
    pub purpose: String,

    /// Communication style (required by the wizard)
    #[serde(default, deserialize_with = "lenient_tone")]
    pub tone: Option<Tone>,

    /// Who the persona serves (required)
    pub target_user: String,

    /// Domain of expertise (required)
    pub industry: Industry,
}

impl PersonaDraft {
    /// Checks that every field the chat needs is filled in.
    ///
    /// The persona store does not call this; only the wizard does.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("Name", self.name.as_str()),
            ("Purpose", self.purpose.as_str()),
            ("Target user", self.target_user.as_str()),
            ("Industry", self.industry.label()),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AgentMeError::validation(format!(
                "{} is required and cannot be empty",
                field
            )));
        }

        if self.tone.is_none() {
            return Err(AgentMeError::validation("Tone must be selected"));
        }

        Ok(())
    }

    /// Turns the draft into a persona with a fresh UUID and the current time.
    pub fn into_persona(self) -> Persona {
        Persona {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            purpose: self.purpose,
            tone: self.tone,
            unknown_tone: None,
            target_user: self.target_user,
            industry: self.industry,
            created: Utc::now(),
        }
    }

    /// Creates a draft from an existing persona (for duplicating).
    pub fn from_persona(persona: &Persona) -> Self {
        Self {
            name: persona.name.clone(),
            purpose: persona.purpose.clone(),
            tone: persona.tone,
            target_user: persona.target_user.clone(),
            industry: persona.industry.clone(),
        }
    }
}

impl Default for PersonaDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            purpose: String::new(),
            tone: None,
            target_user: String::new(),
            industry: Industry::Other(String::new()),
        }
    }
}
