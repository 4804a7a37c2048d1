//! Chat session orchestration.
//!
//! A session binds one persona to a chat client: the system prompt is
//! compiled once when the session opens and prefixed to every message.

use std::sync::Arc;

use agentme_core::chat::{ChatClient, ChatMessage};
use agentme_core::config::GeminiSettings;
use agentme_core::credential::{self, CredentialStore};
use agentme_core::error::{AgentMeError, Result};
use agentme_core::persona::{Persona, PersonaStore};
use agentme_core::prompt;
use tokio_util::sync::CancellationToken;

use crate::gemini_client::GeminiClient;

/// One conversation with one persona.
///
/// The transcript lives only in memory and is lost when the session is
/// dropped.
pub struct ChatSession {
    persona: Persona,
    system_prompt: String,
    client: Arc<dyn ChatClient>,
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    /// Starts a session and greets the user with the persona's welcome message.
    pub fn new(persona: Persona, client: Arc<dyn ChatClient>) -> Self {
        let system_prompt = prompt::compile(&persona);
        let mut session = Self {
            persona,
            system_prompt,
            client,
            transcript: Vec::new(),
        };
        session.greet();
        session
    }

    /// Opens a Gemini-backed session for the current persona.
    ///
    /// # Returns
    ///
    /// - `Err(AgentMeError::Validation)`: No API key, a malformed key, or no
    ///   current persona
    pub async fn open(
        personas: &dyn PersonaStore,
        credentials: &dyn CredentialStore,
        settings: &GeminiSettings,
    ) -> Result<Self> {
        let api_key = credentials.get().await.ok_or_else(|| {
            AgentMeError::validation("Gemini API key is not set. Run `agentme key set <KEY>` first")
        })?;

        if !credential::validate_format(&api_key) {
            return Err(AgentMeError::validation(
                "Stored Gemini API key is malformed (expected 'AIza...' longer than 20 characters)",
            ));
        }

        let persona = personas.get_current().await.ok_or_else(|| {
            AgentMeError::validation(
                "No persona selected. Create one with `agentme persona create` first",
            )
        })?;

        let client = GeminiClient::new(api_key, settings.clone())?;
        tracing::info!(persona = %persona.name, model = %settings.model, "Opened chat session");

        Ok(Self::new(persona, Arc::new(client)))
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Drops the conversation so far and greets again.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.greet();
    }

    /// Sends a message and records both sides of the exchange.
    ///
    /// Blank input is ignored and yields `Ok(None)`. On failure the user's
    /// message stays in the transcript without a reply.
    pub async fn send(&mut self, text: &str) -> Result<Option<String>> {
        self.send_with_cancel(text, &CancellationToken::new()).await
    }

    /// Like [`ChatSession::send`], but stops waiting once `cancel` fires.
    pub async fn send_with_cancel(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.transcript.push(ChatMessage::user(text));

        let reply = self
            .client
            .send_with_cancel(text, Some(&self.system_prompt), cancel)
            .await?;

        self.transcript.push(ChatMessage::agent(reply.clone()));
        Ok(Some(reply))
    }

    fn greet(&mut self) {
        self.transcript
            .push(ChatMessage::agent(prompt::welcome_message(&self.persona)));
    }
}
