//! Remote chat client trait.

use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Separator placed between the system prompt and the user's message.
pub const USER_QUESTION_SEPARATOR: &str = "\n\n사용자 질문: ";

/// Builds the single text blob sent to the model.
///
/// With a system prompt the result is `"{prompt}\n\n사용자 질문: {message}"`;
/// without one the message is sent unmodified.
pub fn compose_request_text(message: &str, system_prompt: Option<&str>) -> String {
    match system_prompt {
        Some(prompt) if !prompt.is_empty() => {
            format!("{prompt}{USER_QUESTION_SEPARATOR}{message}")
        }
        _ => message.to_string(),
    }
}

/// A stateless client that sends one message and returns the model's reply.
///
/// Each call performs exactly one request/response round trip. Implementations
/// hold no per-conversation state, so independent calls may run concurrently.
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends a message, optionally prefixed with a system prompt.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The reply text
    /// - `Err(AgentMeError::RemoteService)`: Non-success HTTP status
    /// - `Err(AgentMeError::MalformedResponse)`: Reply text missing from the body
    /// - `Err(AgentMeError::Transport)`: Connection failure or timeout
    async fn send(&self, message: &str, system_prompt: Option<&str>) -> Result<String> {
        self.send_with_cancel(message, system_prompt, &CancellationToken::new())
            .await
    }

    /// Like [`ChatClient::send`], but gives up with `Cancelled` once `cancel`
    /// fires.
    async fn send_with_cancel(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String>;
}
