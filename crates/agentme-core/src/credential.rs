//! Credential store trait.
//!
//! Defines the interface for the single API key the chat endpoint needs.

use crate::error::Result;

/// Prefix every Gemini API key starts with.
pub const API_KEY_PREFIX: &str = "AIza";

/// Keys must be strictly longer than this many characters.
const MIN_KEY_LEN: usize = 20;

/// Storage for the API credential.
///
/// # Security Note
///
/// Implementations must never log the credential or include it in error
/// messages.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Overwrites the stored credential.
    async fn save(&self, key: &str) -> Result<()>;

    /// Returns the stored credential, if any.
    async fn get(&self) -> Option<String>;

    /// Clears the stored credential.
    async fn remove(&self) -> Result<()>;

    /// Whether a non-empty credential is available.
    async fn has(&self) -> bool {
        self.get().await.is_some_and(|key| !key.is_empty())
    }
}

/// Syntactic sanity check for an API key.
///
/// True iff the key starts with `AIza` and is longer than 20 characters. This
/// does not prove the key is live; the endpoint can still reject it.
pub fn validate_format(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.chars().count() > MIN_KEY_LEN
}

/// Masks a key for display, keeping the prefix and the last four characters.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
