//! Error types for the AgentMe application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire AgentMe application.
///
/// Everything except `Config` is recoverable from the user's point of view:
/// the caller shows a notice and returns to the previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMeError {
    /// Storage read/write failure (disk full, permission denied, ...)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// User input that failed a required-field or format check
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-success HTTP status from the chat endpoint
    #[error("Remote service error (HTTP {status}){}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    RemoteService {
        status: u16,
        message: Option<String>,
    },

    /// The chat endpoint answered with an unexpected body shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Connection failure or timeout before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentMeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a RemoteService error
    pub fn remote(status: u16, message: Option<String>) -> Self {
        Self::RemoteService { status, message }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from talking to the remote endpoint.
    ///
    /// Remote-service and malformed-response failures are surfaced to the
    /// user identically, as a transient failure of the request.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteService { .. } | Self::MalformedResponse(_) | Self::Transport(_)
        )
    }

    /// Returns the HTTP status for remote-service errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the interactive front end can simply report this and continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AgentMeError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AgentMeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AgentMeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AgentMeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AgentMeError>`.
pub type Result<T> = std::result::Result<T, AgentMeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_with_message() {
        let err = AgentMeError::remote(429, Some("Resource has been exhausted".to_string()));
        assert_eq!(
            err.to_string(),
            "Remote service error (HTTP 429): Resource has been exhausted"
        );
        assert_eq!(err.status(), Some(429));
        assert!(err.is_remote());
    }

    #[test]
    fn test_remote_error_display_without_message() {
        let err = AgentMeError::remote(500, None);
        assert_eq!(err.to_string(), "Remote service error (HTTP 500)");
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AgentMeError = io.into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_only_config_errors_are_unrecoverable() {
        assert!(AgentMeError::Cancelled.is_recoverable());
        assert!(AgentMeError::malformed("no text").is_recoverable());
        assert!(!AgentMeError::config("bad toml").is_recoverable());
    }
}
