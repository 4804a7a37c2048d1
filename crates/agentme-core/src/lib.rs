pub mod chat;
pub mod config;
pub mod credential;
pub mod error;
pub mod persona;
pub mod prompt;

// Re-export common error type
pub use error::{AgentMeError, Result};
