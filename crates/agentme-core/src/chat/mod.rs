//! Chat domain module: transcript messages and the remote client interface.

mod client;
mod message;

pub use client::{ChatClient, USER_QUESTION_SEPARATOR, compose_request_text};
pub use message::{ChatMessage, MessageRole};
