//! Remote chat for AgentMe: the Gemini REST client and the chat session that
//! drives it.

pub mod gemini_client;
pub mod session;

pub use gemini_client::GeminiClient;
pub use session::ChatSession;
