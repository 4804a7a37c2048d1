pub mod chat;
pub mod key;
pub mod persona;
pub mod prompt;
