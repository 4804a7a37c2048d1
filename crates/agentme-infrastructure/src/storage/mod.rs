//! Storage layer: atomic files and key-value backends.

mod atomic_file;
mod key_value;

pub use atomic_file::AtomicFile;
pub use key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
