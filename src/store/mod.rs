//! Session persistence
//!
//! - [`storage`] - key/value storage backends (file-backed and in-memory)
//! - [`session_store`] - the session blob stored under one fixed key

pub mod session_store;
pub mod storage;

pub use session_store::SessionStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
