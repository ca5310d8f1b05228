use crate::models::Session;
use crate::store::storage::{KeyValueStorage, StorageError};
use log::{debug, warn};
use std::sync::Arc;

/// Persists the active session as a JSON blob under one key
///
/// Unreadable, malformed or token-less blobs load as "no session"; the
/// stored shape is not versioned.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize and write the session
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let blob = serde_json::to_string(session)?;
        self.storage.set(&self.key, &blob)
    }

    /// Read the persisted session, if a usable one exists
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let blob = match self.storage.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read persisted session: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&blob) {
            Ok(session) if session.has_access_token() => Some(session),
            Ok(_) => {
                debug!("Persisted session has no access token, ignoring it");
                None
            }
            Err(e) => {
                debug!("Persisted session is malformed, ignoring it: {e}");
                None
            }
        }
    }

    /// Remove the persisted session
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;
    use crate::testing::fixtures::TestFixtures;

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone(), "test/session");
        (storage, store)
    }

    #[test]
    fn test_save_then_load_is_field_for_field_equal() {
        let (_, store) = store();
        let session = TestFixtures::session();

        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn test_empty_token_loads_as_none() {
        let (_, store) = store();
        let mut session = TestFixtures::session();
        session.access_token = String::new();

        store.save(&session).unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_malformed_blob_loads_as_none() {
        let (storage, store) = store();
        storage.set("test/session", "{not json").unwrap();
        assert_eq!(store.load(), None);

        storage.set("test/session", r#"{"access_token":"tok"}"#).unwrap();
        assert_eq!(store.load(), None, "blob without a user is unusable");
    }

    #[test]
    fn test_clear_removes_blob() {
        let (storage, store) = store();
        store.save(&TestFixtures::session()).unwrap();
        store.clear().unwrap();

        assert!(storage.get("test/session").unwrap().is_none());
        assert!(store.load().is_none());
    }
}
