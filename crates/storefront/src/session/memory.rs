use std::sync::RwLock;

use vitrina_core::SessionId;

use super::{AuthStore, SessionStore, StorageError};
use crate::api::AuthSession;

/// In-process client state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session_id: RwLock<Option<SessionId>>,
    auth: RwLock<Option<AuthSession>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a guest session id.
    #[must_use]
    pub fn with_session_id(id: SessionId) -> Self {
        Self {
            session_id: RwLock::new(Some(id)),
            auth: RwLock::new(None),
        }
    }
}

impl SessionStore for MemoryStore {
    fn session_id(&self) -> Result<Option<SessionId>, StorageError> {
        Ok(self
            .session_id
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .clone())
    }

    fn set_session_id(&self, id: &SessionId) -> Result<(), StorageError> {
        *self.session_id.write().map_err(|_| StorageError::Poisoned)? = Some(id.clone());
        Ok(())
    }

    fn clear_session_id(&self) -> Result<(), StorageError> {
        *self.session_id.write().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }

    fn ensure_session_id(&self) -> Result<SessionId, StorageError> {
        let mut slot = self.session_id.write().map_err(|_| StorageError::Poisoned)?;
        Ok(slot.get_or_insert_with(SessionId::generate).clone())
    }
}

impl AuthStore for MemoryStore {
    fn auth(&self) -> Result<Option<AuthSession>, StorageError> {
        Ok(self.auth.read().map_err(|_| StorageError::Poisoned)?.clone())
    }

    fn set_auth(&self, auth: &AuthSession) -> Result<(), StorageError> {
        *self.auth.write().map_err(|_| StorageError::Poisoned)? = Some(auth.clone());
        Ok(())
    }

    fn clear_auth(&self) -> Result<(), StorageError> {
        *self.auth.write().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};
    use vitrina_core::{Email, UserRole};

    use super::*;
    use crate::api::UserProfile;

    #[test]
    fn test_ensure_creates_once() {
        let store = MemoryStore::new();
        assert!(store.session_id().unwrap().is_none());

        let first = store.ensure_session_id().unwrap();
        let second = store.ensure_session_id().unwrap();

        assert_eq!(first, second);
        assert!(first.is_generated());
        assert_eq!(store.session_id().unwrap(), Some(first));
    }

    #[test]
    fn test_ensure_keeps_existing() {
        let existing = SessionId::parse("s1").unwrap();
        let store = MemoryStore::with_session_id(existing.clone());
        assert_eq!(store.ensure_session_id().unwrap(), existing);
    }

    #[test]
    fn test_clear_session_id() {
        let store = MemoryStore::with_session_id(SessionId::parse("s1").unwrap());
        store.clear_session_id().unwrap();
        assert!(store.session_id().unwrap().is_none());
    }

    #[test]
    fn test_auth_roundtrip_and_clear() {
        let store = MemoryStore::new();
        let auth = AuthSession {
            token: SecretString::from("tok"),
            user: UserProfile {
                id: "u1".into(),
                email: Email::parse("ana@example.com").unwrap(),
                full_name: "Ana".to_string(),
                role: UserRole::Buyer,
            },
        };

        store.set_auth(&auth).unwrap();
        let stored = store.auth().unwrap().unwrap();
        assert_eq!(stored.token.expose_secret(), "tok");
        assert_eq!(stored.user.full_name, "Ana");

        store.clear_auth().unwrap();
        assert!(store.auth().unwrap().is_none());
    }
}
