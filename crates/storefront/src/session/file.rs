//! Client state persisted as a JSON document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vitrina_core::SessionId;

use super::{AuthStore, SessionStore, StorageError};
use crate::api::{AuthSession, UserProfile};

/// On-disk layout of the state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth: Option<PersistedAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedAuth {
    token: String,
    user: UserProfile,
}

impl From<&AuthSession> for PersistedAuth {
    fn from(auth: &AuthSession) -> Self {
        Self {
            token: auth.token.expose_secret().to_string(),
            user: auth.user.clone(),
        }
    }
}

impl From<&PersistedAuth> for AuthSession {
    fn from(auth: &PersistedAuth) -> Self {
        Self {
            token: SecretString::from(auth.token.clone()),
            user: auth.user.clone(),
        }
    }
}

/// Client state kept in a JSON file so it survives between runs.
///
/// The whole document is loaded on open and rewritten on every change.
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    doc: RwLock<StateDocument>,
}

impl FileStore {
    /// Open the state file at `path`, starting empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => StateDocument::default(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StateDocument::default(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), "Opened client state");
        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&StateDocument) -> T) -> Result<T, StorageError> {
        let doc = self.doc.read().map_err(|_| StorageError::Poisoned)?;
        Ok(f(&doc))
    }

    /// Apply `f` to a copy of the document, persist it, then swap it in.
    ///
    /// On a failed write the in-memory document is left as it was, so
    /// memory never runs ahead of disk.
    fn update<T>(&self, f: impl FnOnce(&mut StateDocument) -> T) -> Result<T, StorageError> {
        let mut doc = self.doc.write().map_err(|_| StorageError::Poisoned)?;
        let mut next = doc.clone();
        let out = f(&mut next);
        self.persist(&next)?;
        *doc = next;
        Ok(out)
    }

    fn persist(&self, doc: &StateDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn session_id(&self) -> Result<Option<SessionId>, StorageError> {
        self.read(|doc| doc.session_id.clone())
    }

    fn set_session_id(&self, id: &SessionId) -> Result<(), StorageError> {
        self.update(|doc| doc.session_id = Some(id.clone()))
    }

    fn clear_session_id(&self) -> Result<(), StorageError> {
        self.update(|doc| doc.session_id = None)
    }

    fn ensure_session_id(&self) -> Result<SessionId, StorageError> {
        if let Some(id) = self.session_id()? {
            return Ok(id);
        }
        self.update(|doc| doc.session_id.get_or_insert_with(SessionId::generate).clone())
    }
}

impl AuthStore for FileStore {
    fn auth(&self) -> Result<Option<AuthSession>, StorageError> {
        self.read(|doc| doc.auth.as_ref().map(AuthSession::from))
    }

    fn set_auth(&self, auth: &AuthSession) -> Result<(), StorageError> {
        self.update(|doc| doc.auth = Some(PersistedAuth::from(auth)))
    }

    fn clear_auth(&self) -> Result<(), StorageError> {
        self.update(|doc| doc.auth = None)
    }
}
