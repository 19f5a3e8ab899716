//! Client-side state: guest session id, sign-in, last known cart.
//!
//! Each concern is a small trait so the same flows run against in-memory
//! state (tests, embedding) or a file on disk (the CLI). Implementations use
//! interior locking and are shared behind `Arc`.

mod cart_cache;
mod file;
mod memory;

pub use cart_cache::{CART_TTL, MemoryCartCache};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

use vitrina_core::SessionId;

use crate::api::{ApiClient, AuthSession, Cart};

/// Errors reading or persisting client state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the state file failed.
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file is not valid JSON.
    #[error("state file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the lock.
    #[error("state lock poisoned")]
    Poisoned,
}

/// Guest session id storage.
///
/// The id exists only for visitors that added something to a cart before
/// signing in. It is created lazily and kept until a cart merge succeeds.
pub trait SessionStore: Send + Sync {
    /// The stored session id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn session_id(&self) -> Result<Option<SessionId>, StorageError>;

    /// Store `id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set_session_id(&self, id: &SessionId) -> Result<(), StorageError>;

    /// Forget the session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn clear_session_id(&self) -> Result<(), StorageError>;

    /// The stored session id, generating and storing one if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read or written.
    fn ensure_session_id(&self) -> Result<SessionId, StorageError>;
}

/// Sign-in storage: bearer token and the account it belongs to.
pub trait AuthStore: Send + Sync {
    /// The stored sign-in, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn auth(&self) -> Result<Option<AuthSession>, StorageError>;

    /// Store a sign-in, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set_auth(&self, auth: &AuthSession) -> Result<(), StorageError>;

    /// Forget the sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn clear_auth(&self) -> Result<(), StorageError>;
}

/// Last known cart, kept for a short freshness window.
pub trait CartCache: Send + Sync {
    /// The cached cart if still fresh.
    fn get(&self) -> Option<Cart>;

    /// Replace the cached cart.
    fn set(&self, cart: Cart);

    /// Force the next read to go to the API.
    fn invalidate(&self);
}

/// The three state containers, shared by every flow of one client.
#[derive(Clone)]
pub struct ClientState {
    pub sessions: Arc<dyn SessionStore>,
    pub auth: Arc<dyn AuthStore>,
    pub cart_cache: Arc<dyn CartCache>,
}

impl ClientState {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        auth: Arc<dyn AuthStore>,
        cart_cache: Arc<dyn CartCache>,
    ) -> Self {
        Self {
            sessions,
            auth,
            cart_cache,
        }
    }

    /// Fresh in-memory state.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            store,
            Arc::new(MemoryCartCache::new()),
        )
    }

    /// State persisted to `store`, with an in-memory cart cache.
    #[must_use]
    pub fn persistent(store: Arc<FileStore>) -> Self {
        Self::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            store,
            Arc::new(MemoryCartCache::new()),
        )
    }

    /// Whether a sign-in is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.auth.auth()?.is_some())
    }

    /// A view of `client` carrying the stored token and session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    pub fn identify(&self, client: &ApiClient) -> Result<ApiClient, StorageError> {
        let view = client.with_session(self.sessions.session_id()?);
        Ok(match self.auth.auth()? {
            Some(auth) => view.with_token(auth.token),
            None => view,
        })
    }
}
