//! Application state shared by front ends.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::VitrinaConfig;
use crate::error::AppError;
use crate::services::{AuthFlow, CartService, Checkout};
use crate::session::{ClientState, FileStore, StorageError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("API client: {0}")]
    Api(#[from] ApiError),
    #[error("client state: {0}")]
    Storage(#[from] StorageError),
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Api(e) => Self::Api(e),
            StateError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Configuration, API client and client state for one storefront visitor.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: VitrinaConfig,
    client: ApiClient,
    client_state: ClientState,
    auth: AuthFlow,
}

impl AppState {
    /// Create the state with client state persisted at `config.state_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the state file
    /// cannot be read.
    pub fn new(config: VitrinaConfig) -> Result<Self, StateError> {
        let store = Arc::new(FileStore::open(&config.state_path)?);
        Self::with_client_state(config, ClientState::persistent(store)).map_err(StateError::Api)
    }

    /// Create the state over caller-provided client state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_client_state(
        config: VitrinaConfig,
        client_state: ClientState,
    ) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.api)?;
        let auth = AuthFlow::new(client.clone(), client_state.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                client_state,
                auth,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &VitrinaConfig {
        &self.inner.config
    }

    /// The anonymous API client.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// A client carrying the stored token and guest session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the client state cannot be read.
    pub fn identified_client(&self) -> Result<ApiClient, StorageError> {
        self.inner.client_state.identify(&self.inner.client)
    }

    #[must_use]
    pub fn client_state(&self) -> &ClientState {
        &self.inner.client_state
    }

    #[must_use]
    pub fn auth(&self) -> &AuthFlow {
        &self.inner.auth
    }

    #[must_use]
    pub fn cart(&self) -> CartService {
        CartService::new(self.inner.client.clone(), self.inner.client_state.clone())
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.inner.client.clone(), self.inner.client_state.clone())
    }
}
