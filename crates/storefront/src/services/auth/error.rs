//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vitrina_core::EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    AlreadyExists,

    /// The API refused the request for another reason (validation, weak
    /// password, ...).
    #[error("rejected ({code}): {message}")]
    Rejected {
        /// Machine-readable error code.
        code: String,
        /// Message suitable for the user.
        message: String,
    },

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// Transport or server failure.
    #[error("API error: {0}")]
    Api(ApiError),

    /// Client state could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { status: 401, .. } => Self::InvalidCredentials,
            ApiError::Api { status: 409, .. } => Self::AlreadyExists,
            ApiError::Api {
                status,
                code,
                message,
            } if (400..500).contains(&status) => Self::Rejected { code, message },
            other => Self::Api(other),
        }
    }
}
