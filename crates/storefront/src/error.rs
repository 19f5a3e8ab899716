//! Unified error handling with Sentry integration.
//!
//! Front ends convert every failure into `AppError`, show
//! [`AppError::user_message`] and call [`AppError::report`], which captures
//! server-class errors to Sentry.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AuthError, ServiceError};
use crate::session::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storefront API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Client state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad input from the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Command output could not be serialized or written.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Api(e) => Self::Api(e),
            ServiceError::Storage(e) => Self::Storage(e),
        }
    }
}

impl AppError {
    /// Whether the failure is on our side or the backend's, not the user's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Api(e) | Self::Auth(AuthError::Api(e)) => api_is_server_error(e),
            Self::Storage(_) | Self::Auth(AuthError::Storage(_)) => true,
            _ => false,
        }
    }

    /// Message safe to show to the user.
    ///
    /// Internal details (URLs, transport errors, parse errors) are never
    /// included.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Api(e) => api_user_message(e),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::AlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::Rejected { message, .. } => message.clone(),
                AuthError::NotAuthenticated => "You need to sign in first".to_string(),
                AuthError::Api(e) => api_user_message(e),
                AuthError::Storage(_) => "Could not save local session state".to_string(),
            },
            Self::Storage(_) => "Could not save local session state".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Output(_) => "Could not write output".to_string(),
        }
    }

    /// Capture server-class errors to Sentry.
    ///
    /// Returns the Sentry event id when the error was captured.
    pub fn report(&self) -> Option<sentry::types::Uuid> {
        if !self.is_server_error() {
            return None;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Command error"
        );
        Some(event_id)
    }
}

const fn api_is_server_error(err: &ApiError) -> bool {
    match err {
        ApiError::Api { status, .. } => *status >= 500,
        ApiError::RateLimited(_) => false,
        ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_) | ApiError::EmptyBody(_) => {
            true
        }
    }
}

fn api_user_message(err: &ApiError) -> String {
    match err {
        ApiError::Api { status: 404, .. } => "Not found".to_string(),
        ApiError::Api {
            status, message, ..
        } if (400..500).contains(status) => message.clone(),
        ApiError::RateLimited(secs) => {
            format!("Too many requests, try again in {secs} seconds")
        }
        _ => "The store is unavailable right now, please try again later".to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            code: "CODE".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::InvalidInput("quantity must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: quantity must be positive");
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = AppError::Api(api(502, "upstream db timeout at 10.0.0.3"));
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("10.0.0.3"));

        let err = AppError::Api(ApiError::InvalidUrl("http://internal".to_string()));
        assert!(!err.user_message().contains("internal"));
    }

    #[test]
    fn test_user_message_passes_client_errors_through() {
        let err = AppError::Api(api(422, "Stock insuficiente"));
        assert!(!err.is_server_error());
        assert_eq!(err.user_message(), "Stock insuficiente");

        let err = AppError::Api(api(404, "Product p9 not found"));
        assert_eq!(err.user_message(), "Not found");
    }

    #[test]
    fn test_auth_user_messages() {
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).user_message(),
            "Invalid email or password"
        );
        assert_eq!(
            AppError::Auth(AuthError::NotAuthenticated).user_message(),
            "You need to sign in first"
        );
        assert!(!AppError::Auth(AuthError::InvalidCredentials).is_server_error());
        assert!(AppError::Auth(AuthError::Api(api(500, "boom"))).is_server_error());
    }

    #[test]
    fn test_service_error_conversion() {
        let err: AppError = ServiceError::Storage(StorageError::Poisoned).into();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_client_errors_are_not_reported() {
        assert!(AppError::Api(api(400, "bad")).report().is_none());
        assert!(AppError::Api(ApiError::RateLimited(3)).report().is_none());
    }
}
