//! Account endpoints.

use reqwest::Method;
use tracing::instrument;

use super::ApiError;
use super::client::ApiClient;
use super::types::{
    AuthPayload, AuthSession, ChangePasswordInput, LoginInput, MessageResponse, RegisterInput,
    UpdateProfileInput, UserProfile,
};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the API request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: &LoginInput) -> Result<AuthSession, ApiError> {
        let payload: AuthPayload = self
            .send_data(Method::POST, &["api", "auth", "login"], Some(input))
            .await?;
        Ok(payload.into())
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or the API request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: &RegisterInput) -> Result<AuthSession, ApiError> {
        let payload: AuthPayload = self
            .send_data(Method::POST, &["api", "auth", "register"], Some(input))
            .await?;
        Ok(payload.into())
    }

    /// Get the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or invalid, or the API request fails.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_data(&["api", "auth", "me"]).await
    }

    /// Update the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the API request fails.
    #[instrument(skip(self, input))]
    pub async fn update_me(&self, input: &UpdateProfileInput) -> Result<UserProfile, ApiError> {
        self.send_data(Method::PUT, &["api", "auth", "me"], Some(input))
            .await
    }

    /// Change the signed-in account's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the API request fails.
    #[instrument(skip(self, input))]
    pub async fn change_password(
        &self,
        input: &ChangePasswordInput,
    ) -> Result<MessageResponse, ApiError> {
        // Not wrapped in a data envelope
        self.send(Method::PUT, &["api", "auth", "password"], &[], Some(input))
            .await?
            .ok_or_else(|| ApiError::EmptyBody("api/auth/password".to_string()))
    }
}
