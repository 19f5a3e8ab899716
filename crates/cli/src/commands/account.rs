//! Sign-in, registration and profile commands.

use secrecy::SecretString;
use serde::Serialize;

use vitrina_core::Email;
use vitrina_storefront::api::{Cart, UpdateProfileInput, UserProfile};
use vitrina_storefront::{AppError, AppState, AuthError, AuthOutcome, MergeOutcome};

use crate::output::emit;

/// Printed after login or registration.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedIn<'a> {
    user: &'a UserProfile,
    cart_merge: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cart: Option<&'a Cart>,
}

impl<'a> From<&'a AuthOutcome> for SignedIn<'a> {
    fn from(outcome: &'a AuthOutcome) -> Self {
        let (cart_merge, cart) = match &outcome.merge {
            MergeOutcome::Merged(cart) => ("merged", Some(cart)),
            MergeOutcome::NoSession => ("no_session", None),
            MergeOutcome::Failed => ("failed", None),
        };
        Self {
            user: &outcome.user,
            cart_merge,
            cart,
        }
    }
}

pub async fn login(state: &AppState, email: &str, password: String) -> Result<(), AppError> {
    let outcome = state
        .auth()
        .login(email, SecretString::from(password))
        .await?;
    emit(&SignedIn::from(&outcome))
}

pub async fn register(
    state: &AppState,
    email: &str,
    full_name: &str,
    password: String,
) -> Result<(), AppError> {
    let outcome = state
        .auth()
        .register(email, SecretString::from(password), full_name)
        .await?;
    emit(&SignedIn::from(&outcome))
}

pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.auth().logout().await?;
    emit(&serde_json::json!({ "signedOut": true }))
}

pub async fn profile(state: &AppState) -> Result<(), AppError> {
    let user = state.auth().profile().await?;
    emit(&user)
}

pub async fn update_profile(
    state: &AppState,
    full_name: Option<String>,
    email: Option<&str>,
) -> Result<(), AppError> {
    if full_name.is_none() && email.is_none() {
        return Err(AppError::InvalidInput(
            "Nothing to update, give --full-name or --email".to_string(),
        ));
    }

    let input = UpdateProfileInput {
        full_name,
        email: email
            .map(Email::parse)
            .transpose()
            .map_err(AuthError::from)?,
    };
    let user = state.auth().update_profile(&input).await?;
    emit(&user)
}

pub async fn change_password(state: &AppState, current: String, new: String) -> Result<(), AppError> {
    let response = state
        .auth()
        .change_password(SecretString::from(current), SecretString::from(new))
        .await?;
    emit(&response)
}
