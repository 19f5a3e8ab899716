//! Sign-in and the guest cart hand-over.
//!
//! A visitor may fill a cart before signing in. That cart lives on the
//! backend under the guest session id. Once login or registration succeeds
//! the guest cart is merged into the account's cart:
//!
//! - no stored session id: nothing to merge
//! - merge succeeds: the session id is deleted
//! - merge fails: the failure is logged and swallowed, the session id stays
//!   so the next sign-in tries again
//!
//! Either way the cached cart is dropped. A failed sign-in never merges.

mod error;

pub use error::AuthError;

use std::future::Future;

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use vitrina_core::{Email, SessionId};

use crate::api::{
    ApiClient, ApiError, AuthSession, Cart, ChangePasswordInput, LoginInput, MessageResponse,
    RegisterInput, UpdateProfileInput, UserProfile,
};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::session::ClientState;

/// Issues the cart merge request.
///
/// Implemented by [`ApiClient`]; tests substitute their own.
pub trait CartMerger: Send + Sync {
    /// Merge the guest cart of `session_id` into the cart of the account
    /// that owns `token`.
    fn merge_cart(
        &self,
        token: &SecretString,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Cart, ApiError>> + Send;
}

/// What happened to the guest cart after a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The guest cart was merged; this is the account's cart now.
    Merged(Cart),
    /// There was no guest session to merge.
    NoSession,
    /// The merge was attempted and failed. The session id was kept.
    Failed,
}

impl MergeOutcome {
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: UserProfile,
    pub merge: MergeOutcome,
}

/// Run the post-sign-in cart merge.
///
/// Never fails: merge and storage errors are logged and reported as
/// [`MergeOutcome::Failed`].
pub async fn reconcile<M: CartMerger>(
    merger: &M,
    token: &SecretString,
    state: &ClientState,
) -> MergeOutcome {
    let outcome = match state.sessions.session_id() {
        Ok(None) => MergeOutcome::NoSession,
        Ok(Some(session_id)) => match merger.merge_cart(token, &session_id).await {
            Ok(cart) => {
                if let Err(e) = state.sessions.clear_session_id() {
                    warn!(error = %e, "Cart merged but guest session id could not be cleared");
                }
                info!(
                    session_id = %session_id,
                    item_count = cart.item_count,
                    "Merged guest cart"
                );
                MergeOutcome::Merged(cart)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    session_id = %session_id,
                    "Guest cart merge failed, keeping session id"
                );
                MergeOutcome::Failed
            }
        },
        Err(e) => {
            warn!(error = %e, "Could not read guest session id, skipping cart merge");
            MergeOutcome::Failed
        }
    };

    state.cart_cache.invalidate();
    outcome
}

/// Sign-in flows bound to one client state.
pub struct AuthFlow<M = ApiClient> {
    client: ApiClient,
    merger: M,
    state: ClientState,
    // One sign-in at a time per client state
    gate: Mutex<()>,
}

impl AuthFlow<ApiClient> {
    #[must_use]
    pub fn new(client: ApiClient, state: ClientState) -> Self {
        Self::with_merger(client.clone(), state, client)
    }
}

impl<M: CartMerger> AuthFlow<M> {
    /// Use `merger` instead of the API client for the cart merge.
    #[must_use]
    pub fn with_merger(client: ApiClient, state: ClientState, merger: M) -> Self {
        Self {
            client,
            merger,
            state,
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Sign in with email and password, then merge any guest cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `AuthError::InvalidCredentials` if the API rejects the credentials,
    /// or another error if the request or storing the sign-in fails. No
    /// merge is attempted on error.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<AuthOutcome, AuthError> {
        let input = LoginInput {
            email: Email::parse(email)?,
            password,
        };

        let _guard = self.gate.lock().await;
        let session = self.state.identify(&self.client)?.login(&input).await?;
        self.complete(session).await
    }

    /// Create an account, sign in, then merge any guest cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `AuthError::AlreadyExists` if the email is taken, or another error if
    /// the request or storing the sign-in fails. No merge is attempted on
    /// error.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: SecretString,
        full_name: &str,
    ) -> Result<AuthOutcome, AuthError> {
        let input = RegisterInput {
            email: Email::parse(email)?,
            password,
            full_name: full_name.trim().to_string(),
        };

        let _guard = self.gate.lock().await;
        let session = self
            .state
            .identify(&self.client)?
            .register(&input)
            .await?;
        self.complete(session).await
    }

    async fn complete(&self, session: AuthSession) -> Result<AuthOutcome, AuthError> {
        self.state.auth.set_auth(&session)?;
        set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
        add_breadcrumb("auth", "Signed in", None);

        let merge = reconcile(&self.merger, &session.token, &self.state).await;
        Ok(AuthOutcome {
            user: session.user,
            merge,
        })
    }

    /// Forget the sign-in and the cached cart.
    ///
    /// The guest session id is left as is; a new one is only created when
    /// the visitor next adds something to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the client state cannot be written.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _guard = self.gate.lock().await;
        self.state.auth.clear_auth()?;
        self.state.cart_cache.invalidate();
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);
        Ok(())
    }

    /// The stored account, without asking the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the client state cannot be read.
    pub fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.state.auth.auth()?.map(|auth| auth.user))
    }

    fn signed_in(&self) -> Result<(ApiClient, AuthSession), AuthError> {
        let auth = self.state.auth.auth()?.ok_or(AuthError::NotAuthenticated)?;
        Ok((self.client.with_token(auth.token.clone()), auth))
    }

    /// Fetch the account from the API and refresh the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in, or an
    /// error if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, AuthError> {
        let (client, mut auth) = self.signed_in()?;
        let user = client.me().await?;
        auth.user = user.clone();
        self.state.auth.set_auth(&auth)?;
        Ok(user)
    }

    /// Update the account and refresh the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in, or an
    /// error if the update is rejected.
    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        input: &UpdateProfileInput,
    ) -> Result<UserProfile, AuthError> {
        let (client, mut auth) = self.signed_in()?;
        let user = client.update_me(input).await?;
        auth.user = user.clone();
        self.state.auth.set_auth(&auth)?;
        Ok(user)
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in,
    /// `AuthError::InvalidCredentials` if the current password is wrong, or
    /// another error if the request fails.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        current_password: SecretString,
        new_password: SecretString,
    ) -> Result<MessageResponse, AuthError> {
        let (client, _) = self.signed_in()?;
        let input = ChangePasswordInput {
            current_password,
            new_password,
        };
        Ok(client.change_password(&input).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    use chrono::Utc;
    use rust_decimal::Decimal;
    use secrecy::ExposeSecret;
    use url::Url;
    use vitrina_core::UserRole;

    use super::*;
    use crate::config::ApiConfig;
    use crate::session::{FileStore, MemoryCartCache, MemoryStore, SessionStore};

    fn cart(id: &str) -> Cart {
        Cart {
            id: id.into(),
            user_id: Some("u1".into()),
            session_id: None,
            items: Vec::new(),
            item_count: 2,
            subtotal: Decimal::new(3000, 0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Records merge calls and answers with a fixed result.
    struct StubMerger {
        calls: StdMutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl StubMerger {
        fn succeeding() -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CartMerger for StubMerger {
        fn merge_cart(
            &self,
            token: &SecretString,
            session_id: &SessionId,
        ) -> impl Future<Output = Result<Cart, ApiError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((token.expose_secret().to_string(), session_id.to_string()));
            let result = if self.fail {
                Err(ApiError::from_response(
                    500,
                    r#"{"error":{"code":"INTERNAL","message":"boom"}}"#,
                ))
            } else {
                Ok(cart("user-cart"))
            };
            async move { result }
        }
    }

    fn state_with_session(id: Option<&str>) -> ClientState {
        let store = Arc::new(
            id.map_or_else(MemoryStore::new, |id| {
                MemoryStore::with_session_id(SessionId::parse(id).unwrap())
            }),
        );
        let state = ClientState::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            store,
            Arc::new(MemoryCartCache::new()),
        );
        state.cart_cache.set(cart("stale"));
        state
    }

    fn token() -> SecretString {
        SecretString::from("tok-1")
    }

    #[tokio::test]
    async fn test_reconcile_merges_stored_session_once_and_clears_it() {
        let merger = StubMerger::succeeding();
        let state = state_with_session(Some("s1"));

        let outcome = reconcile(&merger, &token(), &state).await;

        assert_eq!(
            merger.calls(),
            vec![("tok-1".to_string(), "s1".to_string())]
        );
        assert!(outcome.is_merged());
        assert!(state.sessions.session_id().unwrap().is_none());
        assert!(state.cart_cache.get().is_none());
    }

    #[tokio::test]
    async fn test_reconcile_keeps_session_when_clearing_it_cannot_be_saved() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let store = Arc::new(FileStore::open(blocker.join("state.json")).unwrap());
        store
            .set_session_id(&SessionId::parse("s1").unwrap())
            .unwrap();
        let state = ClientState::persistent(Arc::clone(&store));

        std::fs::remove_dir_all(&blocker).unwrap();
        std::fs::write(&blocker, "").unwrap();

        let merger = StubMerger::succeeding();
        let outcome = reconcile(&merger, &token(), &state).await;

        assert!(outcome.is_merged());
        assert_eq!(merger.calls().len(), 1);
        // Memory still agrees with what the last successful write left on disk
        assert_eq!(
            state.sessions.session_id().unwrap(),
            Some(SessionId::parse("s1").unwrap())
        );
    }

    #[tokio::test]
    async fn test_reconcile_failure_is_swallowed_and_keeps_session() {
        let merger = StubMerger::failing();
        let state = state_with_session(Some("s1"));

        let outcome = reconcile(&merger, &token(), &state).await;

        assert_eq!(merger.calls().len(), 1);
        assert_eq!(outcome, MergeOutcome::Failed);
        assert_eq!(
            state.sessions.session_id().unwrap().unwrap().as_str(),
            "s1"
        );
        assert!(state.cart_cache.get().is_none());
    }

    #[tokio::test]
    async fn test_reconcile_without_session_skips_merge() {
        let merger = StubMerger::succeeding();
        let state = state_with_session(None);

        let outcome = reconcile(&merger, &token(), &state).await;

        assert!(merger.calls().is_empty());
        assert_eq!(outcome, MergeOutcome::NoSession);
        assert!(state.cart_cache.get().is_none());
    }

    #[tokio::test]
    async fn test_logout_keeps_session_id() {
        let client = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_secs(1),
            user_agent: "vitrina-test".to_string(),
        })
        .unwrap();
        let state = state_with_session(Some("s1"));
        state
            .auth
            .set_auth(&AuthSession {
                token: token(),
                user: UserProfile {
                    id: "u1".into(),
                    email: Email::parse("ana@example.com").unwrap(),
                    full_name: "Ana".to_string(),
                    role: UserRole::Buyer,
                },
            })
            .unwrap();
        let flow = AuthFlow::with_merger(client, state, StubMerger::succeeding());

        assert!(flow.current_user().unwrap().is_some());
        flow.logout().await.unwrap();

        assert!(flow.current_user().unwrap().is_none());
        assert!(flow.state().cart_cache.get().is_none());
        assert_eq!(
            flow.state().sessions.session_id().unwrap().unwrap().as_str(),
            "s1"
        );
    }

    #[tokio::test]
    async fn test_invalid_email_fails_before_any_request() {
        let client = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_secs(1),
            user_agent: "vitrina-test".to_string(),
        })
        .unwrap();
        let merger = StubMerger::succeeding();
        let flow = AuthFlow::with_merger(client, state_with_session(Some("s1")), merger);

        let err = flow
            .login("not-an-email", SecretString::from("pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert!(flow.merger.calls().is_empty());
    }
}
