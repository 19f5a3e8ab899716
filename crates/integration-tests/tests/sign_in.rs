//! Login and registration hand the guest cart over to the account.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrina_core::SessionId;
use vitrina_integration_tests::{auth_payload, cart, client, envelope, error_body};
use vitrina_storefront::api::{Cart, SESSION_HEADER};
use vitrina_storefront::{AuthError, AuthFlow, ClientState, FileStore, MergeOutcome};

fn password() -> SecretString {
    SecretString::from("correct horse battery staple")
}

/// In-memory state of a guest who already has a cart session.
fn guest_state(session_id: &SessionId) -> ClientState {
    let state = ClientState::in_memory();
    state
        .sessions
        .set_session_id(session_id)
        .expect("set session id");
    state
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_payload(
            "tok-1",
            "u1",
            "ana@example.com",
        )))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Successful merge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_merges_guest_cart_once_and_forgets_the_session() {
    let server = MockServer::start().await;
    let session_id = SessionId::generate();
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .and(bearer_token("tok-1"))
        .and(header(SESSION_HEADER, session_id.as_str()))
        .and(body_json(json!({ "sessionId": session_id.as_str() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(cart(
            "c-user",
            Some("u1"),
            None,
            &["p1", "p2"],
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let state = guest_state(&session_id);
    let flow = AuthFlow::new(client(&server), state.clone());

    let outcome = flow
        .login("ana@example.com", password())
        .await
        .expect("login");

    match &outcome.merge {
        MergeOutcome::Merged(cart) => assert_eq!(cart.item_count, 2),
        other => panic!("expected merge, got {other:?}"),
    }
    assert_eq!(outcome.user.email.as_str(), "ana@example.com");
    assert_eq!(state.sessions.session_id().expect("read"), None);
    assert!(state.is_authenticated().expect("read"));
    assert!(state.cart_cache.get().is_none());
}

#[tokio::test]
async fn registration_merges_guest_cart() {
    let server = MockServer::start().await;
    let session_id = SessionId::generate();

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_partial_json(
            json!({ "email": "ana@example.com", "fullName": "Ana Gómez" }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(auth_payload(
            "tok-new",
            "u2",
            "ana@example.com",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .and(bearer_token("tok-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(cart(
            "c-new",
            Some("u2"),
            None,
            &["p1"],
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let state = guest_state(&session_id);
    let flow = AuthFlow::new(client(&server), state.clone());

    let outcome = flow
        .register("ana@example.com", password(), "Ana Gómez")
        .await
        .expect("register");

    assert!(outcome.merge.is_merged());
    assert_eq!(state.sessions.session_id().expect("read"), None);
}

// ---------------------------------------------------------------------------
// No merge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_without_guest_session_skips_merge() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = ClientState::in_memory();
    let flow = AuthFlow::new(client(&server), state.clone());

    let outcome = flow
        .login("ana@example.com", password())
        .await
        .expect("login");

    assert_eq!(outcome.merge, MergeOutcome::NoSession);
    assert!(state.is_authenticated().expect("read"));
}

#[tokio::test]
async fn rejected_login_leaves_guest_state_alone() {
    let server = MockServer::start().await;
    let session_id = SessionId::generate();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(error_body("INVALID_CREDENTIALS", "Invalid credentials")),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = guest_state(&session_id);
    let flow = AuthFlow::new(client(&server), state.clone());

    let err = flow
        .login("ana@example.com", password())
        .await
        .expect_err("401");

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(state.sessions.session_id().expect("read"), Some(session_id));
    assert!(!state.is_authenticated().expect("read"));
}

#[tokio::test]
async fn malformed_email_sends_nothing() {
    let server = MockServer::start().await;
    let state = guest_state(&SessionId::generate());
    let flow = AuthFlow::new(client(&server), state);

    let err = flow
        .login("not-an-email", password())
        .await
        .expect_err("invalid email");

    assert!(matches!(err, AuthError::InvalidEmail(_)));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

// ---------------------------------------------------------------------------
// Merge failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_merge_keeps_user_signed_in_and_session_for_retry() {
    let server = MockServer::start().await;
    let session_id = SessionId::generate();
    mount_login(&server).await;

    // First merge fails, the next one succeeds
    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_body("INTERNAL", "merge exploded")),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .and(body_json(json!({ "sessionId": session_id.as_str() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(cart(
            "c-user",
            Some("u1"),
            None,
            &["p1"],
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let state = guest_state(&session_id);
    let stale: Cart = serde_json::from_value(cart("c-guest", None, Some(session_id.as_str()), &["p1"]))
        .expect("cart fixture");
    state.cart_cache.set(stale);

    let flow = AuthFlow::new(client(&server), state.clone());

    let outcome = flow
        .login("ana@example.com", password())
        .await
        .expect("login still succeeds");
    assert_eq!(outcome.merge, MergeOutcome::Failed);
    assert!(state.is_authenticated().expect("read"));
    assert_eq!(
        state.sessions.session_id().expect("read"),
        Some(session_id.clone())
    );
    assert!(state.cart_cache.get().is_none());

    let retry = flow
        .login("ana@example.com", password())
        .await
        .expect("second login");
    assert!(retry.merge.is_merged());
    assert_eq!(state.sessions.session_id().expect("read"), None);
}

// ---------------------------------------------------------------------------
// Logout and persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_keeps_guest_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let state = ClientState::in_memory();
    let flow = AuthFlow::new(client(&server), state.clone());
    flow.login("ana@example.com", password())
        .await
        .expect("login");

    let session_id = state.sessions.ensure_session_id().expect("ensure");
    flow.logout().await.expect("logout");

    assert!(!state.is_authenticated().expect("read"));
    assert_eq!(state.sessions.session_id().expect("read"), Some(session_id));
    assert!(flow.current_user().expect("read").is_none());
}

#[tokio::test]
async fn guest_session_survives_restart_and_merges_at_login() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state_path = dir.path().join("state.json");

    // First run: a guest gets a session id
    let session_id = {
        let store = Arc::new(FileStore::open(&state_path).expect("open"));
        let state = ClientState::persistent(store);
        state.sessions.ensure_session_id().expect("ensure")
    };

    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/cart/merge"))
        .and(body_json(json!({ "sessionId": session_id.as_str() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(cart(
            "c-user",
            Some("u1"),
            None,
            &["p1"],
        ))))
        .expect(1)
        .mount(&server)
        .await;

    // Second run: sign in from a fresh process
    let store = Arc::new(FileStore::open(&state_path).expect("reopen"));
    let state = ClientState::persistent(store);
    let flow = AuthFlow::new(client(&server), state);
    let outcome = flow
        .login("ana@example.com", password())
        .await
        .expect("login");
    assert!(outcome.merge.is_merged());

    // Third run: signed in, no guest session
    let store = Arc::new(FileStore::open(&state_path).expect("reopen"));
    let state = ClientState::persistent(store);
    assert!(state.is_authenticated().expect("read"));
    assert_eq!(state.sessions.session_id().expect("read"), None);
}
