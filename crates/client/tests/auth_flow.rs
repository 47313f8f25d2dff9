//! Sign-up, sign-in, token persistence and session expiry against the fake API.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use sprout_client::{Action, Alert, ClientContext, ClientError, DeviceStorage};
use sprout_core::error::CoreError;
use sprout_core::models::Credentials;

use common::{FakeApi, FakeState, TEST_TOKEN};

fn with_user(email: &str, password: &str) -> FakeState {
    let mut state = FakeState::default().with_catalog();
    state.users.insert(email.to_string(), password.to_string());
    state
}

#[tokio::test]
async fn login_persists_token_and_authorizes_requests() {
    let api = FakeApi::spawn(with_user("grower@example.com", "secret")).await;
    let (ctx, storage) = api.context().await;

    ctx.auth()
        .login(&Credentials::new("grower@example.com", "secret"))
        .await
        .unwrap();

    assert!(ctx.auth().is_authenticated().await);
    let stored = storage.get_item("token").await.unwrap();
    assert!(stored.unwrap().contains("token-grower@example.com"));

    ctx.lots().list_lots().await.unwrap();
    let calls = api.requests_to("GET", "/lots/");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some("Bearer token-grower@example.com")
    );
}

#[tokio::test]
async fn token_survives_a_new_context_over_the_same_storage() {
    let api = FakeApi::spawn(with_user("grower@example.com", "secret")).await;
    let (ctx, storage) = api.context().await;
    ctx.auth()
        .login(&Credentials::new("grower@example.com", "secret"))
        .await
        .unwrap();

    let shared: Arc<dyn DeviceStorage> = storage;
    let reopened = ClientContext::with_storage(api.config(), shared).await.unwrap();
    assert_eq!(
        reopened.session().token().await.as_deref(),
        Some("token-grower@example.com")
    );
}

#[tokio::test]
async fn login_rejected_by_server_reports_message_and_status() {
    let api = FakeApi::spawn(with_user("grower@example.com", "secret")).await;
    let (ctx, _storage) = api.context().await;

    let err = ctx
        .auth()
        .login(&Credentials::new("grower@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(!ctx.auth().is_authenticated().await);
    let alert = Alert::from_error(Action::SignIn, &err);
    assert_eq!(alert.message, "Invalid credentials\nCode: 401");
}

#[tokio::test]
async fn invalid_credentials_never_reach_the_server() {
    let api = FakeApi::spawn(FakeState::default()).await;
    let (ctx, _storage) = api.context().await;

    let err = ctx
        .auth()
        .login(&Credentials::new("not-an-email", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Core(CoreError::Validation(ref v)) if v.len() == 2);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn register_checks_confirmation_then_signs_in() {
    let api = FakeApi::spawn(FakeState::default()).await;
    let (ctx, _storage) = api.context().await;
    let creds = Credentials::new("new@example.com", "sprout");

    let err = ctx.auth().register(&creds, "sprouts").await.unwrap_err();
    assert_matches!(err, ClientError::Core(CoreError::Validation(_)));
    assert!(api.requests().is_empty());

    ctx.auth().register(&creds, "sprout").await.unwrap();
    assert!(ctx.auth().is_authenticated().await);

    let again = ctx.auth().register(&creds, "sprout").await.unwrap_err();
    assert_eq!(again.server_message().as_deref(), Some("User already exists"));
}

#[tokio::test]
async fn logout_removes_the_stored_token() {
    let api = FakeApi::spawn(FakeState::default()).await;
    let (ctx, storage) = api.signed_in().await;

    ctx.auth().logout().await.unwrap();

    assert!(!ctx.auth().is_authenticated().await);
    assert_eq!(storage.get_item("token").await.unwrap(), None);
}

#[tokio::test]
async fn protected_call_without_token_is_not_sent() {
    let api = FakeApi::spawn(FakeState::default()).await;
    let (ctx, _storage) = api.context().await;

    let err = ctx.lots().list_lots().await.unwrap_err();

    assert_matches!(err, ClientError::Unauthenticated);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn unauthorized_response_ends_the_session() {
    let api = FakeApi::spawn(FakeState::default()).await;
    let (ctx, storage) = api.signed_in().await;
    api.state().tokens.remove(TEST_TOKEN);

    let err = ctx.lots().list_lots().await.unwrap_err();

    assert_matches!(err, ClientError::Unauthenticated);
    assert!(!ctx.session().is_authenticated().await);
    assert_eq!(storage.get_item("token").await.unwrap(), None);
    assert_eq!(api.requests_to("GET", "/lots/").len(), 1);
}
