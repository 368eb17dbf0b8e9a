//! Admin session lifecycle against a mock backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use oakline_client::SessionError;
use oakline_client::session::{AdminSession, SessionState};
use oakline_client::store::Namespace;
use oakline_integration_tests::{TestHarness, admin_json, admin_profile, user_profile};

fn session(harness: &TestHarness) -> AdminSession {
    AdminSession::new(harness.gateway.clone(), harness.store_handle())
}

#[tokio::test]
async fn test_login_authenticates_and_persists() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let admin = session(&harness);

    let mock = server
        .mock("POST", "/api/admin/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "tok-admin-1",
                "admin": admin_json("Store Ops"),
            })
            .to_string(),
        )
        .create_async()
        .await;

    let profile = admin.login("ops@oakline.shop", "hunter22!").await.unwrap();
    assert_eq!(profile.admin_name, "Store Ops");
    assert!(admin.state().is_authenticated());
    assert_eq!(
        harness.stored_token(Namespace::Admin).as_deref(),
        Some("tok-admin-1")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_login_response_persists_nothing() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let admin = session(&harness);

    // 200 whose body is missing the admin record.
    server
        .mock("POST", "/api/admin/login")
        .with_status(200)
        .with_body(json!({"token": "tok-admin-1"}).to_string())
        .create_async()
        .await;

    let err = admin
        .login("ops@oakline.shop", "hunter22!")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidResponse));
    assert_eq!(err.to_string(), "invalid response from server");
    assert!(harness.stored_token(Namespace::Admin).is_none());
    assert!(!admin.state().is_authenticated());
}

#[tokio::test]
async fn test_empty_token_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let admin = session(&harness);

    server
        .mock("POST", "/api/admin/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "",
                "admin": admin_json("Store Ops"),
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = admin
        .login("ops@oakline.shop", "hunter22!")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidResponse));
    assert!(harness.stored_token(Namespace::Admin).is_none());
}

#[tokio::test]
async fn test_restore_trusts_cached_profile_without_network() {
    // No mock server routes at all: restoration must not hit the backend.
    let server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = session(&harness);

    admin.restore();

    match admin.state() {
        SessionState::Authenticated(profile) => assert_eq!(profile.admin_name, "Store Ops"),
        other => panic!("expected authenticated state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_clears_only_admin_slot() {
    let server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Asha", "customer"));
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = session(&harness);
    admin.restore();

    admin.logout();

    assert_eq!(admin.state(), SessionState::Unauthenticated);
    assert!(harness.stored_token(Namespace::Admin).is_none());
    assert_eq!(
        harness.stored_token(Namespace::User).as_deref(),
        Some("tok-user-1")
    );
}
