//! End-user session lifecycle against a mock backend.

#![allow(clippy::unwrap_used)]

use std::io::Write as _;

use serde_json::json;

use oakline_client::{SessionError, ValidationError};
use oakline_client::session::{AuthSession, SessionState};
use oakline_client::store::Namespace;
use oakline_integration_tests::{TestHarness, user_json, user_profile};

fn session(harness: &TestHarness) -> AuthSession {
    AuthSession::new(harness.gateway.clone(), harness.store_handle())
}

#[tokio::test]
async fn test_sign_in_authenticates_and_persists() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    let mock = server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "tok-user-1",
                "user": user_json("Asha", "customer"),
            })
            .to_string(),
        )
        .create_async()
        .await;

    let user = auth.sign_in("asha@example.com", "hunter22!").await.unwrap();
    assert_eq!(user.name, "Asha");
    assert!(auth.state().is_authenticated());
    assert_eq!(
        harness.stored_token(Namespace::User).as_deref(),
        Some("tok-user-1")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wrong_credentials_leave_session_untouched() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    server
        .mock("POST", "/api/users/login")
        .with_status(401)
        .with_body(json!({"message": "Invalid email or password"}).to_string())
        .create_async()
        .await;

    let err = auth
        .sign_in("asha@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");

    // A login 401 must not trigger the session-expired machinery.
    assert!(!auth.state().is_authenticated());
    assert!(harness.stored_token(Namespace::User).is_none());
    assert!(!harness.notifier.saw("Session Expired"));
    assert!(harness.navigator.forced_navigations().is_empty());
}

#[tokio::test]
async fn test_incomplete_login_body_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    // 200 with no token: the backend has been seen doing this.
    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(json!({"message": "ok"}).to_string())
        .create_async()
        .await;

    let err = auth
        .sign_in("asha@example.com", "hunter22!")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidResponse));
    assert!(harness.stored_token(Namespace::User).is_none());
    assert!(!auth.state().is_authenticated());
}

#[tokio::test]
async fn test_restore_revalidates_profile() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Asha", "customer"));
    let auth = session(&harness);

    // The backend returns a fresher profile than the cached one.
    server
        .mock("GET", "/api/users/profile")
        .with_status(200)
        .with_body(json!({"user": user_json("Asha Rao", "customer")}).to_string())
        .create_async()
        .await;

    auth.restore().await;

    match auth.state() {
        SessionState::Authenticated(user) => assert_eq!(user.name, "Asha Rao"),
        other => panic!("expected authenticated state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_restore_failure_discards_credential() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Asha", "customer"));
    let auth = session(&harness);

    server
        .mock("GET", "/api/users/profile")
        .with_status(500)
        .with_body(json!({"message": "boom"}).to_string())
        .create_async()
        .await;

    auth.restore().await;

    assert_eq!(auth.state(), SessionState::Unauthenticated);
    assert!(harness.stored_token(Namespace::User).is_none());
}

#[tokio::test]
async fn test_restored_role_drives_console_access() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Root", "admin"));
    let auth = session(&harness);

    server
        .mock("GET", "/api/users/profile")
        .with_status(200)
        .with_body(json!({"user": user_json("Root", "admin")}).to_string())
        .create_async()
        .await;

    auth.restore().await;
    assert!(auth.grants_admin());
}

#[tokio::test]
async fn test_customer_role_does_not_grant_console_access() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Asha", "customer"));
    let auth = session(&harness);

    server
        .mock("GET", "/api/users/profile")
        .with_status(200)
        .with_body(json!({"user": user_json("Asha", "customer")}).to_string())
        .create_async()
        .await;

    auth.restore().await;
    assert!(auth.state().is_authenticated());
    assert!(!auth.grants_admin());
}

#[tokio::test]
async fn test_restore_with_empty_store_settles_unauthenticated() {
    let server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    auth.restore().await;

    assert_eq!(auth.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_admin_role_grants_console_access() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "tok-user-1",
                "user": user_json("Root", "admin"),
            })
            .to_string(),
        )
        .create_async()
        .await;

    auth.sign_in("root@oakline.shop", "hunter22!").await.unwrap();
    assert!(auth.grants_admin());
}

#[tokio::test]
async fn test_sign_out_wins_over_inflight_refresh() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = std::sync::Arc::new(session(&harness));

    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "tok-user-1",
                "user": user_json("Asha", "customer"),
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/users/profile")
        .with_status(200)
        .with_chunked_body(|writer| {
            // Hold the response until well after the sign-out below.
            std::thread::sleep(std::time::Duration::from_millis(500));
            writer.write_all(
                json!({"user": user_json("Asha Rao", "customer")})
                    .to_string()
                    .as_bytes(),
            )
        })
        .create_async()
        .await;

    auth.sign_in("asha@example.com", "hunter22!").await.unwrap();

    let refresh = tokio::spawn({
        let auth = std::sync::Arc::clone(&auth);
        async move { auth.refresh_profile().await }
    });
    // Let the refresh get its request onto the wire, then sign out.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    auth.sign_out();
    refresh.await.unwrap();

    // The slower refresh result must not resurrect the session or the store.
    assert_eq!(auth.state(), SessionState::Unauthenticated);
    assert!(harness.stored_token(Namespace::User).is_none());
}

#[tokio::test]
async fn test_malformed_otp_never_reaches_the_backend() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    let mock = server
        .mock("POST", "/api/users/verify-otp")
        .expect(0)
        .create_async()
        .await;

    let err = auth.verify_otp("asha@example.com", "04a913").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::InvalidOtp)
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_change_password_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_user("tok-user-1", &user_profile("Asha", "customer"));
    let auth = session(&harness);

    let mock = server
        .mock("PUT", "/api/users/change-password")
        .match_header("authorization", "Bearer tok-user-1")
        .with_status(200)
        .with_body(json!({"message": "Password updated"}).to_string())
        .create_async()
        .await;

    auth.change_password("hunter22!", "hunter23!").await.unwrap();
    mock.assert_async().await;

    // A too-short replacement is rejected before any request is made.
    let err = auth.change_password("hunter23!", "short").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::PasswordTooShort { .. })
    ));
}

#[tokio::test]
async fn test_sign_out_is_local_only() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    let auth = session(&harness);

    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(
            json!({
                "token": "tok-user-1",
                "user": user_json("Asha", "customer"),
            })
            .to_string(),
        )
        .create_async()
        .await;

    auth.sign_in("asha@example.com", "hunter22!").await.unwrap();
    auth.sign_out();

    assert_eq!(auth.state(), SessionState::Unauthenticated);
    assert!(harness.stored_token(Namespace::User).is_none());
    // No logout endpoint exists; nothing should have been notified either.
    assert!(harness.notifier.notices().is_empty());
}
