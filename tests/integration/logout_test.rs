//! Integration tests for logout and session listing.

use http::StatusCode;

use learnhub_database::repositories::SessionRepository;
use learnhub_entity::account::AccountRole;

use crate::helpers::{TestApp, body_str};

#[tokio::test]
async fn test_device_logout_ends_session_and_tokens() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", Some("phone")).await;

    let response = app.request("POST", "/auth/logout", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let after = app.request("GET", "/accounts/me", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.body["error"], "Token is blacklisted");
    assert!(
        app.sessions
            .find_by_account_and_device(account.id, "phone")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_undeviced_logout_ends_named_session() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let first = app.login("ada@example.com", None).await;
    let second = app.login("ada@example.com", None).await;

    let response = app
        .request(
            "POST",
            "/auth/logout",
            Some(serde_json::json!({ "sessionToken": body_str(&first, "sessionToken") })),
            Some(&body_str(&first, "accessToken")),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let remaining = app.sessions.find_active_by_account(account.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].token, body_str(&second, "sessionToken"));
}

#[tokio::test]
async fn test_relogin_on_same_device_revokes_previous_token() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let old = app.access_token("ada@example.com", Some("phone")).await;
    let new = app.access_token("ada@example.com", Some("phone")).await;

    let old_call = app.request("GET", "/accounts/me", None, Some(&old)).await;
    let new_call = app.request("GET", "/accounts/me", None, Some(&new)).await;

    assert_eq!(old_call.status, StatusCode::UNAUTHORIZED);
    assert_eq!(new_call.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_all_ends_every_session() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let phone = app.access_token("ada@example.com", Some("phone")).await;
    let laptop = app.access_token("ada@example.com", Some("laptop")).await;

    let listed = app
        .request("GET", "/accounts/me/sessions", None, Some(&laptop))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let sessions = listed.body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.get("token").is_none()));
    assert_eq!(
        sessions.iter().filter(|s| s["current"] == true).count(),
        1
    );

    let response = app
        .request("POST", "/auth/logout-all", None, Some(&laptop))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);

    let phone_call = app.request("GET", "/accounts/me", None, Some(&phone)).await;
    assert_eq!(phone_call.status, StatusCode::UNAUTHORIZED);
    assert!(
        app.sessions
            .find_active_by_account(account.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_logout_keeps_other_account_on_same_device_id() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    app.create_account("grace@example.com", AccountRole::Student).await;
    let ada = app.access_token("ada@example.com", Some("web")).await;
    let grace = app.access_token("grace@example.com", Some("web")).await;

    let response = app.request("POST", "/auth/logout", None, Some(&grace)).await;
    assert_eq!(response.status, StatusCode::OK);

    let ada_call = app.request("GET", "/accounts/me", None, Some(&ada)).await;
    assert_eq!(ada_call.status, StatusCode::OK);
    let grace_call = app.request("GET", "/accounts/me", None, Some(&grace)).await;
    assert_eq!(grace_call.status, StatusCode::UNAUTHORIZED);
}
