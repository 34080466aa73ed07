//! Integration tests for login, registration and refresh.

use chrono::{Duration, Utc};
use http::StatusCode;

use learnhub_database::repositories::SessionRepository;
use learnhub_entity::account::{AccountRole, AccountStatus};

use crate::helpers::{self, PASSWORD, TestApp, body_str};

#[tokio::test]
async fn test_login_returns_both_tokens() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;

    let body = app.login("ada@example.com", None).await;

    assert!(!body_str(&body, "accessToken").is_empty());
    assert!(!body_str(&body, "sessionToken").is_empty());
    assert_eq!(body_str(&body, "username"), "ada");
    assert_eq!(body_str(&body, "userId"), account.id.to_string());
    assert!(body["suspensionBanInfo"].is_null());
}

#[tokio::test]
async fn test_access_token_opens_protected_route() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", None).await;

    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["context"]["email"], "ada@example.com");
    assert_eq!(response.body["context"]["role"], "STUDENT");
    assert_eq!(response.body["account"]["status"], "ACTIVE");
}

#[tokio::test]
async fn test_revoked_token_is_blacklisted() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", None).await;

    app.state.revocation.revoke(&token, 600, None).await;
    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Token is blacklisted");
}

#[tokio::test]
async fn test_temporary_suspension_reported_at_login() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let until = Utc::now() + Duration::days(3);
    app.restrict(&account, AccountStatus::Suspended, Some(until)).await;

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let info = &response.body["suspensionBanInfo"];
    assert_eq!(info["isTemporary"], true);
    assert_eq!(info["action"], "SUSPENDED");
    assert_eq!(info["durationType"], "TEMPORARY");
    assert_eq!(info["until"], serde_json::to_value(until).unwrap());
    assert_eq!(response.body["accessToken"], "");
    assert_eq!(response.body["sessionToken"], "");
}

#[tokio::test]
async fn test_refresh_with_expired_session_deletes_it() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let body = app.login("ada@example.com", Some("laptop")).await;
    let session_token = body_str(&body, "sessionToken");
    app.expire_session(&session_token).await;

    let response = app
        .request(
            "POST",
            "/auth/refresh-token",
            Some(serde_json::json!({ "token": session_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body["message"],
        "Token refresh failed: session expired"
    );
    assert!(
        app.sessions
            .find_by_token(&session_token)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_refresh_returns_same_session_token() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let body = app.login("ada@example.com", Some("laptop")).await;
    let session_token = body_str(&body, "sessionToken");

    let response = app
        .request(
            "POST",
            "/auth/refresh-token",
            Some(serde_json::json!({ "token": session_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(body_str(&response.body, "sessionToken"), session_token);

    let fresh = body_str(&response.body, "accessToken");
    let me = app.request("GET", "/accounts/me", None, Some(&fresh)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["context"]["deviceId"], "laptop");
}

#[tokio::test]
async fn test_refresh_with_unknown_token_fails() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/refresh-token",
            Some(serde_json::json!({ "token": "does-not-exist" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_path_bypasses_gate() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let body = app.login("ada@example.com", None).await;
    let access = body_str(&body, "accessToken");
    app.state.revocation.revoke(&access, 600, None).await;

    let response = app
        .request(
            "POST",
            "/auth/refresh-token",
            Some(serde_json::json!({ "token": body_str(&body, "sessionToken") })),
            Some(&access),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;

    let wrong_password = app
        .request(
            "POST",
            "/auth/login",
            Some(serde_json::json!({ "email": "ada@example.com", "password": "nope-nope" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/auth/login",
            Some(serde_json::json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_device_header_used_when_body_has_none() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;

    let request = http::Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("Content-Type", "application/json")
        .header("X-Device-Id", "tablet")
        .body(axum::body::Body::from(
            serde_json::json!({ "email": "ada@example.com", "password": PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sessions = app.sessions.find_active_by_account(account.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].device_id.as_deref(), Some("tablet"));
}

#[tokio::test]
async fn test_register_then_duplicate_conflicts() {
    let app = TestApp::new();
    let body = serde_json::json!({
        "email": "  New.Student@Example.com ",
        "password": "longenough",
    });

    let first = app.request("POST", "/auth/register", Some(body.clone()), None).await;
    assert_eq!(first.status, StatusCode::OK);
    let token = body_str(&first.body, "accessToken");

    let me = app.request("GET", "/accounts/me", None, Some(&token)).await;
    assert_eq!(me.body["account"]["email"], "new.student@example.com");
    assert_eq!(me.body["account"]["role"], "STUDENT");

    let second = app.request("POST", "/auth/register", Some(body), None).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_short_password_and_bad_role() {
    let app = TestApp::new();

    let short = app
        .request(
            "POST",
            "/auth/register",
            Some(serde_json::json!({ "email": "a@example.com", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let bad_role = app
        .request(
            "POST",
            "/auth/register",
            Some(serde_json::json!({
                "email": "b@example.com",
                "password": "longenough",
                "role": "wizard",
            })),
            None,
        )
        .await;
    assert_eq!(bad_role.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_cache() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["cache"]["reachable"], true);
    assert_eq!(response.body["cache"]["revocationAvailable"], true);
}
