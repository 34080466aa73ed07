//! Integration tests for the authentication gate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use http::StatusCode;
use uuid::Uuid;

use learnhub_auth::{Claims, DeviceKey, JwtEncoder};
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::CacheProvider;
use learnhub_database::repositories::SessionRepository;
use learnhub_entity::account::{AccountRole, AccountStatus};

use crate::helpers::{TestApp, body_str};

/// Cache whose backend is unreachable.
#[derive(Debug)]
struct DownCache;

#[async_trait]
impl CacheProvider for DownCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::cache("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }

    async fn set_add(&self, _key: &str, _member: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn set_remove(&self, _key: &str, _members: &[String]) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn set_members(&self, _key: &str) -> AppResult<Vec<String>> {
        Err(AppError::cache("connection refused"))
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }
}

fn sign(app: &TestApp, claims: &Claims) -> String {
    JwtEncoder::new(&app.state.config.auth, app.state.lifetimes.clone())
        .encode(claims)
        .unwrap()
}

#[tokio::test]
async fn test_missing_bearer_on_protected_route() {
    let app = TestApp::new();

    let response = app.request("GET", "/accounts/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_token_fails_authentication() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/accounts/me", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_expired_token_is_reported() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let now = Utc::now().timestamp();
    let claims = Claims::new(account.id, account.role, None, now - 600, now - 60).unwrap();

    let response = app
        .request("GET", "/accounts/me", None, Some(&sign(&app, &claims)))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Token has expired");
}

#[tokio::test]
async fn test_unknown_subject_is_denied() {
    let app = TestApp::new();
    let now = Utc::now().timestamp();
    let claims = Claims::new(Uuid::new_v4(), AccountRole::Student, None, now, now + 600).unwrap();

    let response = app
        .request("GET", "/accounts/me", None, Some(&sign(&app, &claims)))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_account_banned_after_login_is_refused() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", None).await;
    app.restrict(&account, AccountStatus::Banned, None).await;

    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "ACCOUNT_RESTRICTED");
    assert_eq!(response.body["suspensionBanInfo"]["action"], "BANNED");
    assert_eq!(response.body["suspensionBanInfo"]["isTemporary"], false);
    assert!(response.body["suspensionBanInfo"]["until"].is_null());
}

#[tokio::test]
async fn test_device_token_without_session() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", Some("phone")).await;
    app.sessions.delete_all_by_account(account.id).await.unwrap();

    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "DEVICE_SESSION_EXPIRED");
}

#[tokio::test]
async fn test_device_token_with_expired_session() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let body = app.login("ada@example.com", Some("phone")).await;
    let token = body_str(&body, "accessToken");
    app.expire_session(&body_str(&body, "sessionToken")).await;

    let first = app.request("GET", "/accounts/me", None, Some(&token)).await;
    assert_eq!(first.status, StatusCode::UNAUTHORIZED);
    assert_eq!(first.body["code"], "SESSION_EXPIRED");

    // The expired row is gone, so it cannot come back to life.
    let again = app.request("GET", "/accounts/me", None, Some(&token)).await;
    assert_eq!(again.body["code"], "DEVICE_SESSION_EXPIRED");
    assert!(
        app.sessions
            .find_by_account_and_device(account.id, "phone")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_undeviced_token_needs_a_live_session() {
    let app = TestApp::new();
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", None).await;
    app.sessions.delete_all_by_account(account.id).await.unwrap();

    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn test_student_kept_out_of_admin_area() {
    let app = TestApp::new();
    app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", None).await;

    let response = app
        .request("GET", "/admin/auth/token-settings", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "STUDENT_DASHBOARD_ACCESS_DENIED");
}

#[tokio::test]
async fn test_cache_outage_fails_open() {
    let app = TestApp::with_cache(Arc::new(DownCache));
    let account = app.create_account("ada@example.com", AccountRole::Student).await;
    let token = app.access_token("ada@example.com", Some("phone")).await;

    let phone = DeviceKey::new(account.id, "phone");
    app.state.revocation.revoke(&token, 600, Some(phone)).await;
    let response = app.request("GET", "/accounts/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let health = app.request("GET", "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "degraded");
    assert_eq!(health.body["cache"]["revocationAvailable"], false);
}
