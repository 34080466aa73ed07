//! Integration tests for the token settings endpoints.

use http::StatusCode;

use learnhub_entity::account::AccountRole;

use crate::helpers::TestApp;

async fn admin_token(app: &TestApp) -> String {
    app.create_account("root@example.com", AccountRole::Admin).await;
    app.access_token("root@example.com", None).await
}

#[tokio::test]
async fn test_admin_reads_token_settings() {
    let app = TestApp::new();
    let token = admin_token(&app).await;

    let response = app
        .request("GET", "/admin/auth/token-settings", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["accessTokenTtlMs"], 600_000);
    assert_eq!(response.body["sessionTtlMs"], 604_800_000);
}

#[tokio::test]
async fn test_access_ttl_below_minimum_is_rejected() {
    let app = TestApp::new();
    let token = admin_token(&app).await;

    let response = app
        .request(
            "PUT",
            "/admin/auth/token-settings",
            Some(serde_json::json!({ "accessTokenTtlMs": 30_000 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.state.lifetimes.access_ttl(),
        std::time::Duration::from_millis(600_000)
    );
}

#[tokio::test]
async fn test_valid_update_applies_to_new_tokens() {
    let app = TestApp::new();
    let token = admin_token(&app).await;

    let response = app
        .request(
            "PUT",
            "/admin/auth/token-settings",
            Some(serde_json::json!({ "accessTokenTtlMs": 120_000 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["accessTokenTtlMs"], 120_000);
    assert_eq!(response.body["sessionTtlMs"], 604_800_000);
    assert_eq!(
        app.state.lifetimes.access_ttl(),
        std::time::Duration::from_millis(120_000)
    );
}

#[tokio::test]
async fn test_instructor_cannot_change_settings() {
    let app = TestApp::new();
    app.create_account("teach@example.com", AccountRole::Instructor).await;
    let token = app.access_token("teach@example.com", None).await;

    let response = app
        .request(
            "PUT",
            "/admin/auth/token-settings",
            Some(serde_json::json!({ "accessTokenTtlMs": 120_000 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
