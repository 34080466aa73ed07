//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Utc};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use learnhub_api::AppState;
use learnhub_auth::CredentialVerifier;
use learnhub_cache::CacheManager;
use learnhub_cache::memory::MemoryCacheProvider;
use learnhub_core::config::AppConfig;
use learnhub_core::config::cache::MemoryCacheConfig;
use learnhub_core::error::AppError;
use learnhub_core::traits::CacheProvider;
use learnhub_database::repositories::{AccountRepository, SessionRepository};
use learnhub_database::{MemoryAccountRepository, MemorySessionRepository};
use learnhub_entity::account::{
    Account, AccountRole, AccountStatus, CreateAccount, RestrictionType,
};

/// Default password of accounts created by [`TestApp::create_account`].
pub const PASSWORD: &str = "password123";

/// Stores passwords as `plain:<password>` so tests skip Argon2.
#[derive(Debug)]
pub struct PlainCredentials;

impl CredentialVerifier for PlainCredentials {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching components directly
    pub state: AppState,
    /// Account storage
    pub accounts: MemoryAccountRepository,
    /// Session storage
    pub sessions: MemorySessionRepository,
}

impl TestApp {
    /// Create a new test application on in-memory backends
    pub fn new() -> Self {
        let cache = MemoryCacheProvider::new(&MemoryCacheConfig::default());
        Self::with_cache(Arc::new(cache))
    }

    /// Create a test application over the given cache provider
    pub fn with_cache(cache: Arc<dyn CacheProvider>) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.database.provider = "memory".to_string();

        let accounts = MemoryAccountRepository::new();
        let sessions = MemorySessionRepository::new();

        let state = AppState::build(
            config,
            Arc::new(accounts.clone()),
            Arc::new(sessions.clone()),
            Arc::new(CacheManager::from_provider(cache)),
            Arc::new(PlainCredentials),
        )
        .expect("Failed to build app state");

        Self {
            router: learnhub_api::build_app(state.clone()),
            state,
            accounts,
            sessions,
        }
    }

    /// Create an active account with [`PASSWORD`]
    pub async fn create_account(&self, email: &str, role: AccountRole) -> Account {
        let account = Account::from_create(CreateAccount {
            email: email.to_string(),
            username: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: format!("plain:{PASSWORD}"),
            role,
            max_devices: 0,
        });
        self.accounts
            .save(&account)
            .await
            .expect("Failed to create test account")
    }

    /// Apply a restriction to an existing account
    pub async fn restrict(
        &self,
        account: &Account,
        status: AccountStatus,
        until: Option<DateTime<Utc>>,
    ) -> Account {
        let mut account = account.clone();
        account.status = status;
        account.restriction_reason = Some("Repeated policy violations".to_string());
        account.restriction_type = Some(match until {
            Some(_) => RestrictionType::Temporary,
            None => RestrictionType::Permanent,
        });
        account.restricted_until = until;
        account.restricted_by = Some("moderator@example.com".to_string());
        account.restricted_at = Some(Utc::now());
        self.accounts
            .save(&account)
            .await
            .expect("Failed to restrict account")
    }

    /// Login and return the response body
    pub async fn login(&self, email: &str, device_id: Option<&str>) -> Value {
        let mut body = serde_json::json!({
            "email": email,
            "password": PASSWORD,
        });
        if let Some(device) = device_id {
            body["deviceId"] = Value::from(device);
        }

        let response = self.request("POST", "/auth/login", Some(body), None).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body
    }

    /// Login and return the access token
    pub async fn access_token(&self, email: &str, device_id: Option<&str>) -> String {
        let body = self.login(email, device_id).await;
        body_str(&body, "accessToken")
    }

    /// Moves a session's expiry into the past
    pub async fn expire_session(&self, token: &str) {
        let mut session = self
            .sessions
            .find_by_token(token)
            .await
            .expect("Session lookup failed")
            .expect("Session not found");
        session.expires_at = Utc::now() - chrono::Duration::minutes(1);
        self.sessions.insert(session).await;
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Reads a string field from a JSON body
pub fn body_str(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("No {field} in body: {body:?}"))
        .to_string()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
