//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use learnhub_cache::memory::MemoryCacheProvider;
use learnhub_core::config::cache::MemoryCacheConfig;
use learnhub_core::config::session::OverflowStrategy;
use learnhub_core::config::{AuthConfig, SessionConfig};
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_database::memory::{MemoryAccountRepository, MemorySessionRepository};
use learnhub_database::repositories::AccountRepository;
use learnhub_entity::account::{Account, AccountRole, CreateAccount};

use crate::gate::AuthenticationGate;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::lifetimes::TokenLifetimes;
use crate::password::CredentialVerifier;
use crate::revocation::RevocationRegistry;
use crate::service::AuthenticationService;
use crate::session::SessionStore;

/// Stores passwords as `plain:<password>`; Argon2 is too slow for unit tests.
#[derive(Debug)]
pub(crate) struct PlainCredentials;

impl CredentialVerifier for PlainCredentials {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

/// Account repository whose every call fails.
#[derive(Debug)]
struct FailingAccounts(AppError);

#[async_trait]
impl AccountRepository for FailingAccounts {
    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Account>> {
        Err(self.0.clone())
    }

    async fn find_by_email(&self, _email: &str) -> AppResult<Option<Account>> {
        Err(self.0.clone())
    }

    async fn exists_by_email(&self, _email: &str) -> AppResult<bool> {
        Err(self.0.clone())
    }

    async fn save(&self, _account: &Account) -> AppResult<Account> {
        Err(self.0.clone())
    }

    async fn update_last_login(&self, _id: Uuid, _at: DateTime<Utc>) -> AppResult<()> {
        Err(self.0.clone())
    }
}

/// Every component wired over in-memory backends.
pub(crate) struct Harness {
    pub config: AuthConfig,
    pub accounts: Arc<dyn AccountRepository>,
    pub session_repo: MemorySessionRepository,
    pub sessions: Arc<SessionStore>,
    pub encoder: Arc<JwtEncoder>,
    pub decoder: Arc<JwtDecoder>,
    pub revocation: Arc<RevocationRegistry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_accounts(Arc::new(MemoryAccountRepository::new()))
    }

    pub fn with_failing_accounts(err: AppError) -> Self {
        Self::with_accounts(Arc::new(FailingAccounts(err)))
    }

    fn with_accounts(accounts: Arc<dyn AccountRepository>) -> Self {
        let config = AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            ..AuthConfig::default()
        };
        let lifetimes = Arc::new(TokenLifetimes::from_config(&config).unwrap());
        let session_repo = MemorySessionRepository::new();
        let sessions = Arc::new(SessionStore::new(
            Arc::new(session_repo.clone()),
            lifetimes.clone(),
        ));
        let decoder = Arc::new(JwtDecoder::new(&config));
        let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default()));
        let revocation = Arc::new(RevocationRegistry::new(
            cache,
            decoder.clone(),
            Duration::from_secs(config.device_token_index_ttl_seconds),
        ));

        Self {
            encoder: Arc::new(JwtEncoder::new(&config, lifetimes)),
            config,
            accounts,
            session_repo,
            sessions,
            decoder,
            revocation,
        }
    }

    pub fn gate(&self) -> AuthenticationGate {
        AuthenticationGate::new(
            &self.config,
            self.decoder.clone(),
            self.revocation.clone(),
            self.accounts.clone(),
            self.sessions.clone(),
        )
    }

    pub fn service(&self, overflow_strategy: OverflowStrategy) -> AuthenticationService {
        let session_config = SessionConfig {
            overflow_strategy,
            ..SessionConfig::default()
        };
        AuthenticationService::new(
            &self.config,
            &session_config,
            self.accounts.clone(),
            self.sessions.clone(),
            self.encoder.clone(),
            self.revocation.clone(),
            Arc::new(PlainCredentials),
        )
    }

    pub fn unsaved_account(&self, role: AccountRole) -> Account {
        Account::from_create(CreateAccount {
            email: format!("{}@example.com", Uuid::new_v4()),
            username: "tester".to_string(),
            password_hash: "plain:password".to_string(),
            role,
            max_devices: 0,
        })
    }

    pub async fn add_account(&self, email: &str, role: AccountRole) -> Account {
        let mut account = self.unsaved_account(role);
        account.email = email.to_string();
        self.save(&account).await
    }

    pub async fn save(&self, account: &Account) -> Account {
        self.accounts.save(account).await.unwrap()
    }

    /// Moves a session's expiry into the past and returns its token.
    pub async fn expire_session(&self, token: &str) -> String {
        let mut session = self.sessions.find_by_token(token).await.unwrap().unwrap();
        session.expires_at = Utc::now() - chrono::Duration::minutes(1);
        self.session_repo.insert(session).await;
        token.to_string()
    }
}
