//! Session storage operations wrapping the database repository.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_database::repositories::SessionRepository;
use learnhub_entity::session::{CreateSession, Session};

use crate::lifetimes::TokenLifetimes;

/// Durable registry of refresh sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session database repository.
    repo: Arc<dyn SessionRepository>,
    /// Shared lifetimes, read at creation time.
    lifetimes: Arc<TokenLifetimes>,
}

/// Generates an opaque 256-bit session token.
fn generate_token() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>())
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(repo: Arc<dyn SessionRepository>, lifetimes: Arc<TokenLifetimes>) -> Self {
        Self { repo, lifetimes }
    }

    /// Creates a new session.
    ///
    /// When a device is given, any existing row for the same account and
    /// device is replaced so a device never holds two sessions.
    pub async fn create(
        &self,
        account_id: Uuid,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
        device_id: Option<&str>,
    ) -> AppResult<Session> {
        let ttl = Duration::milliseconds(self.lifetimes.session_ttl().as_millis() as i64);
        let data = CreateSession {
            token: generate_token(),
            account_id,
            device_id: device_id.map(String::from),
            user_agent: user_agent.map(String::from),
            ip_address: ip_address.map(String::from),
            expires_at: Utc::now() + ttl,
        };

        let session = self.repo.create(&data).await?;
        debug!(
            account_id = %account_id,
            session_id = %session.id,
            device_id = device_id.unwrap_or("-"),
            "Session created"
        );
        Ok(session)
    }

    /// Finds a session by its token, expired or not.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        self.repo.find_by_token(token).await
    }

    /// Finds the session bound to an account and device, expired or not.
    pub async fn find_by_account_and_device(
        &self,
        account_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<Session>> {
        self.repo.find_by_account_and_device(account_id, device_id).await
    }

    /// Lists unexpired sessions of an account, oldest first.
    pub async fn list_active(&self, account_id: Uuid) -> AppResult<Vec<Session>> {
        self.repo.find_active_by_account(account_id).await
    }

    /// Passes a live session through; deletes an expired one and fails.
    pub async fn verify_not_expired(&self, session: Session) -> AppResult<Session> {
        if !session.is_expired() {
            return Ok(session);
        }

        self.repo.delete(session.id).await?;
        info!(
            account_id = %session.account_id,
            session_id = %session.id,
            "Deleted expired session on read"
        );
        Err(AppError::session("Session has expired"))
    }

    /// Deletes a session by id.
    pub async fn delete(&self, session_id: Uuid) -> AppResult<bool> {
        self.repo.delete(session_id).await
    }

    /// Deletes a session by token.
    pub async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        self.repo.delete_by_token(token).await
    }

    /// Deletes every session of an account.
    pub async fn delete_all_for_account(&self, account_id: Uuid) -> AppResult<u64> {
        let removed = self.repo.delete_all_by_account(account_id).await?;
        info!(account_id = %account_id, removed, "Deleted all sessions for account");
        Ok(removed)
    }

    /// Records that a session was used. Failures are only logged.
    pub async fn touch(&self, session_id: Uuid) {
        if let Err(e) = self.repo.update_last_used(session_id, Utc::now()).await {
            debug!(session_id = %session_id, error = %e, "Failed to touch session");
        }
    }

    /// Deletes every session past its expiry.
    pub async fn delete_expired(&self) -> AppResult<u64> {
        self.repo.delete_expired(Utc::now()).await
    }
}
