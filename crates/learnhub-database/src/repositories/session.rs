//! Session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::session::{CreateSession, Session};

/// Durable registry of refresh sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new session row.
    ///
    /// A row already bound to the same account and device is replaced in
    /// the same statement, so concurrent logins on one device never clash.
    async fn create(&self, data: &CreateSession) -> AppResult<Session>;

    /// Find a session by its opaque token, expired or not.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Find the session bound to `(account_id, device_id)`, expired or not.
    async fn find_by_account_and_device(
        &self,
        account_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<Session>>;

    /// List unexpired sessions of an account, oldest first.
    async fn find_active_by_account(&self, account_id: Uuid) -> AppResult<Vec<Session>>;

    /// Update the last-used timestamp.
    async fn update_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a session by id. Returns `true` if a row was removed.
    async fn delete(&self, session_id: Uuid) -> AppResult<bool>;

    /// Delete a session by token. Returns `true` if a row was removed.
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;

    /// Delete every session of an account. Returns the number removed.
    async fn delete_all_by_account(&self, account_id: Uuid) -> AppResult<u64>;

    /// Delete every session that expired before `now`. Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// PostgreSQL-backed session repository.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, token, account_id, device_id, user_agent, ip_address, \
             issued_at, last_used_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW(), $7) \
             ON CONFLICT (account_id, device_id) WHERE device_id IS NOT NULL DO UPDATE SET \
             id = EXCLUDED.id, token = EXCLUDED.token, user_agent = EXCLUDED.user_agent, \
             ip_address = EXCLUDED.ip_address, issued_at = EXCLUDED.issued_at, \
             last_used_at = EXCLUDED.last_used_at, expires_at = EXCLUDED.expires_at \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.token)
        .bind(data.account_id)
        .bind(&data.device_id)
        .bind(&data.user_agent)
        .bind(&data.ip_address)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
            })
    }

    async fn find_by_account_and_device(
        &self,
        account_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE account_id = $1 AND device_id = $2",
        )
        .bind(account_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by device", e)
        })
    }

    async fn find_active_by_account(&self, account_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE account_id = $1 AND expires_at >= NOW() \
             ORDER BY issued_at ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
        })
    }

    async fn update_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_used_at = $1 WHERE id = $2")
            .bind(at)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last used", e)
            })?;
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session by token", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_account(&self, account_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete account sessions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete expired sessions", e)
            })?;
        Ok(result.rows_affected())
    }
}
