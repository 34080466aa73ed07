//! Account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::account::Account;

/// Read access to accounts plus the two writes the auth subsystem owns:
/// creation at registration and the last-login timestamp.
#[async_trait]
pub trait AccountRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find an account by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Check whether an email is already registered.
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Insert or update an account and return the stored row.
    async fn save(&self, account: &Account) -> AppResult<Account>;

    /// Record a successful login.
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
}

/// PostgreSQL-backed account repository.
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check email existence", e)
        })
    }

    async fn save(&self, account: &Account) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, username, password_hash, role, status, \
             restriction_reason, restriction_type, restricted_until, restricted_by, restricted_at, \
             max_devices, last_login_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             ON CONFLICT (id) DO UPDATE SET \
             email = EXCLUDED.email, username = EXCLUDED.username, \
             password_hash = EXCLUDED.password_hash, role = EXCLUDED.role, status = EXCLUDED.status, \
             restriction_reason = EXCLUDED.restriction_reason, \
             restriction_type = EXCLUDED.restriction_type, \
             restricted_until = EXCLUDED.restricted_until, \
             restricted_by = EXCLUDED.restricted_by, restricted_at = EXCLUDED.restricted_at, \
             max_devices = EXCLUDED.max_devices, last_login_at = EXCLUDED.last_login_at, \
             updated_at = NOW() \
             RETURNING *",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(account.status)
        .bind(&account.restriction_reason)
        .bind(account.restriction_type)
        .bind(account.restricted_until)
        .bind(&account.restricted_by)
        .bind(account.restricted_at)
        .bind(account.max_devices)
        .bind(account.last_login_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db) = e {
                if db.is_unique_violation() {
                    return AppError::conflict("Email is already registered");
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to save account", e)
        })
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET last_login_at = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last login", e)
            })?;
        Ok(())
    }
}
