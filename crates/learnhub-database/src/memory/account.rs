//! In-memory account repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_entity::account::Account;

use crate::repositories::AccountRepository;

/// Account repository keeping rows in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryAccountRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn save(&self, account: &Account) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;
        let duplicate = accounts
            .values()
            .any(|a| a.id != account.id && a.email.eq_ignore_ascii_case(&account.email));
        if duplicate {
            return Err(AppError::conflict("Email is already registered"));
        }

        let mut stored = account.clone();
        if accounts.contains_key(&account.id) {
            stored.updated_at = Utc::now();
        }
        accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(account) = self.accounts.write().await.get_mut(&id) {
            account.last_login_at = Some(at);
        }
        Ok(())
    }
}
