//! In-memory session repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_entity::session::{CreateSession, Session};

use crate::repositories::SessionRepository;

/// Session repository keeping rows in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed row, bypassing creation defaults.
    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// Number of stored rows, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;

        if sessions.values().any(|s| s.token == data.token) {
            return Err(AppError::conflict("Session token already in use"));
        }
        if data.device_id.is_some() {
            sessions
                .retain(|_, s| !(s.account_id == data.account_id && s.device_id == data.device_id));
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            token: data.token.clone(),
            account_id: data.account_id,
            device_id: data.device_id.clone(),
            user_agent: data.user_agent.clone(),
            ip_address: data.ip_address.clone(),
            issued_at: now,
            last_used_at: now,
            expires_at: data.expires_at,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().find(|s| s.token == token).cloned())
    }

    async fn find_by_account_and_device(
        &self,
        account_id: Uuid,
        device_id: &str,
    ) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| s.account_id == account_id && s.is_for_device(device_id))
            .cloned())
    }

    async fn find_active_by_account(&self, account_id: Uuid) -> AppResult<Vec<Session>> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        let mut active: Vec<Session> = sessions
            .values()
            .filter(|s| s.account_id == account_id && !s.is_expired_at(now))
            .cloned()
            .collect();
        active.sort_by_key(|s| s.issued_at);
        Ok(active)
    }

    async fn update_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(session) = self.sessions.write().await.get_mut(&session_id) {
            session.last_used_at = at;
        }
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<bool> {
        Ok(self.sessions.write().await.remove(&session_id).is_some())
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.token != token);
        Ok(sessions.len() < before)
    }

    async fn delete_all_by_account(&self, account_id: Uuid) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.account_id != account_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
