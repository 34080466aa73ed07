//! Runtime-adjustable token lifetimes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use learnhub_core::config::AuthConfig;
use learnhub_core::config::auth::{validate_access_ttl, validate_session_ttl};
use learnhub_core::result::AppResult;

/// Current access and session token lifetimes.
///
/// One instance is shared by the encoder, the session store and the
/// admin settings endpoint. Updates are validated as a whole before
/// anything is stored.
#[derive(Debug)]
pub struct TokenLifetimes {
    access_ms: AtomicU64,
    session_ms: AtomicU64,
}

/// Snapshot of the configured lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    /// Access token lifetime in milliseconds.
    pub access_token_ttl_ms: u64,
    /// Session token lifetime in milliseconds.
    pub session_ttl_ms: u64,
}

impl TokenLifetimes {
    /// Creates lifetimes after checking both values against their bounds.
    pub fn new(access_ms: u64, session_ms: u64) -> AppResult<Self> {
        validate_access_ttl(access_ms)?;
        validate_session_ttl(session_ms)?;
        Ok(Self {
            access_ms: AtomicU64::new(access_ms),
            session_ms: AtomicU64::new(session_ms),
        })
    }

    /// Creates lifetimes from the startup configuration.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Self::new(config.access_token_ttl_ms, config.session_ttl_ms)
    }

    /// Current access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_millis(self.access_ms.load(Ordering::Acquire))
    }

    /// Current session lifetime.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_millis(self.session_ms.load(Ordering::Acquire))
    }

    /// Returns both lifetimes.
    pub fn settings(&self) -> TokenSettings {
        TokenSettings {
            access_token_ttl_ms: self.access_ms.load(Ordering::Acquire),
            session_ttl_ms: self.session_ms.load(Ordering::Acquire),
        }
    }

    /// Replaces either lifetime.
    ///
    /// Every supplied value is validated first; if any is out of range the
    /// call fails with a configuration error and nothing changes.
    pub fn update(&self, access_ms: Option<u64>, session_ms: Option<u64>) -> AppResult<TokenSettings> {
        if let Some(ms) = access_ms {
            validate_access_ttl(ms)?;
        }
        if let Some(ms) = session_ms {
            validate_session_ttl(ms)?;
        }

        if let Some(ms) = access_ms {
            self.access_ms.store(ms, Ordering::Release);
        }
        if let Some(ms) = session_ms {
            self.session_ms.store(ms, Ordering::Release);
        }

        let settings = self.settings();
        info!(
            access_token_ttl_ms = settings.access_token_ttl_ms,
            session_ttl_ms = settings.session_ttl_ms,
            "Token lifetimes updated"
        );
        Ok(settings)
    }
}
