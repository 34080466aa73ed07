//! Shared application state threaded through every handler.

use std::sync::Arc;
use std::time::Duration;

use learnhub_auth::{
    AuthenticationGate, AuthenticationService, CredentialVerifier, JwtDecoder, JwtEncoder,
    RevocationRegistry, SessionStore, TokenLifetimes,
};
use learnhub_cache::CacheManager;
use learnhub_core::config::AppConfig;
use learnhub_core::result::AppResult;
use learnhub_database::repositories::{AccountRepository, SessionRepository};

/// Everything a request handler can reach.
///
/// Cloned per request; every field is reference-counted.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Active cache provider.
    pub cache: Arc<CacheManager>,
    /// Runtime-adjustable token lifetimes.
    pub lifetimes: Arc<TokenLifetimes>,
    /// Refresh session store.
    pub sessions: Arc<SessionStore>,
    /// Token blacklist.
    pub revocation: Arc<RevocationRegistry>,
    /// Per-request authentication pipeline.
    pub gate: Arc<AuthenticationGate>,
    /// Login, registration, refresh and logout.
    pub auth_service: Arc<AuthenticationService>,
    /// Account lookups.
    pub accounts: Arc<dyn AccountRepository>,
}

impl AppState {
    /// Wires the authentication components over the given backends.
    pub fn build(
        config: AppConfig,
        accounts: Arc<dyn AccountRepository>,
        session_repo: Arc<dyn SessionRepository>,
        cache: Arc<CacheManager>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> AppResult<Self> {
        let lifetimes = Arc::new(TokenLifetimes::from_config(&config.auth)?);
        let sessions = Arc::new(SessionStore::new(session_repo, lifetimes.clone()));

        let encoder = Arc::new(JwtEncoder::new(&config.auth, lifetimes.clone()));
        let decoder = Arc::new(JwtDecoder::new(&config.auth));

        let revocation = Arc::new(RevocationRegistry::new(
            cache.clone(),
            decoder.clone(),
            Duration::from_secs(config.auth.device_token_index_ttl_seconds),
        ));

        let gate = Arc::new(AuthenticationGate::new(
            &config.auth,
            decoder,
            revocation.clone(),
            accounts.clone(),
            sessions.clone(),
        ));

        let auth_service = Arc::new(AuthenticationService::new(
            &config.auth,
            &config.session,
            accounts.clone(),
            sessions.clone(),
            encoder,
            revocation.clone(),
            credentials,
        ));

        Ok(Self {
            config: Arc::new(config),
            cache,
            lifetimes,
            sessions,
            revocation,
            gate,
            auth_service,
            accounts,
        })
    }
}
