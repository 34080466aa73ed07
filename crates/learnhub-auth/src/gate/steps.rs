//! The authentication gate, as an ordered list of named steps.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use learnhub_core::config::AuthConfig;
use learnhub_database::repositories::AccountRepository;
use learnhub_entity::account::Account;

use super::context::SecurityContext;
use super::outcome::{GateOutcome, GateRejection, StepError};
use crate::jwt::{Claims, JwtDecoder, TokenError};
use crate::policy::{AccountStatusPolicy, StatusVerdict};
use crate::revocation::RevocationRegistry;
use crate::session::SessionStore;

/// What the gate needs to know about an inbound request.
#[derive(Debug, Clone, Default)]
pub struct GateRequest<'a> {
    /// Request path.
    pub path: &'a str,
    /// Raw `Authorization` header value.
    pub authorization: Option<&'a str>,
    /// Client address.
    pub remote_addr: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Whether a security context is already attached to the request.
    pub already_authenticated: bool,
}

/// Per-request authentication.
///
/// [`AuthenticationGate::run`] applies the steps in order; each step is
/// public so it can be exercised on its own.
#[derive(Debug, Clone)]
pub struct AuthenticationGate {
    decoder: Arc<JwtDecoder>,
    revocation: Arc<RevocationRegistry>,
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
    policy: AccountStatusPolicy,
    refresh_path: String,
    admin_path_prefix: String,
}

impl AuthenticationGate {
    /// Creates the gate.
    pub fn new(
        config: &AuthConfig,
        decoder: Arc<JwtDecoder>,
        revocation: Arc<RevocationRegistry>,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            decoder,
            revocation,
            accounts,
            sessions,
            policy: AccountStatusPolicy::new(),
            refresh_path: config.refresh_path.clone(),
            admin_path_prefix: config.admin_path_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Runs every step over a request.
    pub async fn run(&self, request: GateRequest<'_>) -> GateOutcome {
        if self.bypass(request.path) {
            return GateOutcome::Bypass;
        }

        let Some(token) = Self::extract_bearer(request.authorization) else {
            return GateOutcome::Anonymous;
        };

        if let Err(rejection) = self.check_revocation(token).await {
            return GateOutcome::Rejected(rejection);
        }

        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(rejection) => return GateOutcome::Rejected(rejection),
        };

        if request.already_authenticated {
            return GateOutcome::AlreadyAuthenticated;
        }

        match self.authorize(&request, token, claims).await {
            Ok(context) => GateOutcome::Authenticated(Box::new(context)),
            Err(StepError::Reject(rejection)) => GateOutcome::Rejected(rejection),
            Err(StepError::Fault(e)) => {
                error!(path = request.path, error = %e, "Unexpected error during authentication");
                GateOutcome::Rejected(GateRejection::verification_failed())
            }
        }
    }

    async fn authorize(
        &self,
        request: &GateRequest<'_>,
        token: &str,
        claims: Claims,
    ) -> Result<SecurityContext, StepError> {
        let account = self.load_account(&claims).await?;
        self.check_account_status(&account)?;
        self.check_session_liveness(&claims).await?;
        self.check_admin_path(request.path, &account)?;
        Ok(self.build_context(request, &account, token, claims))
    }

    /// Step 1: the refresh endpoint must work with an expired access token.
    pub fn bypass(&self, path: &str) -> bool {
        path == self.refresh_path
    }

    /// Step 2: pulls the token out of a `Bearer` authorization header.
    pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
        let (scheme, token) = header?.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }

    /// Step 3: refuses blacklisted tokens.
    pub async fn check_revocation(&self, token: &str) -> Result<(), GateRejection> {
        if self.revocation.is_revoked(token).await {
            debug!("Rejected blacklisted token");
            return Err(GateRejection::blacklisted());
        }
        Ok(())
    }

    /// Step 4: checks signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, GateRejection> {
        self.decoder.verify(token).map_err(|e| match e {
            TokenError::Expired => GateRejection::token_expired(),
            TokenError::Malformed(reason) => {
                debug!(reason = %reason, "Rejected malformed token");
                GateRejection::authentication_failed()
            }
        })
    }

    /// Step 6a: resolves the token subject. A missing account is a plain
    /// 403 so account existence is never revealed.
    pub async fn load_account(&self, claims: &Claims) -> Result<Account, StepError> {
        match self.accounts.find_by_id(claims.account_id()).await? {
            Some(account) => Ok(account),
            None => {
                warn!(account_id = %claims.account_id(), "Token subject has no account");
                Err(GateRejection::access_denied().into())
            }
        }
    }

    /// Step 6b: applies the account status policy.
    pub fn check_account_status(&self, account: &Account) -> Result<(), GateRejection> {
        match self.policy.evaluate(account) {
            StatusVerdict::Allow => Ok(()),
            StatusVerdict::Deny(denial) => {
                debug!(account_id = %account.id, status = %account.status, "Rejected restricted account");
                Err(GateRejection::account_denied(denial))
            }
        }
    }

    /// Step 7: requires a live session backing the token.
    ///
    /// A device-bound token needs the session of that device; an unbound
    /// token needs at least one live session of the account.
    pub async fn check_session_liveness(&self, claims: &Claims) -> Result<(), StepError> {
        let account_id = claims.account_id();

        let Some(device_id) = claims.device_id() else {
            if self.sessions.list_active(account_id).await?.is_empty() {
                return Err(GateRejection::session_expired().into());
            }
            return Ok(());
        };

        let Some(session) = self
            .sessions
            .find_by_account_and_device(account_id, device_id)
            .await?
        else {
            return Err(GateRejection::device_session_expired().into());
        };

        match self.sessions.verify_not_expired(session).await {
            Ok(session) => {
                self.sessions.touch(session.id).await;
                Ok(())
            }
            Err(e) if e.is(learnhub_core::error::ErrorKind::Session) => {
                Err(GateRejection::session_expired().into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Step 8: keeps students out of the administrative area.
    pub fn check_admin_path(&self, path: &str, account: &Account) -> Result<(), GateRejection> {
        let under_admin = path == self.admin_path_prefix
            || path
                .strip_prefix(self.admin_path_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'));

        if under_admin && account.role.is_student() {
            return Err(GateRejection::student_dashboard_denied());
        }
        Ok(())
    }

    /// Step 9: assembles the context handed to handlers.
    pub fn build_context(
        &self,
        request: &GateRequest<'_>,
        account: &Account,
        token: &str,
        claims: Claims,
    ) -> SecurityContext {
        SecurityContext {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
            authorities: vec![account.role.authority()],
            device_id: claims.device_id.clone(),
            ip_address: request.remote_addr.clone(),
            user_agent: request.user_agent.clone(),
            request_time: Utc::now(),
            token: token.to_string(),
            claims,
        }
    }
}
