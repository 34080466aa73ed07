//! Login, registration, refresh and logout flows.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use learnhub_core::config::session::OverflowStrategy;
use learnhub_core::config::{AuthConfig, SessionConfig};
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_database::repositories::AccountRepository;
use learnhub_entity::account::{Account, AccountRole, CreateAccount};
use learnhub_entity::session::Session;

use crate::jwt::{Claims, JwtEncoder};
use crate::password::{CredentialVerifier, PasswordValidator};
use crate::policy::{AccountStatusPolicy, RestrictionInfo, StatusVerdict};
use crate::revocation::{DeviceKey, RevocationRegistry};
use crate::session::SessionStore;

/// Result of login, registration or refresh.
///
/// A restricted account gets empty tokens and `suspension_ban_info` set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    /// Access token, empty when denied.
    pub access_token: String,
    /// Session token, empty when denied.
    pub session_token: String,
    /// Account display name.
    pub username: String,
    /// Account ID.
    pub user_id: Uuid,
    /// Restriction details for denied accounts.
    pub suspension_ban_info: Option<RestrictionInfo>,
}

impl AuthOutcome {
    /// Returns `true` when the account was refused.
    pub fn is_denied(&self) -> bool {
        self.suspension_ban_info.is_some()
    }

    fn denied(account: &Account, info: RestrictionInfo) -> Self {
        Self {
            access_token: String::new(),
            session_token: String::new(),
            username: account.username.clone(),
            user_id: account.id,
            suspension_ban_info: Some(info),
        }
    }
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Requested role; defaults to student.
    pub role: Option<AccountRole>,
    /// Display name; defaults to the email's local part.
    pub username: Option<String>,
}

/// Client metadata recorded on new sessions.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Remote address.
    pub ip_address: Option<String>,
    /// Client-supplied device identifier.
    pub device_id: Option<String>,
}

/// Orchestrates the credential flows.
#[derive(Debug, Clone)]
pub struct AuthenticationService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
    encoder: Arc<JwtEncoder>,
    revocation: Arc<RevocationRegistry>,
    credentials: Arc<dyn CredentialVerifier>,
    policy: AccountStatusPolicy,
    password_validator: PasswordValidator,
    default_max_devices: i32,
    overflow_strategy: OverflowStrategy,
}

impl AuthenticationService {
    /// Creates the service with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionStore>,
        encoder: Arc<JwtEncoder>,
        revocation: Arc<RevocationRegistry>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            encoder,
            revocation,
            credentials,
            policy: AccountStatusPolicy::new(),
            password_validator: PasswordValidator::new(auth_config),
            default_max_devices: auth_config.default_max_devices,
            overflow_strategy: session_config.overflow_strategy,
        }
    }

    /// Creates an account and signs it in without a device binding.
    pub async fn register(&self, request: RegisterRequest, client: ClientInfo) -> AppResult<AuthOutcome> {
        let email = normalize_email(&request.email);
        if !email.validate_email() {
            return Err(AppError::validation("Invalid email address"));
        }

        let role = request.role.unwrap_or_default();
        if !matches!(role, AccountRole::Student | AccountRole::Instructor) {
            return Err(AppError::validation(format!(
                "Role {role} cannot be chosen at registration"
            )));
        }

        self.password_validator.validate(&request.password)?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AppError::conflict("Email is already registered"));
        }

        let username = request
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let account = Account::from_create(CreateAccount {
            email,
            username,
            password_hash: self.credentials.hash(&request.password)?,
            role,
            max_devices: self.default_max_devices,
        });
        let account = self.accounts.save(&account).await?;
        info!(account_id = %account.id, role = %account.role, "Account registered");

        let session = self
            .sessions
            .create(
                account.id,
                client.user_agent.as_deref(),
                client.ip_address.as_deref(),
                None,
            )
            .await?;
        let token = self.encoder.issue(&account, None)?;
        Ok(Self::granted(&account, token.token, session.token))
    }

    /// Checks credentials and opens a session.
    ///
    /// Unknown email and wrong password fail identically. A restricted
    /// account is not an error: the outcome carries its details.
    pub async fn login(&self, email: &str, password: &str, client: ClientInfo) -> AppResult<AuthOutcome> {
        let email = normalize_email(email);
        let invalid = || AppError::authentication("Invalid email or password");

        let account = self.accounts.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !self.credentials.verify(password, &account.password_hash)? {
            info!(account_id = %account.id, "Login rejected: bad credentials");
            return Err(invalid());
        }

        if let StatusVerdict::Deny(denial) = self.policy.evaluate(&account) {
            info!(account_id = %account.id, status = %account.status, "Login refused for restricted account");
            return Ok(AuthOutcome::denied(&account, denial.info));
        }

        let now = Utc::now();
        self.accounts.update_last_login(account.id, now).await?;

        let device_id = client.device_id.as_deref();
        self.make_room_for_device(&account, device_id).await?;

        if let Some(device) = device_id {
            if self
                .sessions
                .find_by_account_and_device(account.id, device)
                .await?
                .is_some()
            {
                self.revocation
                    .revoke_all_for_device(DeviceKey::new(account.id, device))
                    .await;
            }
        }

        let session = self
            .sessions
            .create(
                account.id,
                client.user_agent.as_deref(),
                client.ip_address.as_deref(),
                device_id,
            )
            .await?;
        let token = self.encoder.issue(&account, device_id)?;
        if let Some(device) = device_id {
            self.revocation
                .track(&token.token, DeviceKey::new(account.id, device))
                .await;
        }

        info!(
            account_id = %account.id,
            session_id = %session.id,
            device_id = device_id.unwrap_or("-"),
            "Login successful"
        );
        Ok(Self::granted(&account, token.token, session.token))
    }

    /// Exchanges a session token for a new access token.
    ///
    /// The session token itself is returned unchanged.
    pub async fn refresh(&self, session_token: &str) -> AppResult<AuthOutcome> {
        let session = self
            .sessions
            .find_by_token(session_token)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid session token"))?;

        let session = self.sessions.verify_not_expired(session).await.map_err(|e| {
            if e.is(ErrorKind::Session) {
                AppError::session("Token refresh failed: session expired")
            } else {
                e
            }
        })?;

        let account = self
            .accounts
            .find_by_id(session.account_id)
            .await?
            .ok_or_else(|| AppError::authentication("Account no longer exists"))?;

        if let StatusVerdict::Deny(denial) = self.policy.evaluate(&account) {
            return Ok(AuthOutcome::denied(&account, denial.info));
        }

        let device_id = session.device_id.as_deref();
        let token = self.encoder.issue(&account, device_id)?;
        if let Some(device) = device_id {
            self.revocation
                .track(&token.token, DeviceKey::new(account.id, device))
                .await;
        }
        self.sessions.touch(session.id).await;

        Ok(Self::granted(&account, token.token, session.token))
    }

    /// Signs out the caller's current device.
    ///
    /// The presented access token is always revoked. A device-bound token
    /// also revokes every token of that device and ends its session;
    /// otherwise `session_token`, if given and owned by the caller, is
    /// ended.
    pub async fn logout(&self, claims: &Claims, access_token: &str, session_token: Option<&str>) -> AppResult<()> {
        let account_id = claims.account_id();
        self.revocation
            .revoke(access_token, claims.remaining_seconds(), claims.device_key())
            .await;

        if let Some(device) = claims.device_id() {
            self.revocation
                .revoke_all_for_device(DeviceKey::new(account_id, device))
                .await;
            if let Some(session) = self.sessions.find_by_account_and_device(account_id, device).await? {
                self.sessions.delete(session.id).await?;
            }
        } else if let Some(token) = session_token {
            match self.sessions.find_by_token(token).await? {
                Some(session) if session.account_id == account_id => {
                    self.sessions.delete(session.id).await?;
                }
                Some(_) => {
                    warn!(account_id = %account_id, "Logout named a session owned by another account");
                }
                None => {}
            }
        }

        info!(account_id = %account_id, "Logged out");
        Ok(())
    }

    /// Signs the account out everywhere. Returns the number of sessions ended.
    pub async fn logout_all(&self, claims: &Claims, access_token: &str) -> AppResult<u64> {
        let account_id = claims.account_id();
        self.revocation
            .revoke(access_token, claims.remaining_seconds(), claims.device_key())
            .await;

        for session in self.sessions.list_active(account_id).await? {
            if let Some(device) = session.device_id.as_deref() {
                self.revocation
                    .revoke_all_for_device(DeviceKey::new(account_id, device))
                    .await;
            }
        }
        self.sessions.delete_all_for_account(account_id).await
    }

    /// Lists the live sessions of an account.
    pub async fn sessions_of(&self, account_id: Uuid) -> AppResult<Vec<Session>> {
        self.sessions.list_active(account_id).await
    }

    /// Applies the device limit before a login adds a session.
    async fn make_room_for_device(&self, account: &Account, device_id: Option<&str>) -> AppResult<()> {
        let Some(limit) = account.device_limit() else {
            return Ok(());
        };

        // A session on the same device is replaced, so it does not count.
        let mut others: Vec<Session> = self
            .sessions
            .list_active(account.id)
            .await?
            .into_iter()
            .filter(|s| device_id.is_none_or(|d| !s.is_for_device(d)))
            .collect();

        if others.len() < limit {
            return Ok(());
        }

        match self.overflow_strategy {
            OverflowStrategy::Deny => {
                info!(account_id = %account.id, limit, "Login denied: device limit reached");
                Err(AppError::authorization("Maximum number of devices reached"))
            }
            OverflowStrategy::KickOldest => {
                let excess = others.len() + 1 - limit;
                for oldest in others.drain(..excess) {
                    if let Some(device) = oldest.device_id.as_deref() {
                        self.revocation
                            .revoke_all_for_device(DeviceKey::new(account.id, device))
                            .await;
                    }
                    self.sessions.delete(oldest.id).await?;
                    info!(
                        account_id = %account.id,
                        session_id = %oldest.id,
                        "Ended oldest session to stay within device limit"
                    );
                }
                Ok(())
            }
        }
    }

    fn granted(account: &Account, access_token: String, session_token: String) -> AuthOutcome {
        AuthOutcome {
            access_token,
            session_token,
            username: account.username.clone(),
            user_id: account.id,
            suspension_ban_info: None,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
