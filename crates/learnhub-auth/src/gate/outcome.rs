//! Gate results and rejection bodies.

use serde::Serialize;

use learnhub_core::error::AppError;

use super::context::SecurityContext;
use crate::policy::{AccountDenial, RestrictionInfo};

/// HTTP status class of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionStatus {
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
}

impl RejectionStatus {
    /// Numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
        }
    }
}

/// A terminal refusal produced by one of the gate steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRejection {
    /// Response status.
    #[serde(skip)]
    pub status: RejectionStatus,
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Restriction details for denied accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension_ban_info: Option<RestrictionInfo>,
}

impl GateRejection {
    fn new(status: RejectionStatus, error: impl Into<String>, code: Option<&'static str>) -> Self {
        Self {
            status,
            error: error.into(),
            code,
            suspension_ban_info: None,
        }
    }

    /// The token is on the revocation list.
    pub fn blacklisted() -> Self {
        Self::new(RejectionStatus::Unauthorized, "Token is blacklisted", None)
    }

    /// The token's expiry has passed.
    pub fn token_expired() -> Self {
        Self::new(RejectionStatus::Unauthorized, "Token has expired", None)
    }

    /// The token failed verification for any other reason.
    pub fn authentication_failed() -> Self {
        Self::new(
            RejectionStatus::Unauthorized,
            "Authentication failed",
            Some("AUTHENTICATION_FAILED"),
        )
    }

    /// The subject of the token does not resolve to an account.
    pub fn access_denied() -> Self {
        Self::new(RejectionStatus::Forbidden, "Access denied", Some("ACCESS_DENIED"))
    }

    /// The account is restricted.
    pub fn account_denied(denial: AccountDenial) -> Self {
        Self {
            status: RejectionStatus::Forbidden,
            error: denial.reason,
            code: Some("ACCOUNT_RESTRICTED"),
            suspension_ban_info: Some(denial.info),
        }
    }

    /// No session exists for the token's device.
    pub fn device_session_expired() -> Self {
        Self::new(
            RejectionStatus::Unauthorized,
            "Session for this device has ended, please sign in again",
            Some("DEVICE_SESSION_EXPIRED"),
        )
    }

    /// The backing session has expired.
    pub fn session_expired() -> Self {
        Self::new(
            RejectionStatus::Unauthorized,
            "Session has expired, please sign in again",
            Some("SESSION_EXPIRED"),
        )
    }

    /// A student tried to reach the administrative area.
    pub fn student_dashboard_denied() -> Self {
        Self::new(
            RejectionStatus::Forbidden,
            "Students cannot access the administrative dashboard",
            Some("STUDENT_DASHBOARD_ACCESS_DENIED"),
        )
    }

    /// An unexpected failure occurred while checking the request.
    pub fn verification_failed() -> Self {
        Self::new(
            RejectionStatus::Unauthorized,
            "Token verification failed",
            Some("TOKEN_VERIFICATION_FAILED"),
        )
    }
}

/// Failure of a step that touches storage.
#[derive(Debug)]
pub enum StepError {
    /// A decided refusal.
    Reject(GateRejection),
    /// An unexpected error; reported as a verification failure.
    Fault(AppError),
}

impl From<GateRejection> for StepError {
    fn from(rejection: GateRejection) -> Self {
        Self::Reject(rejection)
    }
}

impl From<AppError> for StepError {
    fn from(err: AppError) -> Self {
        Self::Fault(err)
    }
}

/// Final result of running the gate over a request.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// The request targets the refresh endpoint and skips the gate.
    Bypass,
    /// No bearer token; downstream handlers decide.
    Anonymous,
    /// A context was already established for this request.
    AlreadyAuthenticated,
    /// The caller is authenticated.
    Authenticated(Box<SecurityContext>),
    /// The request must be answered with this rejection.
    Rejected(GateRejection),
}
