//! Account status decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use learnhub_entity::account::{Account, AccountStatus, RestrictionType};

/// Structured description of an account restriction.
///
/// Serialized as `suspensionBanInfo` both in gate rejections and in login
/// and refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionInfo {
    /// The status that was applied.
    pub action: AccountStatus,
    /// Human reason given by whoever applied it.
    pub reason: Option<String>,
    /// When it was applied.
    pub actioned_at: Option<DateTime<Utc>>,
    /// Who applied it.
    pub actioned_by: Option<String>,
    /// When it ends; `None` means permanent.
    pub until: Option<DateTime<Utc>>,
    /// Permanent or temporary.
    pub duration_type: RestrictionType,
    /// Derived from `duration_type`.
    pub is_temporary: bool,
}

/// Why an account may not authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDenial {
    /// Message shown to the client.
    pub reason: String,
    /// Details of the restriction.
    pub info: RestrictionInfo,
}

/// Outcome of evaluating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusVerdict {
    /// The account may authenticate.
    Allow,
    /// The account is restricted.
    Deny(AccountDenial),
}

impl StatusVerdict {
    /// Returns `true` for [`StatusVerdict::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Maps an account's status fields to a verdict. Reads nothing but the
/// account, so equal accounts always get equal verdicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountStatusPolicy;

impl AccountStatusPolicy {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates an account.
    pub fn evaluate(&self, account: &Account) -> StatusVerdict {
        let reason = match account.status {
            AccountStatus::Active => return StatusVerdict::Allow,
            AccountStatus::Suspended => "Account is suspended",
            AccountStatus::Banned => "Account is banned",
            AccountStatus::Deleted => "Account has been deleted",
            AccountStatus::Blocked => "Account is blocked",
        };

        let duration_type = account
            .restriction_type
            .unwrap_or(RestrictionType::Permanent);
        let is_temporary = duration_type == RestrictionType::Temporary;

        StatusVerdict::Deny(AccountDenial {
            reason: reason.to_string(),
            info: RestrictionInfo {
                action: account.status,
                reason: account.restriction_reason.clone(),
                actioned_at: account.restricted_at,
                actioned_by: account.restricted_by.clone(),
                until: if is_temporary {
                    account.restricted_until
                } else {
                    None
                },
                duration_type,
                is_temporary,
            },
        })
    }
}
