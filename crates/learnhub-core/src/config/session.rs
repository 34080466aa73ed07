//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Strategy applied when a login would exceed the account's device limit.
    #[serde(default)]
    pub overflow_strategy: OverflowStrategy,
    /// Interval for the expired session sweep in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            overflow_strategy: OverflowStrategy::default(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

/// Strategy applied when an account tries to exceed its device limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    /// Deny the new login attempt.
    Deny,
    /// Terminate the oldest existing session to make room.
    #[default]
    KickOldest,
}

impl std::fmt::Display for OverflowStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowStrategy::Deny => write!(f, "deny"),
            OverflowStrategy::KickOldest => write!(f, "kick_oldest"),
        }
    }
}

fn default_cleanup_interval() -> u64 {
    15
}
