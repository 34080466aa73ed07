//! Account status policy.

pub mod status;

pub use status::{AccountDenial, AccountStatusPolicy, RestrictionInfo, StatusVerdict};
