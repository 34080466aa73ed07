//! # learnhub-auth
//!
//! Authentication and session lifecycle for the LearnHub backend.
//!
//! ## Modules
//!
//! - `jwt`: access token issuance and verification
//! - `lifetimes`: runtime-adjustable token lifetimes
//! - `session`: refresh session persistence and expiry sweep
//! - `revocation`: cache-backed token blacklist
//! - `policy`: account status decisions
//! - `password`: Argon2id hashing and password policy
//! - `gate`: per-request authentication pipeline
//! - `service`: login, registration, refresh and logout

pub mod gate;
pub mod jwt;
pub mod lifetimes;
pub mod password;
pub mod policy;
pub mod revocation;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use gate::{AuthenticationGate, GateOutcome, GateRejection, GateRequest, SecurityContext};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenError};
pub use lifetimes::{TokenLifetimes, TokenSettings};
pub use password::{CredentialVerifier, PasswordHasher, PasswordValidator};
pub use policy::{AccountStatusPolicy, RestrictionInfo, StatusVerdict};
pub use revocation::{DeviceKey, RevocationRegistry};
pub use service::{AuthOutcome, AuthenticationService, ClientInfo, RegisterRequest};
pub use session::{SessionCleanup, SessionStore};
