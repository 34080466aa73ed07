//! Password hashing and policy enforcement.

pub mod hasher;
pub mod validator;

pub use hasher::{CredentialVerifier, PasswordHasher};
pub use validator::PasswordValidator;
