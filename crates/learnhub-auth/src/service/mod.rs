//! Credential flows.

pub mod auth_service;

pub use auth_service::{AuthOutcome, AuthenticationService, ClientInfo, RegisterRequest};
