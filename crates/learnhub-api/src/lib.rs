//! # learnhub-api
//!
//! HTTP surface of the LearnHub authentication subsystem, built on Axum.
//!
//! Every request passes through the authentication gate middleware; the
//! security context it establishes is read by handlers through the
//! [`extractors::AuthUser`] extractor.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
