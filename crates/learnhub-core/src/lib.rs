//! # learnhub-core
//!
//! Core crate for the LearnHub backend. Contains the unified error system,
//! configuration schemas, and the cache provider trait shared by the
//! authentication subsystem.
//!
//! This crate has **no** internal dependencies on other LearnHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
