//! # learnhub-entity
//!
//! Domain entity models consumed by the LearnHub authentication subsystem.
//! Database entities derive `sqlx::FromRow`; enums map to PostgreSQL enum
//! types.

pub mod account;
pub mod session;
