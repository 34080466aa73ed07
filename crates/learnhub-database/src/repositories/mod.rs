//! Repository traits and PostgreSQL implementations.

pub mod account;
pub mod session;

pub use account::{AccountRepository, PgAccountRepository};
pub use session::{PgSessionRepository, SessionRepository};
