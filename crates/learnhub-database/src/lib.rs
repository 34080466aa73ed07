//! # learnhub-database
//!
//! PostgreSQL connection management, migrations, and the account and
//! session repositories used by the authentication subsystem. Each
//! repository is a trait with a PostgreSQL implementation and an
//! in-memory implementation for single-node development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{AccountRepository, SessionRepository};
pub use memory::{MemoryAccountRepository, MemorySessionRepository};
pub use repositories::{PgAccountRepository, PgSessionRepository};
