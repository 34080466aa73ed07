//! In-memory repositories for single-node development and tests.
//!
//! Both stores hold their rows behind a Tokio `RwLock` and mirror the
//! uniqueness constraints of the PostgreSQL schema.

pub mod account;
pub mod session;

pub use account::MemoryAccountRepository;
pub use session::MemorySessionRepository;
