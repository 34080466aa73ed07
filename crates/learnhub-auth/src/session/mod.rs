//! Session lifecycle: creation, lookup, expiry and cleanup.

pub mod cleanup;
pub mod store;

pub use cleanup::SessionCleanup;
pub use store::SessionStore;
