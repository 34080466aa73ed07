//! Access token blacklist with fail-open degraded mode.

pub mod registry;

pub use registry::{DeviceKey, RevocationRegistry};
