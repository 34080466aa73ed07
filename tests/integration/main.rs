//! HTTP-level tests driving the full router on in-memory backends.

mod admin_test;
mod auth_flow_test;
mod gate_test;
mod helpers;
mod logout_test;
