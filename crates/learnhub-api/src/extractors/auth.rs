//! `AuthUser` extractor reading the security context placed by the gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use learnhub_auth::SecurityContext;
use learnhub_core::error::AppError;

use crate::error::ApiError;

/// Authenticated caller, available in handlers of protected routes.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SecurityContext);

impl AuthUser {
    /// Returns the inner `SecurityContext`.
    pub fn context(&self) -> &SecurityContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = SecurityContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::authentication("Authentication required").into())
    }
}
