//! Route definitions for the LearnHub HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor. Every route sits behind the authentication gate;
//! handlers that need a caller take the `AuthUser` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the gate middleware.
pub fn build_router(state: AppState) -> Router {
    let refresh_path = state.config.auth.refresh_path.clone();

    Router::new()
        .merge(auth_routes(&refresh_path))
        .merge(account_routes())
        .merge(admin_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, register, refresh, logout
fn auth_routes(refresh_path: &str) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route(refresh_path, post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
}

/// Caller's own account and sessions
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/me", get(handlers::account::me))
        .route("/accounts/me/sessions", get(handlers::account::sessions))
}

/// Admin endpoints
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/auth/token-settings",
        get(handlers::admin::get_token_settings).put(handlers::admin::update_token_settings),
    )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
