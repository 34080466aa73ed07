//! Health check handler.

use axum::Json;
use axum::extract::State;

use learnhub_core::traits::CacheProvider;

use crate::dto::response::{CacheHealth, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = state.cache.health_check().await.unwrap_or(false);
    let revocation_available = state.revocation.is_cache_available();

    let status = if reachable && revocation_available {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: CacheHealth {
            provider: state.cache.provider_name().to_string(),
            reachable,
            revocation_available,
        },
    })
}
