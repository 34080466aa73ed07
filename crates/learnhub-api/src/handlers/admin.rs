//! Administrative handlers.

use axum::Json;
use axum::extract::State;
use tracing::info;

use learnhub_auth::TokenSettings;
use learnhub_core::error::AppError;

use crate::dto::request::TokenSettingsUpdate;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::authorization("Administrator role required"))
    }
}

/// GET /admin/auth/token-settings
pub async fn get_token_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<TokenSettings>> {
    require_admin(&auth)?;
    Ok(Json(state.lifetimes.settings()))
}

/// PUT /admin/auth/token-settings
pub async fn update_token_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TokenSettingsUpdate>,
) -> ApiResult<Json<TokenSettings>> {
    require_admin(&auth)?;

    let settings = state
        .lifetimes
        .update(req.access_token_ttl_ms, req.session_ttl_ms)?;

    info!(
        admin_id = %auth.account_id,
        access_token_ttl_ms = settings.access_token_ttl_ms,
        session_ttl_ms = settings.session_ttl_ms,
        "Token lifetimes updated"
    );

    Ok(Json(settings))
}
